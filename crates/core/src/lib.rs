//! DDEV Core Library
//!
//! This is the core library for the ddev local development environment
//! manager. It provides the business logic for project discovery, live
//! status aggregation, container port resolution, and Sequel Pro
//! connection-profile generation.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`registry`] - Project discovery and active-project resolution
//! - [`runtime`] - The container runtime boundary and its Docker implementation
//! - [`status`] - Per-project status aggregation into presentation descriptors
//! - [`present`] - Table and router-status rendering
//! - [`ports`] - Published-port resolution for container services
//! - [`sequelpro`] - Sequel Pro capability detection and profile generation
//! - [`configs`] - Configuration parsing for project config files
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ddev_core::registry::ProjectRegistry;
//! use ddev_core::runtime::DockerRuntime;
//! use std::path::PathBuf;
//!
//! # async fn example() -> ddev_core::types::DdevResult<()> {
//! let runtime = DockerRuntime::connect()?;
//! let registry = ProjectRegistry::new(PathBuf::from("/home/me/ddev-projects"));
//!
//! let projects = registry.list_all(&runtime).await?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod ports;
pub mod present;
pub mod registry;
pub mod runtime;
pub mod sequelpro;
pub mod status;
pub mod types;

// Re-export the main types for easier usage
pub use registry::{Project, ProjectRegistry, ProjectState};
pub use types::{DdevError, DdevResult};
