//! Published-port resolution
//!
//! The runtime assigns published ports dynamically; a mapping is only valid
//! for the single operation that looked it up.

use crate::runtime::ServiceContainer;
use crate::types::{DdevError, DdevResult};

/// Resolve the host port the runtime published for a container's well-known
/// private port.
pub fn resolve_published_port(container: &ServiceContainer, private_port: u16) -> DdevResult<u16> {
    container
        .ports
        .iter()
        .find(|mapping| mapping.private_port == private_port)
        .and_then(|mapping| mapping.published_port)
        .ok_or_else(|| DdevError::PortNotPublished {
            service: container.service.clone(),
            port: private_port,
        })
}
