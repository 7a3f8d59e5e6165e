//! Per-project status aggregation
//!
//! [`describe`] flattens one project plus its live containers into a
//! [`ProjectDescriptor`], the single structure both output channels consume:
//! the table renderer walks `fields()`, the raw channel serializes the value
//! as-is. A descriptor is a point-in-time snapshot and is discarded after one
//! render cycle.

use serde::Serialize;

use crate::registry::{Project, ProjectState};
use crate::runtime::{ContainerRuntime, ContainerState};
use crate::types::{DdevError, DdevResult};

/// Presentation-ready snapshot of one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub status: String,
    pub location: String,
    pub url: String,
    pub ports: String,
}

impl ProjectDescriptor {
    /// The descriptor as ordered field/value pairs, in table column order.
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("name", &self.name),
            ("status", &self.status),
            ("location", &self.location),
            ("url", &self.url),
            ("ports", &self.ports),
        ]
    }
}

/// Health of the shared router, independent of any individual project.
#[derive(Debug, Clone)]
pub struct RouterStatus {
    pub state: Option<ContainerState>,
    pub published_ports: Vec<u16>,
}

/// Describe one project by querying its live containers. A runtime failure
/// here is attributed to the project so the caller can fail the whole
/// listing with a name to act on.
pub async fn describe<R: ContainerRuntime>(
    runtime: &R,
    project: &Project,
) -> DdevResult<ProjectDescriptor> {
    let containers = runtime
        .project_containers(&project.name)
        .await
        .map_err(|source| DdevError::Describe {
            project: project.name.clone(),
            source: Box::new(source),
        })?;

    let url = if project.state == ProjectState::Running {
        format!("http://{}", project.hostname())
    } else {
        String::new()
    };

    let mut port_pairs = Vec::new();
    for container in &containers {
        for mapping in &container.ports {
            if let Some(published) = mapping.published_port {
                port_pairs.push(format!(
                    "{}:{}->{}",
                    container.service, mapping.private_port, published
                ));
            }
        }
    }

    Ok(ProjectDescriptor {
        name: project.name.clone(),
        status: project.state.as_str().to_string(),
        location: project.approot.display().to_string(),
        url,
        ports: port_pairs.join(", "),
    })
}

/// Query the shared router's health. Queried once per listing.
pub async fn router_status<R: ContainerRuntime>(runtime: &R) -> DdevResult<RouterStatus> {
    Ok(match runtime.router_container().await? {
        Some(container) => RouterStatus {
            state: Some(container.state),
            published_ports: container
                .ports
                .iter()
                .filter_map(|mapping| mapping.published_port)
                .collect(),
        },
        None => RouterStatus {
            state: None,
            published_ports: Vec::new(),
        },
    })
}
