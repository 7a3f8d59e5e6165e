//! Container runtime boundary
//!
//! Everything this crate needs from the container runtime goes through the
//! [`ContainerRuntime`] trait: the live containers backing a project, the
//! shared router container, and the host address containers are reachable on.
//! [`DockerRuntime`] implements the trait against the Docker Engine API.
//! Runtime-assigned data (container state, published ports) is recomputed on
//! every query and must never be cached across operations.

use std::collections::HashMap;

use bollard::container::ListContainersOptions;
use bollard::models::{ContainerSummary, PortTypeEnum};
use bollard::Docker;

use crate::types::DdevResult;

/// Label identifying which project a container belongs to.
pub const SITE_NAME_LABEL: &str = "com.ddev.site-name";
/// Label identifying the service role a container fills within its project.
pub const CONTAINER_TYPE_LABEL: &str = "com.ddev.container-type";
/// Name of the shared ingress container common to all projects.
pub const ROUTER_CONTAINER_NAME: &str = "ddev-router";

/// Lifecycle state of a single container as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Paused,
    Exited,
}

/// One private-to-published port pair. The published side is only present
/// while the owning container is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub private_port: u16,
    pub published_port: Option<u16>,
}

/// Normalized view of one live container backing a project service.
#[derive(Debug, Clone)]
pub struct ServiceContainer {
    pub service: String,
    pub state: ContainerState,
    pub ports: Vec<PortMapping>,
}

/// The boundary to the container runtime.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// All containers belonging to the named project, running or not.
    async fn project_containers(&self, project: &str) -> DdevResult<Vec<ServiceContainer>>;

    /// The container backing one named service of a project, if any.
    async fn service_container(
        &self,
        project: &str,
        service: &str,
    ) -> DdevResult<Option<ServiceContainer>> {
        Ok(self
            .project_containers(project)
            .await?
            .into_iter()
            .find(|container| container.service == service))
    }

    /// The shared router container, if it exists.
    async fn router_container(&self) -> DdevResult<Option<ServiceContainer>>;

    /// Address on which published container ports are reachable from the host.
    fn host_address(&self) -> DdevResult<String>;
}

/// [`ContainerRuntime`] implementation backed by the Docker Engine API.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the standard Docker environment (DOCKER_HOST or the
    /// local socket).
    pub fn connect() -> DdevResult<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    async fn list_with_filters(
        &self,
        filters: HashMap<String, Vec<String>>,
    ) -> DdevResult<Vec<ServiceContainer>> {
        let options = ListContainersOptions::<String> {
            all: true,
            filters,
            ..Default::default()
        };
        let summaries = self.docker.list_containers(Some(options)).await?;
        Ok(summaries.into_iter().map(normalize).collect())
    }
}

impl ContainerRuntime for DockerRuntime {
    async fn project_containers(&self, project: &str) -> DdevResult<Vec<ServiceContainer>> {
        let mut filters = HashMap::new();
        filters.insert(
            "label".to_string(),
            vec![format!("{SITE_NAME_LABEL}={project}")],
        );
        self.list_with_filters(filters).await
    }

    async fn router_container(&self) -> DdevResult<Option<ServiceContainer>> {
        let mut filters = HashMap::new();
        filters.insert(
            "name".to_string(),
            vec![ROUTER_CONTAINER_NAME.to_string()],
        );
        Ok(self.list_with_filters(filters).await?.into_iter().next())
    }

    fn host_address(&self) -> DdevResult<String> {
        Ok(docker_host_address(std::env::var("DOCKER_HOST").ok().as_deref()))
    }
}

/// Flatten a Docker container summary into the runtime-neutral view.
fn normalize(summary: ContainerSummary) -> ServiceContainer {
    let service = summary
        .labels
        .as_ref()
        .and_then(|labels| labels.get(CONTAINER_TYPE_LABEL).cloned())
        .or_else(|| {
            summary
                .names
                .as_ref()
                .and_then(|names| names.first())
                .map(|name| name.trim_start_matches('/').to_string())
        })
        .unwrap_or_default();

    let state = match summary.state.as_deref() {
        Some("running") => ContainerState::Running,
        Some("paused") => ContainerState::Paused,
        _ => ContainerState::Exited,
    };

    let ports = summary
        .ports
        .unwrap_or_default()
        .into_iter()
        .filter(|port| !matches!(port.typ, Some(PortTypeEnum::UDP)))
        .map(|port| PortMapping {
            private_port: port.private_port as u16,
            published_port: port.public_port.map(|published| published as u16),
        })
        .collect();

    ServiceContainer {
        service,
        state,
        ports,
    }
}

/// Derive the host-reachable address from a DOCKER_HOST value. Anything that
/// is not a tcp:// URL means the local socket, i.e. 127.0.0.1.
fn docker_host_address(docker_host: Option<&str>) -> String {
    if let Some(stripped) = docker_host.and_then(|host| host.strip_prefix("tcp://")) {
        let authority = stripped.split('/').next().unwrap_or(stripped);
        let address = authority.rsplit_once(':').map_or(authority, |(host, _)| host);
        if !address.is_empty() {
            return address.to_string();
        }
    }
    "127.0.0.1".to_string()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docker_host_address_defaults_to_loopback() {
        assert_eq!(docker_host_address(None), "127.0.0.1");
        assert_eq!(docker_host_address(Some("unix:///var/run/docker.sock")), "127.0.0.1");
    }

    #[test]
    fn test_docker_host_address_from_tcp_url() {
        assert_eq!(docker_host_address(Some("tcp://192.168.99.100:2376")), "192.168.99.100");
        assert_eq!(docker_host_address(Some("tcp://192.168.99.100")), "192.168.99.100");
    }

    #[test]
    fn test_normalize_prefers_container_type_label() {
        let mut labels = std::collections::HashMap::new();
        labels.insert(CONTAINER_TYPE_LABEL.to_string(), "db".to_string());
        let summary = ContainerSummary {
            names: Some(vec!["/ddev-site1-db".to_string()]),
            labels: Some(labels),
            state: Some("running".to_string()),
            ports: Some(vec![bollard::models::Port {
                private_port: 3306,
                public_port: Some(34567),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let container = normalize(summary);
        assert_eq!(container.service, "db");
        assert_eq!(container.state, ContainerState::Running);
        assert_eq!(
            container.ports,
            vec![PortMapping {
                private_port: 3306,
                published_port: Some(34567),
            }]
        );
    }

    #[test]
    fn test_normalize_falls_back_to_container_name() {
        let summary = ContainerSummary {
            names: Some(vec!["/ddev-router".to_string()]),
            state: Some("exited".to_string()),
            ..Default::default()
        };

        let container = normalize(summary);
        assert_eq!(container.service, "ddev-router");
        assert_eq!(container.state, ContainerState::Exited);
        assert!(container.ports.is_empty());
    }
}
