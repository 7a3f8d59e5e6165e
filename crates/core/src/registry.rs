//! Project discovery and active-project resolution
//!
//! Projects live as child directories of a single projects root; a child
//! counts as a project when it carries `.ddev/config.yaml`. Lifecycle state
//! comes from the container runtime at enumeration time. Enumeration order is
//! sorted by project name so every listing of the same runtime state is
//! deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use crate::configs::project::{parse_project_config, DbCredentials, ServiceConfig};
use crate::runtime::{ContainerRuntime, ContainerState};
use crate::types::{DdevError, DdevResult};

/// Relative path of the project config file inside a project root.
pub const PROJECT_CONFIG_PATH: &str = ".ddev/config.yaml";

/// Lifecycle state of a project, derived from its containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    Running,
    Stopped,
    Paused,
    ConfigMissing,
}

impl ProjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectState::Running => "running",
            ProjectState::Stopped => "stopped",
            ProjectState::Paused => "paused",
            ProjectState::ConfigMissing => "config missing",
        }
    }
}

/// One local development environment instance. Built by discovery and only
/// read afterwards; the runtime alone mutates the underlying state.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub approot: PathBuf,
    pub state: ProjectState,
    pub services: Vec<ServiceConfig>,
    pub database: DbCredentials,
}

impl Project {
    /// Hostname the router serves this project under.
    pub fn hostname(&self) -> String {
        format!("{}.ddev.local", self.name)
    }

    /// The configured private port for a named service, if any.
    pub fn service_port(&self, service: &str) -> Option<u16> {
        self.services
            .iter()
            .find(|config| config.name == service)
            .map(|config| config.private_port)
    }
}

/// Enumerates known projects and resolves the active one.
pub struct ProjectRegistry {
    projects_root: PathBuf,
}

impl ProjectRegistry {
    pub fn new(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
        }
    }

    /// All known projects, sorted by name. An absent projects root or a root
    /// without projects yields an empty list, not an error.
    pub async fn list_all<R: ContainerRuntime>(&self, runtime: &R) -> DdevResult<Vec<Project>> {
        let mut projects = Vec::new();

        let entries = match fs::read_dir(&self.projects_root) {
            Ok(entries) => entries,
            Err(_) => return Ok(projects),
        };

        for entry in entries.flatten() {
            let approot = entry.path();
            if !approot.is_dir() {
                continue;
            }
            let config_path = approot.join(PROJECT_CONFIG_PATH);
            if !config_path.exists() {
                continue;
            }
            projects.push(self.load_project(runtime, approot, &config_path).await?);
        }

        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    /// Resolve the single project an invocation operates on: an explicit name
    /// hint if given, otherwise the project containing the current working
    /// directory.
    pub async fn get_active<R: ContainerRuntime>(
        &self,
        runtime: &R,
        name_hint: Option<&str>,
    ) -> DdevResult<Project> {
        let projects = self.list_all(runtime).await?;
        let cwd = std::env::current_dir()?;
        active_project(projects, name_hint, &cwd)
    }

    async fn load_project<R: ContainerRuntime>(
        &self,
        runtime: &R,
        approot: PathBuf,
        config_path: &Path,
    ) -> DdevResult<Project> {
        let dir_name = approot
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let config = fs::read_to_string(config_path)
            .ok()
            .and_then(|contents| parse_project_config(&contents).ok());

        match config {
            Some(config) => {
                let name = config.name.unwrap_or(dir_name);
                let state = project_state(runtime, &name).await?;
                Ok(Project {
                    name,
                    approot,
                    state,
                    services: config.services,
                    database: config.database,
                })
            }
            // The config file exists but cannot be read or parsed; the
            // project is still listed so the user can see it is broken.
            None => Ok(Project {
                name: dir_name,
                approot,
                state: ProjectState::ConfigMissing,
                services: Vec::new(),
                database: DbCredentials::default(),
            }),
        }
    }
}

async fn project_state<R: ContainerRuntime>(runtime: &R, name: &str) -> DdevResult<ProjectState> {
    let containers = runtime.project_containers(name).await?;
    if containers
        .iter()
        .any(|container| container.state == ContainerState::Paused)
    {
        return Ok(ProjectState::Paused);
    }
    if containers
        .iter()
        .any(|container| container.state == ContainerState::Running)
    {
        return Ok(ProjectState::Running);
    }
    Ok(ProjectState::Stopped)
}

fn active_project(
    projects: Vec<Project>,
    name_hint: Option<&str>,
    cwd: &Path,
) -> DdevResult<Project> {
    match name_hint {
        Some(hint) => projects
            .into_iter()
            .find(|project| project.name == hint)
            .ok_or_else(|| DdevError::AmbiguousProject {
                hint: hint.to_string(),
            }),
        None => projects
            .into_iter()
            .find(|project| cwd.starts_with(&project.approot))
            .ok_or(DdevError::NoActiveProject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::{running_container, FakeRuntime};
    use crate::runtime::{PortMapping, ServiceContainer};

    fn write_project(root: &Path, dir: &str, config: &str) -> PathBuf {
        let approot = root.join(dir);
        fs::create_dir_all(approot.join(".ddev")).unwrap();
        fs::write(approot.join(PROJECT_CONFIG_PATH), config).unwrap();
        approot
    }

    #[tokio::test]
    async fn test_list_all_missing_root_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = ProjectRegistry::new(temp_dir.path().join("does-not-exist"));

        let projects = registry.list_all(&FakeRuntime::default()).await.unwrap();
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_skips_directories_without_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("not-a-project")).unwrap();
        write_project(temp_dir.path(), "site1", "name: site1\n");

        let registry = ProjectRegistry::new(temp_dir.path());
        let projects = registry.list_all(&FakeRuntime::default()).await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "site1");
        assert_eq!(projects[0].state, ProjectState::Stopped);
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_name_with_runtime_state() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_project(temp_dir.path(), "zulu", "name: zulu\n");
        write_project(temp_dir.path(), "alpha", "name: alpha\n");

        let runtime = FakeRuntime::default().with_project(
            "zulu",
            vec![running_container("web", &[(80, Some(32768))])],
        );

        let registry = ProjectRegistry::new(temp_dir.path());
        let projects = registry.list_all(&runtime).await.unwrap();

        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zulu"]);
        assert_eq!(projects[0].state, ProjectState::Stopped);
        assert_eq!(projects[1].state, ProjectState::Running);
    }

    #[tokio::test]
    async fn test_paused_container_wins_over_running() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_project(temp_dir.path(), "site1", "name: site1\n");

        let paused = ServiceContainer {
            service: "db".to_string(),
            state: ContainerState::Paused,
            ports: vec![PortMapping {
                private_port: 3306,
                published_port: None,
            }],
        };
        let runtime = FakeRuntime::default().with_project(
            "site1",
            vec![running_container("web", &[(80, Some(32768))]), paused],
        );

        let registry = ProjectRegistry::new(temp_dir.path());
        let projects = registry.list_all(&runtime).await.unwrap();
        assert_eq!(projects[0].state, ProjectState::Paused);
    }

    #[tokio::test]
    async fn test_unparsable_config_reports_config_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_project(temp_dir.path(), "broken", "name: [unclosed\n");

        let registry = ProjectRegistry::new(temp_dir.path());
        let projects = registry.list_all(&FakeRuntime::default()).await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "broken");
        assert_eq!(projects[0].state, ProjectState::ConfigMissing);
        assert!(projects[0].services.is_empty());
    }

    #[test]
    fn test_active_project_by_hint() {
        let projects = vec![project_named("site1"), project_named("site2")];
        let active = active_project(projects, Some("site2"), Path::new("/elsewhere")).unwrap();
        assert_eq!(active.name, "site2");
    }

    #[test]
    fn test_active_project_unknown_hint_is_ambiguous() {
        let projects = vec![project_named("site1")];
        let err = active_project(projects, Some("nope"), Path::new("/elsewhere")).unwrap_err();
        assert!(matches!(err, DdevError::AmbiguousProject { hint } if hint == "nope"));
    }

    #[test]
    fn test_active_project_from_cwd() {
        let mut inside = project_named("site1");
        inside.approot = PathBuf::from("/projects/site1");
        let projects = vec![project_named("other"), inside];

        let active = active_project(
            projects,
            None,
            Path::new("/projects/site1/web/docroot"),
        )
        .unwrap();
        assert_eq!(active.name, "site1");
    }

    #[test]
    fn test_active_project_no_candidate() {
        let err = active_project(vec![project_named("site1")], None, Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, DdevError::NoActiveProject));
    }

    fn project_named(name: &str) -> Project {
        Project {
            name: name.to_string(),
            approot: PathBuf::from("/nonexistent").join(name),
            state: ProjectState::Running,
            services: Vec::new(),
            database: DbCredentials::default(),
        }
    }
}
