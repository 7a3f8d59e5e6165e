use thiserror::Error;

/// The main error type for ddev operations
#[derive(Debug, Error)]
pub enum DdevError {
    #[error("could not find an active project: no name was given and the current directory is not inside a known project")]
    NoActiveProject,

    #[error("could not resolve project \"{hint}\": no project with that name exists")]
    AmbiguousProject { hint: String },

    #[error("failed to describe project {project}: {source}")]
    Describe {
        project: String,
        #[source]
        source: Box<DdevError>,
    },

    #[error("project {project} is not running; the project must be running to create a Sequel Pro connection")]
    ProjectNotRunning { project: String },

    #[error("no container was found for the {service} service")]
    ServiceNotFound { service: String },

    #[error("the {service} service does not publish private port {port}")]
    PortNotPublished { service: String, port: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("container runtime error: {0}")]
    Runtime(#[from] bollard::errors::Error),

    #[error("could not launch {tool}: {source}")]
    Handoff {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for ddev operations
pub type DdevResult<T> = Result<T, DdevError>;
