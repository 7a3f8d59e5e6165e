//! Sequel Pro integration
//!
//! Capability detection for the external Sequel Pro client, generation of the
//! `.spf` connection-profile document, and the out-of-process hand-off that
//! opens it. The install path is an explicit configuration value so tests can
//! point the probe anywhere; nothing here is process-global.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::configs::project::{DbCredentials, DB_SERVICE, DEFAULT_DB_PORT};
use crate::ports::resolve_published_port;
use crate::registry::{Project, ProjectRegistry, ProjectState};
use crate::runtime::{ContainerRuntime, ContainerState};
use crate::types::{DdevError, DdevResult};

/// Where Sequel Pro is expected to be installed.
pub const SEQUELPRO_DEFAULT_LOCATION: &str = "/Applications/Sequel Pro.app";

/// Environment variable overriding the install location, mainly for tests.
pub const SEQUELPRO_PATH_ENV: &str = "DDEV_SEQUELPRO_PATH";

/// Diagnostic emitted by the stub command when Sequel Pro is not installed.
pub const SEQUELPRO_UNAVAILABLE: &str =
    "The sequelpro command is not available because Sequel Pro.app is not detected on your workstation";

/// Filename of the generated profile inside the project's `.ddev` directory.
pub const SEQUELPRO_PROFILE_NAME: &str = "sequelpro.spf";

/// Fixed connection-profile document. Placeholders are filled by
/// [`render_profile`] in a fixed order.
const SEQUELPRO_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>ContentFilters</key>
	<dict/>
	<key>auto_connect</key>
	<true/>
	<key>data</key>
	<dict>
		<key>connection</key>
		<dict>
			<key>database</key>
			<string>{database}</string>
			<key>host</key>
			<string>{host}</string>
			<key>name</key>
			<string>{name}</string>
			<key>rdbms_type</key>
			<string>mysql</string>
			<key>sslCACertFileLocation</key>
			<string></string>
			<key>sslCertificateFileLocation</key>
			<string></string>
			<key>sslKeyFileLocation</key>
			<string></string>
			<key>type</key>
			<string>SPTCPIPConnection</string>
			<key>useSSL</key>
			<integer>0</integer>
			<key>user</key>
			<string>{user}</string>
			<key>password</key>
			<string>{password}</string>
			<key>port</key>
			<integer>{port}</integer>
		</dict>
	</dict>
	<key>encrypted</key>
	<false/>
	<key>format</key>
	<string>connection</string>
	<key>queryFavorites</key>
	<array/>
	<key>queryHistory</key>
	<array/>
	<key>version</key>
	<integer>1</integer>
</dict>
</plist>
"#;

/// Injected Sequel Pro configuration, built once at process startup.
#[derive(Debug, Clone)]
pub struct SequelproConfig {
    pub install_path: PathBuf,
}

impl SequelproConfig {
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            install_path: install_path.into(),
        }
    }

    /// Default install location, honoring the environment override.
    pub fn from_env() -> Self {
        let install_path = std::env::var_os(SEQUELPRO_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SEQUELPRO_DEFAULT_LOCATION));
        Self { install_path }
    }

    /// Filesystem probe for the external client. Evaluated once, at command
    /// registration time; a client installed mid-session is not re-detected.
    pub fn detect(&self) -> bool {
        self.install_path.exists()
    }
}

impl Default for SequelproConfig {
    fn default() -> Self {
        Self::new(SEQUELPRO_DEFAULT_LOCATION)
    }
}

/// Which sequelpro command variant the CLI exposes, decided once during
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequelproCommand {
    /// Client detected: the fully functional command.
    Functional,
    /// Platform could run the client but it is not installed: a command that
    /// always fails with [`SEQUELPRO_UNAVAILABLE`].
    Stub,
    /// Platform cannot run the client: no command is registered at all.
    Absent,
}

impl SequelproCommand {
    pub fn resolve(detected: bool, os: &str) -> Self {
        match (detected, os) {
            (true, _) => SequelproCommand::Functional,
            (false, "macos") => SequelproCommand::Stub,
            (false, _) => SequelproCommand::Absent,
        }
    }
}

/// Fill the profile template. Substitution order is fixed: service display
/// label, host address, connection name, database user, database password,
/// resolved port.
fn render_profile(
    label: &str,
    host: &str,
    connection_name: &str,
    credentials: &DbCredentials,
    port: u16,
) -> String {
    SEQUELPRO_TEMPLATE
        .replacen("{database}", label, 1)
        .replacen("{host}", host, 1)
        .replacen("{name}", connection_name, 1)
        .replacen("{user}", &credentials.user, 1)
        .replacen("{password}", &credentials.password, 1)
        .replacen("{port}", &port.to_string(), 1)
}

/// Write the connection profile to its deterministic path inside the
/// project. The file is written to a temporary sibling and persisted over the
/// final path, so a partial document is never left behind.
pub fn generate_profile(
    project: &Project,
    service_label: &str,
    host: &str,
    credentials: &DbCredentials,
    port: u16,
) -> DdevResult<PathBuf> {
    let config_dir = project.approot.join(".ddev");
    std::fs::create_dir_all(&config_dir)?;
    let profile_path = config_dir.join(SEQUELPRO_PROFILE_NAME);

    let content = render_profile(service_label, host, &project.hostname(), credentials, port);

    let mut tmp = NamedTempFile::new_in(&config_dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(&profile_path)
        .map_err(|persist_error| DdevError::Io(persist_error.error))?;

    Ok(profile_path)
}

/// Hand the generated profile to the external client. The child's own
/// success is not inspected; only a failure to start it is reported.
pub fn launch_client(profile_path: &Path) -> DdevResult<()> {
    std::process::Command::new("open")
        .arg(profile_path)
        .spawn()
        .map_err(|source| DdevError::Handoff {
            tool: "open".to_string(),
            source,
        })?;
    Ok(())
}

/// The full sequelpro operation: resolve the active project, require it to be
/// running, resolve the db container's published port, generate the profile,
/// and hand it off to the client.
pub async fn run_sequelpro<R: ContainerRuntime>(
    runtime: &R,
    registry: &ProjectRegistry,
    name_hint: Option<&str>,
) -> DdevResult<PathBuf> {
    run_sequelpro_with(runtime, registry, name_hint, launch_client).await
}

/// [`run_sequelpro`] with the client hand-off injected, so the success path
/// is testable without spawning the external client.
pub async fn run_sequelpro_with<R: ContainerRuntime>(
    runtime: &R,
    registry: &ProjectRegistry,
    name_hint: Option<&str>,
    launcher: impl FnOnce(&Path) -> DdevResult<()>,
) -> DdevResult<PathBuf> {
    let project = registry.get_active(runtime, name_hint).await?;
    if project.state != ProjectState::Running {
        return Err(DdevError::ProjectNotRunning {
            project: project.name,
        });
    }

    // A container in any other state cannot serve connections, so for port
    // resolution it counts as absent.
    let container = runtime
        .service_container(&project.name, DB_SERVICE)
        .await?
        .filter(|container| container.state == ContainerState::Running)
        .ok_or_else(|| DdevError::ServiceNotFound {
            service: DB_SERVICE.to_string(),
        })?;

    let private_port = project.service_port(DB_SERVICE).unwrap_or(DEFAULT_DB_PORT);
    let published_port = resolve_published_port(&container, private_port)?;
    let host = runtime.host_address()?;

    let profile_path =
        generate_profile(&project, DB_SERVICE, &host, &project.database, published_port)?;
    launcher(&profile_path)?;
    Ok(profile_path)
}
