use serde::{Deserialize, Serialize};

use crate::types::DdevResult;

/// Well-known service names and their private ports.
pub const WEB_SERVICE: &str = "web";
pub const DB_SERVICE: &str = "db";
pub const DEFAULT_WEB_PORT: u16 = 80;
pub const DEFAULT_DB_PORT: u16 = 3306;

/// On-disk project configuration, read from `<approot>/.ddev/config.yaml`.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: Option<String>,
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
    #[serde(default)]
    pub database: DbCredentials,
}

/// A named service role within a project and its well-known private port.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceConfig {
    pub name: String,
    pub private_port: u16,
}

/// Credentials for the project's database service.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DbCredentials {
    #[serde(default = "default_db_field")]
    pub database: String,
    #[serde(default = "default_db_field")]
    pub user: String,
    #[serde(default = "default_db_field")]
    pub password: String,
}

impl Default for DbCredentials {
    fn default() -> Self {
        Self {
            database: default_db_field(),
            user: default_db_field(),
            password: default_db_field(),
        }
    }
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            name: WEB_SERVICE.to_string(),
            private_port: DEFAULT_WEB_PORT,
        },
        ServiceConfig {
            name: DB_SERVICE.to_string(),
            private_port: DEFAULT_DB_PORT,
        },
    ]
}

fn default_db_field() -> String {
    "db".to_string()
}

pub fn parse_project_config(yaml_str: &str) -> DdevResult<ProjectConfig> {
    let config: ProjectConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = parse_project_config("name: site1\n").unwrap();

        assert_eq!(config.name.as_deref(), Some("site1"));
        assert_eq!(config.services, default_services());
        assert_eq!(config.database, DbCredentials::default());
        assert_eq!(config.database.user, "db");
    }

    #[test]
    fn test_parse_explicit_services_and_credentials() {
        let yaml = r#"
name: site2
services:
  - name: db
    privatePort: 5432
database:
  database: app
  user: admin
  password: secret
"#;
        let config = parse_project_config(yaml).unwrap();

        assert_eq!(
            config.services,
            vec![ServiceConfig {
                name: "db".to_string(),
                private_port: 5432,
            }]
        );
        assert_eq!(config.database.database, "app");
        assert_eq!(config.database.password, "secret");
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        assert!(parse_project_config("name: x\nbogus: true\n").is_err());
    }
}
