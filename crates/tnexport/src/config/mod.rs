use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use thiserror::Error;

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_SMARTSHEET_API_KEY: &str = "SMARTSHEET_API_KEY";
pub const ENV_SMARTSHEET_API_URL: &str = "SMARTSHEET_API_URL";

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_SMARTSHEET_API_URL: &str = "https://api.smartsheet.com/2.0";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Raised before any I/O when the environment cannot describe a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Builds the config from `lookup`, reporting every missing variable at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |name: &'static str| {
            let value = non_empty(lookup(name));
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let host = required(ENV_DB_HOST);
        let user = required(ENV_DB_USER);
        let password = required(ENV_DB_PASSWORD);
        let database = required(ENV_DB_NAME);
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let port = match non_empty(lookup(ENV_DB_PORT)) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|error| ConfigError::InvalidValue {
                    name: ENV_DB_PORT,
                    reason: error.to_string(),
                })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
        })
    }

    /// `user@host:port/database`, safe to log.
    #[must_use]
    pub fn target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SmartsheetConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl SmartsheetConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(lookup(ENV_SMARTSHEET_API_KEY))
            .ok_or_else(|| ConfigError::MissingVariables(vec![ENV_SMARTSHEET_API_KEY]))?;
        let base_url = non_empty(lookup(ENV_SMARTSHEET_API_URL))
            .unwrap_or_else(|| DEFAULT_SMARTSHEET_API_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for SmartsheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartsheetConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: Option<PathBuf>,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
}

/// Resolves where exports land. Without an override they go to `cwd`.
pub fn resolve_runtime_paths(
    home_dir: Option<&Path>,
    cwd: &Path,
    out_dir_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !cwd.is_absolute() {
        bail!("cwd must be absolute: {}", cwd.display());
    }
    if let Some(home_dir) = home_dir
        && !home_dir.is_absolute()
    {
        bail!("home_dir must be absolute: {}", home_dir.display());
    }

    let home_dir = home_dir.map(normalize_lexical);
    let cwd = normalize_lexical(cwd);
    let out_dir = match out_dir_override {
        Some(path) => resolve_user_path(path, home_dir.as_deref(), &cwd)?,
        None => cwd.clone(),
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        out_dir: normalize_lexical(&out_dir),
    })
}

fn resolve_user_path(path: &Path, home_dir: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path, home_dir)?;
    let resolved = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    Ok(normalize_lexical(&resolved))
}

fn expand_tilde(path: &Path, home_dir: Option<&Path>) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let Some(home_dir) = home_dir else {
                bail!(
                    "cannot expand `~` without a home directory; pass --home-dir: {}",
                    path.display()
                );
            };
            let mut expanded = home_dir.to_path_buf();
            for component in components {
                expanded.push(component.as_os_str());
            }
            Ok(expanded)
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "unsupported home expansion syntax (only `~` and `~/...` are supported): {}",
                path.display()
            )
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            _ => normalized.push(component.as_os_str()),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, DEFAULT_DB_PORT, DEFAULT_SMARTSHEET_API_URL, DatabaseConfig,
        SmartsheetConfig, resolve_runtime_paths,
    };
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn database_config_reads_all_credentials() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_USER", "reader"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "projects"),
        ]))
        .expect("config should build");

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, DEFAULT_DB_PORT);
        assert_eq!(config.target(), "reader@db.internal:3306/projects");
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn database_config_lists_every_missing_variable() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PASSWORD", "  "),
        ]))
        .expect_err("missing credentials must fail");

        assert_eq!(
            err,
            ConfigError::MissingVariables(vec!["DB_USER", "DB_PASSWORD", "DB_NAME"])
        );
        assert_eq!(
            err.to_string(),
            "missing required environment variables: DB_USER, DB_PASSWORD, DB_NAME"
        );
    }

    #[test]
    fn database_config_rejects_bad_port() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "h"),
            ("DB_USER", "u"),
            ("DB_PASSWORD", "p"),
            ("DB_NAME", "n"),
            ("DB_PORT", "eighty"),
        ]))
        .expect_err("non-numeric port must fail");

        assert!(matches!(err, ConfigError::InvalidValue { name: "DB_PORT", .. }));
    }

    #[test]
    fn smartsheet_config_defaults_base_url() {
        let config = SmartsheetConfig::from_lookup(lookup_from(&[("SMARTSHEET_API_KEY", "tok")]))
            .expect("config should build");

        assert_eq!(config.base_url, DEFAULT_SMARTSHEET_API_URL);
        assert!(!format!("{config:?}").contains("tok"));
    }

    #[test]
    fn smartsheet_config_requires_api_key() {
        let err = SmartsheetConfig::from_lookup(lookup_from(&[]))
            .expect_err("missing key must fail");
        assert_eq!(err, ConfigError::MissingVariables(vec!["SMARTSHEET_API_KEY"]));
    }

    #[test]
    fn out_dir_defaults_to_cwd() {
        let paths = resolve_runtime_paths(None, Path::new("/work/repo"), None)
            .expect("paths should resolve");

        assert_eq!(paths.out_dir, Path::new("/work/repo"));
    }

    #[test]
    fn expands_tilde_override_against_home_dir() {
        let paths = resolve_runtime_paths(
            Some(Path::new("/home/tester")),
            Path::new("/work/repo"),
            Some(Path::new("~/exports")),
        )
        .expect("tilde override should resolve");

        assert_eq!(paths.out_dir, Path::new("/home/tester/exports"));
    }

    #[test]
    fn resolves_relative_override_against_cwd() {
        let paths = resolve_runtime_paths(
            None,
            Path::new("/work/repo"),
            Some(Path::new("./calculator/../calculator")),
        )
        .expect("relative override should resolve");

        assert_eq!(paths.out_dir, Path::new("/work/repo/calculator"));
    }

    #[test]
    fn tilde_without_home_dir_fails() {
        let err = resolve_runtime_paths(None, Path::new("/work/repo"), Some(Path::new("~/x")))
            .expect_err("tilde without home must fail");

        assert!(
            err.to_string().contains("without a home directory"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_non_absolute_cwd() {
        let err = resolve_runtime_paths(None, Path::new("work/repo"), None)
            .expect_err("relative cwd must fail");

        assert!(
            err.to_string().contains("cwd must be absolute"),
            "unexpected error: {err}"
        );
    }
}
