//! Configuration for lesspy.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LESSPY_HOME, LESSPY_DB, LESSPY_USER)
//! 2. Config file (.lesspy/config.yaml)
//! 3. Defaults (~/.lesspy, ~/.lesspy/lesspy.db)
//!
//! Config file discovery:
//! - Searches current directory and parents for .lesspy/config.yaml
//! - Relative paths in the config file resolve against the .lesspy/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_DB_FILE: &str = "lesspy.db";
const DEFAULT_LIST_LIMIT: usize = 50;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub cli: Option<CliConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to the .lesspy/ directory)
    pub home: Option<String>,
    /// Database file (relative to the .lesspy/ directory)
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Username acting when no --as flag is given
    pub user: Option<String>,
    /// Default row limit for list commands
    pub list_limit: Option<usize>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub home: PathBuf,
    pub database: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub user: Option<String>,
    pub list_limit: usize,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".lesspy").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Merge env vars, an optional parsed config file and defaults
fn resolve(
    default_home: PathBuf,
    file: Option<(&Path, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let (config_file, paths, cli) = match file {
        Some((path, config)) => (Some(path.to_path_buf()), config.paths, config.cli),
        None => (None, PathsConfig::default(), None),
    };
    let base = config_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let home = env("LESSPY_HOME")
        .map(PathBuf::from)
        .or_else(|| paths.home.as_deref().map(|h| resolve_path(&base, h)))
        .unwrap_or(default_home);

    let database = env("LESSPY_DB")
        .map(PathBuf::from)
        .or_else(|| paths.database.as_deref().map(|d| resolve_path(&base, d)))
        .unwrap_or_else(|| home.join(DEFAULT_DB_FILE));

    let user = env("LESSPY_USER").or_else(|| cli.as_ref().and_then(|c| c.user.clone()));
    let list_limit = cli
        .as_ref()
        .and_then(|c| c.list_limit)
        .unwrap_or(DEFAULT_LIST_LIMIT);

    ResolvedConfig {
        home,
        database,
        config_file,
        user,
        list_limit,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".lesspy");

    let config_path = find_config_file();
    let file = match &config_path {
        Some(path) => Some((path.as_path(), load_config_file(path)?)),
        None => None,
    };

    Ok(resolve(default_home, file, env_var))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(PathBuf::from("/home/u/.lesspy"), None, no_env);

        assert_eq!(config.home, PathBuf::from("/home/u/.lesspy"));
        assert_eq!(config.database, PathBuf::from("/home/u/.lesspy/lesspy.db"));
        assert!(config.config_file.is_none());
        assert_eq!(config.user, None);
        assert_eq!(config.list_limit, DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let lesspy_dir = temp.path().join(".lesspy");
        std::fs::create_dir_all(&lesspy_dir).unwrap();

        let config_path = lesspy_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  database: ./catalogue.db
cli:
  user: moderator
  list_limit: 10
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.paths.database, Some("./catalogue.db".to_string()));

        let config = resolve(
            PathBuf::from("/home/u/.lesspy"),
            Some((&config_path, parsed)),
            no_env,
        );
        assert_eq!(config.database, lesspy_dir.join("./catalogue.db"));
        assert_eq!(config.user.as_deref(), Some("moderator"));
        assert_eq!(config.list_limit, 10);
        assert_eq!(config.config_file.as_deref(), Some(config_path.as_path()));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            paths: PathsConfig {
                home: Some("state".to_string()),
                database: Some("db.sqlite".to_string()),
            },
            cli: Some(CliConfig {
                user: Some("ann".to_string()),
                list_limit: None,
            }),
        };
        let env = |name: &str| match name {
            "LESSPY_DB" => Some("/tmp/override.db".to_string()),
            "LESSPY_USER" => Some("bob".to_string()),
            _ => None,
        };

        let config = resolve(
            PathBuf::from("/home/u/.lesspy"),
            Some((Path::new("/proj/.lesspy/config.yaml"), file)),
            env,
        );
        assert_eq!(config.home, PathBuf::from("/proj/.lesspy/state"));
        assert_eq!(config.database, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.user.as_deref(), Some("bob"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project/.lesspy");

        assert_eq!(
            resolve_path(&base, "data/lesspy.db"),
            PathBuf::from("/home/user/project/.lesspy/data/lesspy.db")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
