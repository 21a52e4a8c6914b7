use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

pub const ACCESS_TOKEN_ENV: &str = "TMDB_READ_ACCESS_TOKEN";
pub const DEFAULT_OUTPUT_DIR: &str = "../database";
pub const DEFAULT_LISTING_URL: &str =
    "https://raw.githubusercontent.com/kalilurrahman/BoxOfficeData/main/boxofficemojoustop1000.tsv";

pub const MISSING_TOKEN_MESSAGE: &str = "Please set TMDB_READ_ACCESS_TOKEN in order to download the movie posters. \
You can also put tmdb_read_access_token = \"your-token\" in $XDG_CONFIG_HOME/poster-database/config.toml. \
A read access token is available from your TMDB account settings under API.";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    tmdb_read_access_token: Option<String>,
    output_dir: Option<PathBuf>,
    listing_url: Option<String>,
    #[serde(default)]
    title_overrides: BTreeMap<String, String>,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// TMDB bearer token. Only the download phase requires it.
    pub access_token: Option<String>,
    pub output_dir: PathBuf,
    pub listing_url: String,
    /// Extra listing title -> TMDB title rewrites, merged over the built-in table.
    pub title_overrides: BTreeMap<String, String>,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(get_config_path);
        let file = read_config_file(&config_path)?;
        let env_token = env::var(ACCESS_TOKEN_ENV).ok();
        Ok(Self::from_sources(cli, env_token, file))
    }

    fn from_sources(cli: &Cli, env_token: Option<String>, file: ConfigFile) -> Self {
        // Environment wins over the config file
        let access_token = env_token
            .or(file.tmdb_read_access_token)
            .filter(|token| !token.trim().is_empty());

        let output_dir = cli
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Self {
            access_token,
            output_dir,
            listing_url: file
                .listing_url
                .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string()),
            title_overrides: file.title_overrides,
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("poster-database"))
        // Fall back to the current directory when no config home is known
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file_or_env() {
        let settings = Settings::from_sources(&Cli::default(), None, ConfigFile::default());
        assert_eq!(settings.access_token, None);
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.listing_url, DEFAULT_LISTING_URL);
        assert!(settings.title_overrides.is_empty());
    }

    #[test]
    fn test_env_token_beats_file_token() {
        let file = ConfigFile {
            tmdb_read_access_token: Some("from-file".to_string()),
            ..Default::default()
        };
        let settings =
            Settings::from_sources(&Cli::default(), Some("from-env".to_string()), file);
        assert_eq!(settings.access_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let settings =
            Settings::from_sources(&Cli::default(), Some("   ".to_string()), ConfigFile::default());
        assert_eq!(settings.access_token, None);
    }

    #[test]
    fn test_cli_output_dir_beats_file() {
        let cli = Cli {
            output_dir: Some(PathBuf::from("/tmp/posters")),
            ..Default::default()
        };
        let file = ConfigFile {
            output_dir: Some(PathBuf::from("/srv/posters")),
            ..Default::default()
        };
        let settings = Settings::from_sources(&cli, None, file);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/posters"));
    }

    #[test]
    fn test_read_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
tmdb_read_access_token = "abc"
output_dir = "posters"

[title_overrides]
"Star Wars" = "Star Wars: Episode IV - A New Hope"
"#,
        )
        .unwrap();

        let file = read_config_file(&path).unwrap();
        assert_eq!(file.tmdb_read_access_token.as_deref(), Some("abc"));
        assert_eq!(file.output_dir, Some(PathBuf::from("posters")));
        assert_eq!(file.listing_url, None);
        assert_eq!(
            file.title_overrides.get("Star Wars").map(String::as_str),
            Some("Star Wars: Episode IV - A New Hope")
        );
    }

    #[test]
    fn test_missing_config_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let file = read_config_file(&temp_dir.path().join("nope.toml")).unwrap();
        assert!(file.tmdb_read_access_token.is_none());
        assert!(file.title_overrides.is_empty());
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "output_dir = [").unwrap();
        assert!(read_config_file(&path).is_err());
    }
}
