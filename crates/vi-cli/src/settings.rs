//! Company settings discovery and loading.
//!
//! Resolution order: `--settings` → `VI_SETTINGS` → `VI_CONFIG_DIR/settings.toml`
//! → `~/.config/vehicle-inspection/settings.toml` → built-in defaults.

use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use vi_report::{CompanySettings, ImageRef};

const ENV_SETTINGS_PATH: &str = "VI_SETTINGS";
const ENV_CONFIG_DIR: &str = "VI_CONFIG_DIR";
const SETTINGS_FILENAME: &str = "settings.toml";
const APP_NAME: &str = "vehicle-inspection";

/// Where the company settings came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingsSource {
    CliArgument,
    Environment,
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsSource::CliArgument => write!(f, "CLI argument"),
            SettingsSource::Environment => write!(f, "environment variable"),
            SettingsSource::XdgConfig => write!(f, "XDG config"),
            SettingsSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Find the settings file. An explicit CLI path must exist; the other
/// locations are skipped when missing.
pub fn resolve_settings_path(cli_path: Option<&Path>) -> Result<(Option<PathBuf>, SettingsSource)> {
    resolve_with(
        cli_path,
        |name| std::env::var(name).ok(),
        dirs::config_dir(),
    )
}

fn resolve_with(
    cli_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
    config_dir: Option<PathBuf>,
) -> Result<(Option<PathBuf>, SettingsSource)> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(CliError::SettingsNotFound(path.to_path_buf()));
        }
        return Ok((Some(path.to_path_buf()), SettingsSource::CliArgument));
    }

    if let Some(env_path) = lookup(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok((Some(path), SettingsSource::Environment));
        }
    }

    if let Some(dir) = lookup(ENV_CONFIG_DIR) {
        let path = PathBuf::from(dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return Ok((Some(path), SettingsSource::Environment));
        }
    }

    if let Some(xdg) = config_dir {
        let path = xdg.join(APP_NAME).join(SETTINGS_FILENAME);
        if path.exists() {
            return Ok((Some(path), SettingsSource::XdgConfig));
        }
    }

    Ok((None, SettingsSource::BuiltinDefault))
}

/// Resolve and load company settings.
pub fn load_settings(cli_path: Option<&Path>) -> Result<CompanySettings> {
    let (path, source) = resolve_settings_path(cli_path)?;
    debug!(source = %source, path = ?path, "company settings resolved");
    match path {
        Some(path) => read_settings(&path),
        None => Ok(CompanySettings::default()),
    }
}

/// Parse a settings file (`.json` as JSON, anything else as TOML).
///
/// Relative image paths are taken relative to the settings file.
pub fn read_settings(path: &Path) -> Result<CompanySettings> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings: CompanySettings = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        toml::from_str(&text).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    };
    if let Some(base) = path.parent() {
        settings.logo = settings.logo.map(|r| rebase_reference(&r, base));
        settings.watermark = settings.watermark.map(|r| rebase_reference(&r, base));
    }
    Ok(settings)
}

/// Join a relative file reference onto `base`; other references are returned as-is.
pub fn rebase_reference(reference: &str, base: &Path) -> String {
    match ImageRef::parse(reference) {
        Ok(ImageRef::File(path)) if path.is_relative() => base.join(path).display().to_string(),
        _ => reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_path_must_exist() {
        let err = resolve_with(Some(Path::new("/nonexistent/settings.toml")), no_env, None)
            .unwrap_err();
        assert!(matches!(err, CliError::SettingsNotFound(_)));
    }

    #[test]
    fn test_env_then_config_dir_then_xdg() {
        let dir = TempDir::new().unwrap();
        let env_file = dir.path().join("env.toml");
        std::fs::write(&env_file, "name = \"A\"").unwrap();
        let config_dir = dir.path().join("cfg");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(SETTINGS_FILENAME), "name = \"B\"").unwrap();
        let xdg = dir.path().join("xdg");
        std::fs::create_dir_all(xdg.join(APP_NAME)).unwrap();
        std::fs::write(xdg.join(APP_NAME).join(SETTINGS_FILENAME), "name = \"C\"").unwrap();

        let env_path = env_file.display().to_string();
        let cfg_path = config_dir.display().to_string();
        let (path, source) = resolve_with(
            None,
            |name| match name {
                ENV_SETTINGS_PATH => Some(env_path.clone()),
                ENV_CONFIG_DIR => Some(cfg_path.clone()),
                _ => None,
            },
            Some(xdg.clone()),
        )
        .unwrap();
        assert_eq!(path, Some(env_file.clone()));
        assert_eq!(source, SettingsSource::Environment);

        let (path, _) = resolve_with(
            None,
            |name| (name == ENV_CONFIG_DIR).then(|| cfg_path.clone()),
            Some(xdg.clone()),
        )
        .unwrap();
        assert_eq!(path, Some(config_dir.join(SETTINGS_FILENAME)));

        let (path, source) = resolve_with(None, no_env, Some(xdg.clone())).unwrap();
        assert_eq!(path, Some(xdg.join(APP_NAME).join(SETTINGS_FILENAME)));
        assert_eq!(source, SettingsSource::XdgConfig);
    }

    #[test]
    fn test_defaults_when_nothing_found() {
        let (path, source) = resolve_with(None, no_env, None).unwrap();
        assert!(path.is_none());
        assert_eq!(source, SettingsSource::BuiltinDefault);
    }

    #[test]
    fn test_read_toml_rebases_logo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            concat!(
                "name = \"Autos del Valle\"\n",
                "tax_id = \"900.123.456-7\"\n",
                "logo = \"logo.png\"\n",
                "watermark = \"https://cdn.example.com/wm.png\"\n",
            ),
        )
        .unwrap();
        let settings = read_settings(&path).unwrap();
        assert_eq!(settings.name, "Autos del Valle");
        assert_eq!(
            settings.logo.as_deref(),
            Some(dir.path().join("logo.png").display().to_string().as_str())
        );
        assert_eq!(settings.watermark.as_deref(), Some("https://cdn.example.com/wm.png"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "name = ").unwrap();
        assert!(matches!(read_settings(&path), Err(CliError::Toml { .. })));
    }
}
