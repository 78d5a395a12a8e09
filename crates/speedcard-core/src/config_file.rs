use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::entry::DEFAULT_NAME_PREFIX;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::pagination::PagePolicy;
use crate::store::DEFAULT_STORAGE_KEY;

/// Roster size used when nothing is configured.
pub const DEFAULT_ROSTER_SIZE: usize = 24;
/// Upper bound on the configured roster size.
pub const MAX_ROSTER_SIZE: usize = 500;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub roster: Option<RosterConfig>,
    pub storage: Option<StorageConfig>,
    pub export: Option<ExportConfig>,
    pub navigation: Option<NavigationConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub size: Option<usize>,
    pub name_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub key: Option<String>,
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub filename: Option<String>,
    pub dir: Option<String>,
    pub format: Option<String>,
    pub font_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub page_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub large_pager: Option<bool>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/speedcard/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("speedcard").join("config.toml"))
}

/// Load config by cascading CWD `.speedcard.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".speedcard.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Load an explicitly named config file. Unlike [`load_from_path`], a
/// missing or invalid file is an error.
pub fn load_strict(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        roster: Some(RosterConfig {
            size: overlay
                .roster
                .as_ref()
                .and_then(|r| r.size)
                .or_else(|| base.roster.as_ref().and_then(|r| r.size)),
            name_prefix: overlay
                .roster
                .as_ref()
                .and_then(|r| r.name_prefix.clone())
                .or_else(|| base.roster.as_ref().and_then(|r| r.name_prefix.clone())),
        }),
        storage: Some(StorageConfig {
            key: overlay
                .storage
                .as_ref()
                .and_then(|s| s.key.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.key.clone())),
            data_dir: overlay
                .storage
                .as_ref()
                .and_then(|s| s.data_dir.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.data_dir.clone())),
        }),
        export: Some(ExportConfig {
            filename: overlay
                .export
                .as_ref()
                .and_then(|e| e.filename.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.filename.clone())),
            dir: overlay
                .export
                .as_ref()
                .and_then(|e| e.dir.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.dir.clone())),
            format: overlay
                .export
                .as_ref()
                .and_then(|e| e.format.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.format.clone())),
            font_path: overlay
                .export
                .as_ref()
                .and_then(|e| e.font_path.clone())
                .or_else(|| base.export.as_ref().and_then(|e| e.font_path.clone())),
        }),
        navigation: Some(NavigationConfig {
            page_policy: overlay
                .navigation
                .as_ref()
                .and_then(|n| n.page_policy.clone())
                .or_else(|| {
                    base.navigation
                        .as_ref()
                        .and_then(|n| n.page_policy.clone())
                }),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            large_pager: overlay
                .display
                .as_ref()
                .and_then(|d| d.large_pager)
                .or_else(|| base.display.as_ref().and_then(|d| d.large_pager)),
            fps: overlay
                .display
                .as_ref()
                .and_then(|d| d.fps)
                .or_else(|| base.display.as_ref().and_then(|d| d.fps)),
        }),
    }
}

/// Write the display preferences into the config at `path`, keeping
/// everything else already in the file. A missing file is created; an
/// unparseable one is left alone and reported.
pub fn save_preferences(
    path: &Path,
    theme: &str,
    large_pager: bool,
    export_format: &str,
) -> Result<(), ConfigError> {
    let base = if path.exists() {
        load_strict(path)?
    } else {
        ConfigFile::default()
    };
    let overlay = ConfigFile {
        export: Some(ExportConfig {
            format: Some(export_format.to_string()),
            ..Default::default()
        }),
        display: Some(DisplayConfig {
            theme: Some(theme.to_string()),
            large_pager: Some(large_pager),
            fps: None,
        }),
        ..Default::default()
    };
    save_to_path(&merge(base, overlay), path)
}

/// Write a config as pretty TOML, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// How the roster is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSettings {
    pub size: usize,
    pub name_prefix: String,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_ROSTER_SIZE,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

/// Concrete settings after defaults are applied to a [`ConfigFile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub roster: RosterSettings,
    pub storage_key: String,
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub export_filename: String,
    /// `None` means the current directory.
    pub export_dir: Option<PathBuf>,
    pub export_format: String,
    pub font_path: Option<PathBuf>,
    pub page_policy: PagePolicy,
    pub theme: String,
    pub large_pager: bool,
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roster: RosterSettings::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            export_dir: None,
            export_format: "pdf".to_string(),
            font_path: None,
            page_policy: PagePolicy::default(),
            theme: "hacker".to_string(),
            large_pager: false,
            fps: 30,
        }
    }
}

impl Settings {
    /// Apply the values that are set (and non-empty) in `file` over the defaults.
    pub fn resolve(file: &ConfigFile) -> Self {
        let mut settings = Self::default();

        if let Some(roster) = &file.roster {
            if let Some(size) = roster.size {
                settings.roster.size = size.clamp(1, MAX_ROSTER_SIZE);
            }
            if let Some(prefix) = non_empty(&roster.name_prefix) {
                settings.roster.name_prefix = prefix.to_string();
            }
        }
        if let Some(storage) = &file.storage {
            if let Some(key) = non_empty(&storage.key) {
                settings.storage_key = key.to_string();
            }
            if let Some(dir) = non_empty(&storage.data_dir) {
                settings.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Some(export) = &file.export {
            if let Some(name) = non_empty(&export.filename) {
                settings.export_filename = name.to_string();
            }
            if let Some(dir) = non_empty(&export.dir) {
                settings.export_dir = Some(PathBuf::from(dir));
            }
            if let Some(format) = non_empty(&export.format) {
                settings.export_format = format.to_ascii_lowercase();
            }
            if let Some(font) = non_empty(&export.font_path) {
                settings.font_path = Some(PathBuf::from(font));
            }
        }
        if let Some(nav) = &file.navigation
            && let Some(name) = non_empty(&nav.page_policy)
        {
            match PagePolicy::from_name(name) {
                Some(policy) => settings.page_policy = policy,
                None => tracing::warn!(policy = name, "unknown page policy, keeping default"),
            }
        }
        if let Some(display) = &file.display {
            if let Some(theme) = non_empty(&display.theme) {
                settings.theme = theme.to_string();
            }
            if let Some(large) = display.large_pager {
                settings.large_pager = large;
            }
            if let Some(fps) = display.fps {
                settings.fps = fps.clamp(1, 120);
            }
        }

        settings
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = Settings::resolve(&ConfigFile::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.roster.size, 24);
        assert_eq!(settings.export_filename, "speed_dating_choices.pdf");
        assert_eq!(settings.storage_key, "paginatedData");
        assert_eq!(settings.page_policy, PagePolicy::Reject);
    }

    #[test]
    fn partial_toml_parses() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [roster]
            size = 20
            name_prefix = "Numer"

            [export]
            filename = "randki_lista.pdf"

            [navigation]
            page_policy = "clamp"
            "#,
        )
        .unwrap();
        let settings = Settings::resolve(&cfg);
        assert_eq!(settings.roster.size, 20);
        assert_eq!(settings.roster.name_prefix, "Numer");
        assert_eq!(settings.export_filename, "randki_lista.pdf");
        assert_eq!(settings.page_policy, PagePolicy::Clamp);
        assert_eq!(settings.theme, "hacker");
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base = ConfigFile {
            roster: Some(RosterConfig {
                size: Some(20),
                name_prefix: Some("Numer".into()),
            }),
            display: Some(DisplayConfig {
                theme: Some("modern".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            roster: Some(RosterConfig {
                size: Some(12),
                name_prefix: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let roster = merged.roster.as_ref().unwrap();
        assert_eq!(roster.size, Some(12));
        assert_eq!(roster.name_prefix.as_deref(), Some("Numer"));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn out_of_bounds_values_are_clamped() {
        let cfg = ConfigFile {
            roster: Some(RosterConfig {
                size: Some(0),
                name_prefix: Some(String::new()),
            }),
            display: Some(DisplayConfig {
                fps: Some(10_000),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = Settings::resolve(&cfg);
        assert_eq!(settings.roster.size, 1);
        assert_eq!(settings.roster.name_prefix, "Person");
        assert_eq!(settings.fps, 120);
    }

    #[test]
    fn unknown_policy_keeps_default() {
        let cfg = ConfigFile {
            navigation: Some(NavigationConfig {
                page_policy: Some("wrap".into()),
            }),
            ..Default::default()
        };
        assert_eq!(Settings::resolve(&cfg).page_policy, PagePolicy::Reject);
    }

    #[test]
    fn saving_preferences_keeps_the_rest_of_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[roster]\nsize = 20\n[display]\nfps = 60\n").unwrap();

        save_preferences(&path, "modern", true, "md").unwrap();
        let settings = Settings::resolve(&load_strict(&path).unwrap());
        assert_eq!(settings.roster.size, 20);
        assert_eq!(settings.fps, 60);
        assert_eq!(settings.theme, "modern");
        assert!(settings.large_pager);
        assert_eq!(settings.export_format, "md");
    }

    #[test]
    fn saving_preferences_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        save_preferences(&path, "hacker", false, "pdf").unwrap();
        let settings = Settings::resolve(&load_strict(&path).unwrap());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unparseable_config_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[roster\nsize = ").unwrap();
        assert!(matches!(
            save_preferences(&path, "modern", true, "pdf"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[roster\nsize = ");
    }

    #[test]
    fn garbage_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[roster\nsize = ").unwrap();
        assert!(load_from_path(&path).is_none());
        assert!(matches!(load_strict(&path), Err(ConfigError::Parse(_))));
        assert!(matches!(
            load_strict(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
