use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands, Theme};
use crate::overlay::DEFAULT_ROWS_TO_SHOW;

// ---------------------------------------------------------------------------
// TOML-deserializable config (intermediate representation)
// ---------------------------------------------------------------------------

/// Raw config as parsed from the TOML file.
/// All fields are optional so that missing keys fall through to defaults.
/// Unknown keys are silently ignored by serde.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    verbose: Option<bool>,
    theme: Option<String>,
    ascii: Option<bool>,
    display: FileDisplayConfig,
    export: FileExportConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileDisplayConfig {
    rows: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileExportConfig {
    width: Option<u16>,
    height: Option<u16>,
}

// ---------------------------------------------------------------------------
// Effective (merged) config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub verbose: bool,
    pub theme: Theme,
    pub ascii: bool,
    pub display: DisplayConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Row slots in the scrolling window.
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Frame size in cells.
    pub width: u16,
    pub height: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            theme: Theme::Dark,
            ascii: false,
            display: DisplayConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS_TO_SHOW,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 32,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Returns the default config file path: `~/.config/testreel/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("testreel").join("config.toml"))
}

/// Load the config file from the given path.
/// Returns `None` if the file does not exist or cannot be parsed.
fn load_file_config(path: &Path) -> Option<FileConfig> {
    if !path.exists() {
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!(
                    "testreel: warning: failed to parse config file {}: {}",
                    path.display(),
                    e
                );
                None
            }
        },
        Err(e) => {
            eprintln!(
                "testreel: warning: failed to read config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

/// Parse a theme string from the config file into a `Theme` enum.
/// Returns `None` if the string is not recognized (caller uses default).
fn parse_theme(s: &str) -> Option<Theme> {
    match s.to_lowercase().as_str() {
        "dark" => Some(Theme::Dark),
        "light" => Some(Theme::Light),
        other => {
            eprintln!(
                "testreel: warning: unknown theme \"{}\", using default",
                other
            );
            None
        }
    }
}

/// Build the effective `AppConfig` by merging defaults, config file, and CLI args.
///
/// Precedence (highest wins):
/// 1. CLI flags (if explicitly provided)
/// 2. Config file values
/// 3. Hardcoded defaults
pub fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();

    let config_path = cli.config.clone().or_else(default_config_path);

    if let Some(ref path) = config_path {
        if let Some(file_cfg) = load_file_config(path) {
            if let Some(v) = file_cfg.verbose {
                config.verbose = v;
            }
            if let Some(ref t) = file_cfg.theme {
                if let Some(theme) = parse_theme(t) {
                    config.theme = theme;
                }
            }
            if let Some(a) = file_cfg.ascii {
                config.ascii = a;
            }
            if let Some(rows) = file_cfg.display.rows {
                config.display.rows = rows.max(1);
            }
            if let Some(w) = file_cfg.export.width {
                config.export.width = w;
            }
            if let Some(h) = file_cfg.export.height {
                config.export.height = h;
            }
        } else if cli.config.is_some() && !path.exists() {
            // Explicit --config that could not be loaded. Parse failures
            // were already reported by load_file_config.
            eprintln!(
                "testreel: warning: config file not found: {}",
                path.display()
            );
        }
    }

    if cli.verbose {
        config.verbose = true;
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if cli.ascii {
        config.ascii = true;
    }
    if let Some(Commands::Export(ref args)) = cli.command {
        if let Some(w) = args.width {
            config.export.width = w;
        }
        if let Some(h) = args.height {
            config.export.height = h;
        }
    }

    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ExportArgs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse_file_config(toml_str: &str) -> Option<FileConfig> {
        toml::from_str::<FileConfig>(toml_str).ok()
    }

    fn load_from_string(toml_str: &str) -> Option<FileConfig> {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(toml_str.as_bytes()).unwrap();
        load_file_config(f.path())
    }

    fn temp_config(toml_str: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(toml_str.as_bytes()).unwrap();
        f
    }

    /// Helper: build a minimal Cli struct for testing
    fn default_cli() -> Cli {
        Cli {
            project: PathBuf::from("run"),
            verbose: false,
            theme: None,
            ascii: false,
            config: Some(PathBuf::from("/tmp/testreel-nonexistent-54321.toml")),
            command: None,
        }
    }

    // -- Default config tests -------------------------------------------------

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.verbose);
        assert_eq!(config.theme, Theme::Dark);
        assert!(!config.ascii);
        assert_eq!(config.display.rows, 17);
        assert_eq!(config.export.width, 80);
        assert_eq!(config.export.height, 32);
    }

    // -- TOML parsing tests ---------------------------------------------------

    #[test]
    fn test_parse_valid_full_config() {
        let toml = r#"
verbose = true
theme = "light"
ascii = true

[display]
rows = 12

[export]
width = 120
height = 40
"#;
        let cfg = parse_file_config(toml).unwrap();
        assert_eq!(cfg.verbose, Some(true));
        assert_eq!(cfg.theme.as_deref(), Some("light"));
        assert_eq!(cfg.ascii, Some(true));
        assert_eq!(cfg.display.rows, Some(12));
        assert_eq!(cfg.export.width, Some(120));
        assert_eq!(cfg.export.height, Some(40));
    }

    #[test]
    fn test_parse_empty_config() {
        let cfg = parse_file_config("").unwrap();
        assert_eq!(cfg.verbose, None);
        assert_eq!(cfg.theme, None);
        assert_eq!(cfg.display.rows, None);
        assert_eq!(cfg.export.width, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml = r#"
verbose = false
unknown_key = "should be ignored"

[display]
rows = 9
fancy_mode = true

[unknown_section]
foo = "bar"
"#;
        let cfg = parse_file_config(toml).unwrap();
        assert_eq!(cfg.verbose, Some(false));
        assert_eq!(cfg.display.rows, Some(9));
    }

    #[test]
    fn test_malformed_toml_returns_none() {
        assert!(parse_file_config("this is not valid toml [[[").is_none());
        assert!(load_from_string("not valid {{{{ toml").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let path = Path::new("/tmp/testreel-test-nonexistent-config-12345.toml");
        assert!(load_file_config(path).is_none());
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("Dark"), Some(Theme::Dark));
        assert_eq!(parse_theme("LIGHT"), Some(Theme::Light));
        assert_eq!(parse_theme("solarized"), None);
    }

    // -- build_config merge tests ---------------------------------------------

    #[test]
    fn test_build_config_defaults_no_file() {
        let config = build_config(&default_cli());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_build_config_file_overrides_defaults() {
        let f = temp_config(
            r#"
theme = "light"
ascii = true

[display]
rows = 5

[export]
width = 100
"#,
        );
        let cli = Cli {
            config: Some(f.path().to_path_buf()),
            ..default_cli()
        };
        let config = build_config(&cli);
        assert_eq!(config.theme, Theme::Light);
        assert!(config.ascii);
        assert_eq!(config.display.rows, 5);
        assert_eq!(config.export.width, 100);
        assert_eq!(config.export.height, 32);
    }

    #[test]
    fn test_build_config_zero_rows_is_clamped() {
        let f = temp_config("[display]\nrows = 0\n");
        let cli = Cli {
            config: Some(f.path().to_path_buf()),
            ..default_cli()
        };
        assert_eq!(build_config(&cli).display.rows, 1);
    }

    #[test]
    fn test_build_config_cli_overrides_file() {
        let f = temp_config("verbose = false\ntheme = \"light\"\n");
        let cli = Cli {
            config: Some(f.path().to_path_buf()),
            verbose: true,
            theme: Some(Theme::Dark),
            ascii: true,
            ..default_cli()
        };
        let config = build_config(&cli);
        assert!(config.verbose);
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.ascii);
    }

    #[test]
    fn test_build_config_export_args_override_size() {
        let f = temp_config("[export]\nwidth = 100\nheight = 50\n");
        let cli = Cli {
            config: Some(f.path().to_path_buf()),
            command: Some(Commands::Export(ExportArgs {
                out: PathBuf::from("frames"),
                from: None,
                to: None,
                width: Some(64),
                height: None,
            })),
            ..default_cli()
        };
        let config = build_config(&cli);
        assert_eq!(config.export.width, 64);
        assert_eq!(config.export.height, 50);
    }

    #[test]
    fn test_build_config_unknown_theme_in_file_uses_default() {
        let f = temp_config("theme = \"solarized\"\n");
        let cli = Cli {
            config: Some(f.path().to_path_buf()),
            ..default_cli()
        };
        assert_eq!(build_config(&cli).theme, Theme::Dark);
    }
}
