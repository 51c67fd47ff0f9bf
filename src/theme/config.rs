use anyhow::{Context, Result, bail};
use owo_colors::{Rgb, Style};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::palette::Background;
use super::{Paint, Theme};
use crate::paths;

/// Built-in theme a theme file starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Plain,
    Clay,
}

/// Style override for one element of the theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    /// Foreground color as `#rrggbb`.
    #[serde(default)]
    pub fg: Option<String>,
    /// Background color as `#rrggbb`.
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl StyleSpec {
    fn to_paint(&self) -> Result<Paint> {
        let mut style = Style::new();
        if let Some(fg) = &self.fg {
            style = style.color(parse_hex(fg)?);
        }
        if let Some(bg) = &self.bg {
            style = style.on_color(parse_hex(bg)?);
        }
        if self.bold {
            style = style.bold();
        }
        if self.italic {
            style = style.italic();
        }
        Ok(Paint::new(style))
    }
}

/// The theme file structure.
///
/// Corresponds to `~/.config/<app>/theme.toml`:
///
/// ```toml
/// preset = "clay"
/// background = "light"
/// width = 100
///
/// [styles.header]
/// fg = "#ffffff"
/// bold = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeFile {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default)]
    pub background: Background,
    /// Wrap width for help output; `0` disables wrapping.
    #[serde(default)]
    pub width: Option<usize>,
    /// Per-element overrides keyed by element name.
    #[serde(default)]
    pub styles: BTreeMap<String, StyleSpec>,
}

impl ThemeFile {
    /// Builds the theme described by this file.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown element name or a malformed color.
    pub fn resolve(&self) -> Result<Theme> {
        let mut theme = match self.preset {
            Preset::Plain => Theme::plain(),
            Preset::Clay => Theme::clay(self.background),
        };

        for (element, spec) in &self.styles {
            let paint = spec
                .to_paint()
                .with_context(|| format!("Invalid style for '{element}'"))?;
            let slot = match element.as_str() {
                "command" => &mut theme.command,
                "comment" => &mut theme.comment,
                "description" => &mut theme.description,
                "env_var" => &mut theme.env_var,
                "env_var_value" => &mut theme.env_var_value,
                "flag" => &mut theme.flag,
                "flag_default" => &mut theme.flag_default,
                "flag_type" => &mut theme.flag_type,
                "header" => &mut theme.header,
                "operator" => &mut theme.operator,
                other => bail!("Unknown theme element '{other}'"),
            };
            *slot = paint;
        }

        Ok(theme)
    }
}

/// Parses a `#rrggbb` color.
fn parse_hex(value: &str) -> Result<Rgb> {
    let digits = value
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| anyhow::anyhow!("Invalid color '{value}': expected #rrggbb"))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .with_context(|| format!("Invalid color '{value}'"))
    };
    Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Manages loading and saving theme files.
pub struct ThemeManager {
    theme_path: PathBuf,
}

impl ThemeManager {
    /// Creates a theme manager for the application `app`.
    ///
    /// The theme is stored at `$XDG_CONFIG_HOME/<app>/theme.toml`
    /// or `~/.config/<app>/theme.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new(app: &str) -> Result<Self> {
        Ok(Self {
            theme_path: paths::config_dir(app)?.join("theme.toml"),
        })
    }

    /// Creates a theme manager for an explicit file.
    pub const fn at(theme_path: PathBuf) -> Self {
        Self { theme_path }
    }

    pub const fn theme_path(&self) -> &PathBuf {
        &self.theme_path
    }

    pub fn load(&self) -> Result<ThemeFile> {
        let contents = fs::read_to_string(&self.theme_path).with_context(|| {
            format!("Failed to read theme file: {}", self.theme_path.display())
        })?;

        let theme_file: ThemeFile =
            toml::from_str(&contents).with_context(|| "Failed to parse theme file")?;

        Ok(theme_file)
    }

    pub fn save(&self, theme_file: &ThemeFile) -> Result<()> {
        if let Some(parent) = self.theme_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(theme_file).context("Failed to serialize theme file")?;

        fs::write(&self.theme_path, contents).with_context(|| {
            format!("Failed to write theme file: {}", self.theme_path.display())
        })?;

        Ok(())
    }

    /// Loads the theme file, falling back to defaults when it is missing.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ThemeFile> {
        if self.theme_path.exists() {
            self.load()
        } else {
            Ok(ThemeFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ThemeManager {
        ThemeManager::at(temp_dir.path().join("helpkit").join("theme.toml"))
    }

    #[test]
    fn test_save_and_load_theme_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let mut styles = BTreeMap::new();
        styles.insert(
            "header".to_string(),
            StyleSpec {
                fg: Some("#ffffff".to_string()),
                bold: true,
                ..StyleSpec::default()
            },
        );
        let theme_file = ThemeFile {
            preset: Preset::Clay,
            background: Background::Light,
            width: Some(100),
            styles,
        };

        manager.save(&theme_file).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.preset, Preset::Clay);
        assert_eq!(loaded.background, Background::Light);
        assert_eq!(loaded.width, Some(100));
        assert_eq!(loaded.styles.get("header"), theme_file.styles.get("header"));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let theme_file = manager.load_or_default().unwrap();
        assert_eq!(theme_file.preset, Preset::Plain);
        assert!(theme_file.width.is_none());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.theme_path().parent().unwrap()).unwrap();
        fs::write(manager.theme_path(), "preset = [").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    fn test_parse_minimal_file() {
        let theme_file: ThemeFile = toml::from_str("preset = \"clay\"").unwrap();
        assert_eq!(theme_file.preset, Preset::Clay);
        assert_eq!(theme_file.background, Background::Dark);
        assert!(theme_file.resolve().is_ok());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let theme_file: ThemeFile = toml::from_str(
            "[styles.operator]\nfg = \"#db8080\"\nbold = true\n",
        )
        .unwrap();
        let theme = theme_file.resolve().unwrap();
        assert!(!theme.operator.is_plain());
        assert!(theme.command.is_plain());
    }

    #[test]
    fn test_resolve_rejects_unknown_element() {
        let theme_file: ThemeFile = toml::from_str("[styles.banner]\nbold = true\n").unwrap();
        let err = theme_file.resolve().unwrap_err();
        assert!(err.to_string().contains("Unknown theme element 'banner'"));
    }

    #[test]
    fn test_parse_hex() {
        let color = parse_hex("#a980db").unwrap();
        assert_eq!((color.0, color.1, color.2), (0xa9, 0x80, 0xdb));
        assert!(parse_hex("a980db").is_err());
        assert!(parse_hex("#a980d").is_err());
        assert!(parse_hex("#zz80db").is_err());
    }
}
