//! Build-time version information and the `version` command.

use std::io::Write;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::command::{ArgsRule, Command};
use crate::flag::{Flag, Scalar, shared};
use crate::theme::Theme;

/// Width of the label column in the build information table.
const LABEL_WIDTH: usize = 14;

/// Version information baked into a binary at build time.
///
/// Empty fields are left out of both the rendered table and the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_commit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub git_branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub build_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rust_version: String,
    /// `<os>/<arch>`; filled in from the running binary when left empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            platform: default_platform(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn git_commit(mut self, commit: impl Into<String>) -> Self {
        self.git_commit = commit.into();
        self
    }

    #[must_use]
    pub fn git_branch(mut self, branch: impl Into<String>) -> Self {
        self.git_branch = branch.into();
        self
    }

    #[must_use]
    pub fn build_date(mut self, date: impl Into<String>) -> Self {
        self.build_date = date.into();
        self
    }

    #[must_use]
    pub fn rust_version(mut self, version: impl Into<String>) -> Self {
        self.rust_version = version.into();
        self
    }

    /// Fills in the platform when it was left empty.
    #[must_use]
    pub fn with_default_platform(mut self) -> Self {
        if self.platform.is_empty() {
            self.platform = default_platform();
        }
        self
    }

    fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("Git Commit", &self.git_commit),
            ("Git Branch", &self.git_branch),
            ("Build Date", &self.build_date),
            ("Rust Version", &self.rust_version),
            ("Platform", &self.platform),
        ]
    }
}

/// The platform of the running binary, e.g. `linux/x86_64`.
pub fn default_platform() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// Renders the version followed by a BUILD INFORMATION table of every
/// non-empty field.
pub fn render_version(info: &VersionInfo, theme: &Theme) -> String {
    let mut rendered = format!("{}\n", theme.flag_default.render(&info.version));

    let fields: Vec<(&str, &str)> = info
        .fields()
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    if fields.is_empty() {
        return rendered;
    }

    rendered.push('\n');
    rendered.push_str(&theme.header.render("BUILD INFORMATION"));
    rendered.push_str("\n\n");

    for (label, value) in fields {
        // Pad before styling so escape codes do not count toward the width.
        let label = format!("{label:<LABEL_WIDTH$}");
        rendered.push_str(&theme.description.render(label));
        rendered.push_str(&theme.flag_default.render(value));
        rendered.push('\n');
    }

    rendered
}

/// Writes `info` as pretty-printed JSON.
pub fn write_json(out: &mut dyn Write, info: &VersionInfo) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, info)?;
    writeln!(out)?;
    Ok(())
}

/// Builds the `version` command with its `--short` and `--json` flags.
pub(crate) fn version_command(info: VersionInfo) -> Command {
    let short = shared(Scalar::new(false));
    let json = shared(Scalar::new(false));
    let (short_value, json_value) = (short.clone(), json.clone());

    Command::new("version")
        .short("Print build time version information")
        .args(ArgsRule::None)
        .flag(Flag::new("short", &short).usage("display only the version number"))
        .flag(Flag::new("json", &json).usage("display version information as JSON"))
        .action(move |ctx| {
            let (short, json) = (short_value.borrow().get(), json_value.borrow().get());
            match (short, json) {
                (true, true) => bail!("flags --short and --json cannot be used together"),
                (_, true) => write_json(&mut *ctx.out, &info),
                (true, _) => {
                    writeln!(ctx.out, "{}", info.version)?;
                    Ok(())
                }
                _ => {
                    write!(ctx.out, "{}", render_version(&info, ctx.theme))?;
                    Ok(())
                }
            }
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn info() -> VersionInfo {
        VersionInfo {
            version: "0.5.0".to_string(),
            git_commit: "abc1234".to_string(),
            git_branch: "main".to_string(),
            ..VersionInfo::default()
        }
    }

    #[test]
    fn test_render_version_table() {
        assert_eq!(
            render_version(&info(), &Theme::plain()),
            "0.5.0\n\nBUILD INFORMATION\n\nGit Commit    abc1234\nGit Branch    main\n"
        );
    }

    #[test]
    fn test_render_version_only() {
        let info = VersionInfo {
            version: "1.0.0".to_string(),
            ..VersionInfo::default()
        };
        assert_eq!(render_version(&info, &Theme::plain()), "1.0.0\n");
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let mut out = Vec::new();
        write_json(&mut out, &info()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["version"], "0.5.0");
        assert_eq!(json["git_commit"], "abc1234");
        assert!(json.get("build_date").is_none());
    }

    #[test]
    fn test_default_platform() {
        let info = VersionInfo::new("1.0.0");
        assert_eq!(info.platform, default_platform());
        assert!(info.platform.contains('/'));

        let info = VersionInfo::default().with_default_platform();
        assert!(!info.platform.is_empty());
    }
}
