//! Rendering of flag lists, grouped or flat.

use std::io::{self, Write};

use crate::flag::{FlagDescriptor, ValueKind};
use crate::text::fill;
use crate::theme::{Paint, Theme};

/// Column at which flag descriptions start.
const FLAG_INDENT: usize = 10;

/// Longest environment value shown in a hint before it is cut.
const ENV_VALUE_LIMIT: usize = 20;

/// Flags sharing a group name, in visit order.
#[derive(Debug)]
pub struct FlagGroup<'a> {
    pub name: String,
    pub flags: Vec<&'a FlagDescriptor>,
}

/// Splits visible flags into the ungrouped ones and named groups.
///
/// Groups are ordered by the first flag that names them.
pub fn collect_groups(flags: &[FlagDescriptor]) -> (Vec<&FlagDescriptor>, Vec<FlagGroup<'_>>) {
    let mut ungrouped = Vec::new();
    let mut groups: Vec<FlagGroup<'_>> = Vec::new();

    for flag in flags.iter().filter(|f| !f.hidden) {
        match &flag.group {
            Some(name) => match groups.iter_mut().find(|g| &g.name == name) {
                Some(group) => group.flags.push(flag),
                None => groups.push(FlagGroup {
                    name: name.clone(),
                    flags: vec![flag],
                }),
            },
            None => ungrouped.push(flag),
        }
    }

    (ungrouped, groups)
}

/// Writes the ungrouped flags under `default_header`, then one section per
/// group under its uppercased name. Each section starts with a blank line.
pub fn render_grouped(
    w: &mut dyn Write,
    flags: &[FlagDescriptor],
    default_header: &str,
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let (ungrouped, groups) = collect_groups(flags);

    if !ungrouped.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", theme.header.render(default_header))?;
        render_list(w, &ungrouped, theme, width)?;
    }

    for group in groups {
        writeln!(w)?;
        writeln!(w, "{}", theme.header.render(group.name.to_uppercase()))?;
        render_list(w, &group.flags, theme, width)?;
    }

    Ok(())
}

/// Writes every visible flag, ignoring groups.
pub fn render_flat(
    w: &mut dyn Write,
    flags: &[FlagDescriptor],
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let visible: Vec<&FlagDescriptor> = flags.iter().filter(|f| !f.hidden).collect();
    render_list(w, &visible, theme, width)
}

fn render_list(
    w: &mut dyn Write,
    flags: &[&FlagDescriptor],
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let desc_width = width.saturating_sub(FLAG_INDENT);
    let indent = " ".repeat(FLAG_INDENT);

    for (i, flag) in flags.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "  {}", signature(flag, theme))?;

        let mut lines: Vec<String> = fill(&flag.usage, desc_width)
            .split('\n')
            .map(str::to_string)
            .collect();
        if has_default(&flag.default)
            && let Some(last) = lines.last_mut()
        {
            let formatted = format_default(&flag.default, default_kind(flag), theme.flag_default);
            *last = format!("{last} (default: {formatted})");
        }
        for line in lines {
            writeln!(w, "{indent}{}", theme.description.render(line))?;
        }

        if let Some(choices) = flag.choices.as_ref().filter(|c| c.has_help) {
            writeln!(w)?;
            writeln!(w, "{indent}{}", theme.description.render("Possible values:"))?;
            for entry in &choices.entries {
                if entry.help.is_empty() {
                    writeln!(w, "{indent}- {}", theme.flag_type.render(&entry.name))?;
                } else {
                    writeln!(
                        w,
                        "{indent}- {}: {}",
                        theme.flag_type.render(&entry.name),
                        theme.description.render(&entry.help)
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// The first line of a flag entry, e.g. `-o, --output <string>`.
fn signature(flag: &FlagDescriptor, theme: &Theme) -> String {
    let names = match flag.shorthand {
        Some(short) => format!("-{short}, --{}", flag.name),
        None => format!("    --{}", flag.name),
    };
    let mut line = theme.flag.render(names);

    if let Some(hint) = type_hint(flag) {
        line.push(' ');
        line.push_str(&theme.flag_type.render(format!("<{hint}>")));
    }

    if let Some(env_var) = &flag.env_var {
        line.push_str("  ");
        line.push_str(&env_hint(env_var, std::env::var(env_var).ok().as_deref(), theme));
    }

    line
}

/// The `<type>` shown after a flag's names; booleans take none.
///
/// Enumerations that list their values below show their base type instead.
fn type_hint(flag: &FlagDescriptor) -> Option<String> {
    if flag.kind == ValueKind::Bool && flag.choices.is_none() {
        return None;
    }
    match &flag.choices {
        Some(choices) if choices.has_help => Some(choices.base.name().to_string()),
        _ => Some(flag.type_name.clone()),
    }
}

/// `[env: NAME]`, or `[env: NAME=value]` when the variable is set.
pub fn env_hint(env_var: &str, value: Option<&str>, theme: &Theme) -> String {
    let name = theme.env_var.render(env_var);
    match value.filter(|v| !v.is_empty()) {
        None => format!("[env: {name}]"),
        Some(value) => {
            let shown = if value.chars().count() > ENV_VALUE_LIMIT {
                let cut: String = value.chars().take(ENV_VALUE_LIMIT).collect();
                format!("{cut}...")
            } else {
                value.to_string()
            };
            format!("[env: {name}={}]", theme.env_var_value.render(shown))
        }
    }
}

fn has_default(default: &str) -> bool {
    !matches!(default, "" | "false" | "0" | "[]")
}

fn default_kind(flag: &FlagDescriptor) -> ValueKind {
    flag.choices
        .as_ref()
        .map_or(flag.kind, |choices| choices.base.kind())
}

/// Formats a default value for the `(default: ...)` annotation.
///
/// Text is quoted, list elements are unbracketed and styled one by one, and
/// text-like list elements are quoted too.
pub fn format_default(value: &str, kind: ValueKind, paint: Paint) -> String {
    match kind {
        ValueKind::String => format!("\"{}\"", paint.render(value)),
        ValueKind::Strings | ValueKind::Ips => list_items(value)
            .map(|item| format!("\"{}\"", paint.render(item)))
            .collect::<Vec<_>>()
            .join(", "),
        ValueKind::Bools | ValueKind::Ints | ValueKind::Uints | ValueKind::Floats => {
            list_items(value)
                .map(|item| paint.render(item))
                .collect::<Vec<_>>()
                .join(", ")
        }
        _ => paint.render(value),
    }
}

fn list_items(value: &str) -> impl Iterator<Item = &str> {
    let trimmed = value.strip_suffix(']').unwrap_or(value);
    let trimmed = trimmed.strip_prefix('[').unwrap_or(trimmed);
    trimmed.split(',').filter(move |_| !trimmed.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flag::{BaseKind, EnumChoices, EnumOption};

    fn descriptor(name: &str, kind: ValueKind, default: &str) -> FlagDescriptor {
        FlagDescriptor {
            name: name.to_string(),
            shorthand: None,
            kind,
            type_name: kind.type_name().to_string(),
            default: default.to_string(),
            usage: format!("the {name}"),
            hidden: false,
            env_var: None,
            group: None,
            choices: None,
        }
    }

    fn render(flags: &[FlagDescriptor], width: usize) -> String {
        let mut out = Vec::new();
        render_flat(&mut out, flags, &Theme::plain(), width).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_zero_defaults_are_suppressed() {
        let flags = [
            descriptor("dry-run", ValueKind::Bool, "false"),
            descriptor("count", ValueKind::Int, "0"),
            descriptor("tags", ValueKind::Strings, "[]"),
            descriptor("name", ValueKind::String, ""),
        ];
        assert!(!render(&flags, 80).contains("default"));
    }

    #[test]
    fn test_string_default_is_quoted() {
        let mut flag = descriptor("log-level", ValueKind::String, "info");
        flag.shorthand = Some('l');
        assert_eq!(
            render(&[flag], 80),
            "  -l, --log-level <string>\n          the log-level (default: \"info\")\n"
        );
    }

    #[test]
    fn test_bool_flag_has_no_type() {
        let flag = descriptor("verbose", ValueKind::Bool, "false");
        assert_eq!(render(&[flag], 80), "      --verbose\n          the verbose\n");
    }

    #[test]
    fn test_list_defaults() {
        assert_eq!(
            format_default("[feat,fix]", ValueKind::Strings, Paint::plain()),
            "\"feat\", \"fix\""
        );
        assert_eq!(
            format_default("[1,2,3]", ValueKind::Ints, Paint::plain()),
            "1, 2, 3"
        );
        assert_eq!(format_default("1.5", ValueKind::Float, Paint::plain()), "1.5");
    }

    #[test]
    fn test_flags_separated_by_blank_line() {
        let flags = [
            descriptor("alpha", ValueKind::Bool, "false"),
            descriptor("beta", ValueKind::Bool, "false"),
        ];
        assert_eq!(
            render(&flags, 80),
            "      --alpha\n          the alpha\n\n      --beta\n          the beta\n"
        );
    }

    #[test]
    fn test_usage_wraps_below_flag_indent() {
        let mut flag = descriptor("config", ValueKind::String, "");
        flag.usage = "path to the configuration file to load at startup".to_string();
        let out = render(&[flag], 30);
        for line in out.lines().skip(1) {
            assert!(line.starts_with("          "));
            assert!(line.len() <= 30);
        }
        assert!(out.lines().count() > 2);
    }

    #[test]
    fn test_env_hint_truncates_long_values() {
        let theme = Theme::plain();
        assert_eq!(env_hint("TOKEN", None, &theme), "[env: TOKEN]");
        assert_eq!(env_hint("TOKEN", Some(""), &theme), "[env: TOKEN]");
        assert_eq!(env_hint("TOKEN", Some("abc"), &theme), "[env: TOKEN=abc]");
        assert_eq!(
            env_hint("TOKEN", Some("0123456789abcdefghijXYZ"), &theme),
            "[env: TOKEN=0123456789abcdefghij...]"
        );
    }

    #[test]
    fn test_enum_with_help_lists_possible_values() {
        let mut flag = descriptor("format", ValueKind::String, "json");
        flag.type_name = "json|yaml".to_string();
        flag.choices = Some(EnumChoices {
            entries: vec![
                EnumOption {
                    name: "json".to_string(),
                    help: "JavaScript Object Notation".to_string(),
                },
                EnumOption {
                    name: "yaml".to_string(),
                    help: String::new(),
                },
            ],
            has_help: true,
            base: BaseKind::String,
        });

        assert_eq!(
            render(&[flag], 80),
            "      --format <string>\n          the format (default: \"json\")\n\n          \
             Possible values:\n          - json: JavaScript Object Notation\n          - yaml\n"
        );
    }

    #[test]
    fn test_enum_without_help_shows_choices_as_type() {
        let mut flag = descriptor("trust", ValueKind::Int, "1");
        flag.type_name = "1|2|3".to_string();
        flag.choices = Some(EnumChoices {
            entries: Vec::new(),
            has_help: false,
            base: BaseKind::Int,
        });
        assert_eq!(
            render(&[flag], 80),
            "      --trust <1|2|3>\n          the trust (default: 1)\n"
        );
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let mut token = descriptor("token", ValueKind::String, "");
        token.group = Some("Authentication".to_string());
        let mut output = descriptor("output", ValueKind::String, "");
        output.group = Some("Output".to_string());
        let mut key = descriptor("api-key", ValueKind::String, "");
        key.group = Some("Authentication".to_string());
        let mut hidden = descriptor("secret", ValueKind::String, "");
        hidden.hidden = true;
        let flags = [token, output, descriptor("verbose", ValueKind::Bool, "false"), key, hidden];

        let (ungrouped, groups) = collect_groups(&flags);
        assert_eq!(ungrouped.len(), 1);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Authentication", "Output"]);
        assert_eq!(groups[0].flags.len(), 2);

        let mut out = Vec::new();
        render_grouped(&mut out, &flags, "FLAGS", &Theme::plain(), 80).unwrap();
        let out = String::from_utf8(out).unwrap();
        let flags_at = out.find("FLAGS").unwrap();
        let auth_at = out.find("AUTHENTICATION").unwrap();
        let output_at = out.find("OUTPUT").unwrap();
        assert!(flags_at < auth_at && auth_at < output_at);
        assert!(!out.contains("secret"));
    }
}
