//! Help page rendering.
//!
//! [`render`] turns any [`HelpSource`] into a help page, in this order:
//! description, USAGE, COMMANDS, EXAMPLES, flag sections, GLOBAL FLAGS.
//! Sections with nothing to show are skipped.

mod flags;

use std::collections::HashSet;
use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::example::render_examples;
use crate::flag::FlagDescriptor;
use crate::text::{dedent, fill};
use crate::theme::Theme;

pub use flags::{FlagGroup, collect_groups, env_hint, format_default, render_flat, render_grouped};

/// A visible subcommand as listed in the COMMANDS table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    pub short: String,
}

/// The read-only view of a command the renderer needs.
pub trait HelpSource {
    fn name(&self) -> &str;

    /// The names from the root down to this command, space separated.
    fn command_path(&self) -> String;

    fn short(&self) -> &str;

    fn long(&self) -> &str;

    fn example(&self) -> &str;

    /// The declared invocation, e.g. `deploy <env>`.
    fn use_line(&self) -> &str;

    /// Flags defined on the command, hidden ones included.
    fn local_flags(&self) -> Vec<FlagDescriptor>;

    /// Flags inherited from ancestors, hidden ones included.
    fn inherited_flags(&self) -> Vec<FlagDescriptor>;

    /// Visible subcommands in display order.
    fn subcommands(&self) -> Vec<CommandSummary>;

    /// Names of the root command's visible subcommands.
    fn root_subcommands(&self) -> HashSet<String>;

    fn disable_flags_in_use_line(&self) -> bool;

    fn hide_inherited_flags(&self) -> bool;
}

/// Writes the help page of `source`.
///
/// Text is wrapped to `width` columns; `0` disables wrapping. Only write
/// failures are reported.
pub fn render(
    w: &mut dyn Write,
    source: &dyn HelpSource,
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let description = if source.long().is_empty() {
        source.short()
    } else {
        source.long()
    };
    if !description.is_empty() {
        writeln!(w, "{}", fill(&dedent(description), width))?;
        writeln!(w)?;
    }

    let local = source.local_flags();
    let inherited = source.inherited_flags();
    let subcommands = source.subcommands();

    writeln!(w, "{}", theme.header.render("USAGE"))?;
    writeln!(w, "  {}", usage_line(source, &local, &inherited, !subcommands.is_empty(), theme))?;

    if !subcommands.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", theme.header.render("COMMANDS"))?;
        render_commands(w, &subcommands, theme, width)?;
    }

    if !source.example().is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", theme.header.render("EXAMPLES"))?;
        render_examples(w, &dedent(source.example()), &source.root_subcommands(), theme)?;
    }

    if has_visible(&local) {
        render_grouped(w, &local, "FLAGS", theme, width)?;
    }

    if has_visible(&inherited) && !source.hide_inherited_flags() {
        writeln!(w)?;
        writeln!(w, "{}", theme.header.render("GLOBAL FLAGS"))?;
        render_flat(w, &inherited, theme, width)?;
    }

    Ok(())
}

/// Renders the help page of `source` into a string.
pub fn render_to_string(
    source: &dyn HelpSource,
    theme: &Theme,
    width: usize,
) -> io::Result<String> {
    let mut out = Vec::new();
    render(&mut out, source, theme, width)?;
    String::from_utf8(out).map_err(io::Error::other)
}

fn has_visible(flags: &[FlagDescriptor]) -> bool {
    flags.iter().any(|f| !f.hidden)
}

/// `app deploy [FLAGS] <env> [COMMAND]`
fn usage_line(
    source: &dyn HelpSource,
    local: &[FlagDescriptor],
    inherited: &[FlagDescriptor],
    has_subcommands: bool,
    theme: &Theme,
) -> String {
    let mut parts = vec![theme.command.render(source.command_path())];

    if (has_visible(local) || has_visible(inherited)) && !source.disable_flags_in_use_line() {
        parts.push(theme.flag_type.render("[FLAGS]"));
    }

    if let Some((_, args)) = source.use_line().split_once(' ')
        && !args.is_empty()
    {
        parts.push(theme.flag_type.render(args));
    }

    if has_subcommands {
        parts.push(theme.flag_type.render("[COMMAND]"));
    }

    parts.join(" ")
}

/// The COMMANDS table: names padded to a common column, descriptions
/// wrapped to the remaining width.
fn render_commands(
    w: &mut dyn Write,
    subcommands: &[CommandSummary],
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let max_len = subcommands
        .iter()
        .map(|sub| sub.name.width())
        .max()
        .unwrap_or(0);
    let indent = 2 + max_len + 4;
    let desc_width = width.saturating_sub(indent);

    for sub in subcommands {
        let padding = " ".repeat(max_len - sub.name.width() + 4);
        let wrapped = fill(&sub.short, desc_width);
        let mut lines = wrapped.split('\n');

        writeln!(
            w,
            "  {}{padding}{}",
            theme.command.render(&sub.name),
            theme.description.render(lines.next().unwrap_or_default())
        )?;
        for line in lines {
            writeln!(w, "{}{}", " ".repeat(indent), theme.description.render(line))?;
        }
    }

    Ok(())
}
