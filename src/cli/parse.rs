//! Bridge between the command tree and clap.
//!
//! Flags are parsed as raw strings; turning them into typed values is left
//! to each [`FlagValue`](crate::flag::FlagValue) so that error messages
//! come from the flag and not from clap.

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};

use super::Completer;
use crate::command::{Command, Lineage};
use crate::flag::{Flag, ValueKind};
use crate::text::dedent;

/// Id of the positional arguments of every command.
const ARGS_ID: &str = "ARGS";

/// What the clap command is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Parsing: every value is accepted as text.
    Parse,
    /// Completion scripts and man pages: choices and value hints attached.
    Complete,
}

/// One flag given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlagInput {
    /// Path of the command that defines the flag, below the root.
    pub owner: Vec<String>,
    pub name: String,
    pub values: Vec<String>,
}

/// The outcome of parsing the command line.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Parsed {
    /// Subcommand names below the root, e.g. `["deploy", "status"]`.
    pub path: Vec<String>,
    pub args: Vec<String>,
    pub flags: Vec<FlagInput>,
}

/// Builds the clap command for `lineage` and its descendants.
pub(crate) fn build(lineage: &Lineage<'_>, mode: Mode) -> clap::Command {
    let command = lineage.command();
    let mut cmd = clap::Command::new(command.name().to_string())
        .about(command.short_description().to_string())
        .hide(command.is_hidden())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .args_override_self(true);

    if !command.long_description().is_empty() {
        cmd = cmd.long_about(dedent(command.long_description()));
    }

    for flag in lineage.all_flags() {
        cmd = cmd.arg(flag_arg(flag, mode));
    }

    match mode {
        // Parsing always accepts positionals so the args rule reports them.
        Mode::Parse => cmd = cmd.arg(rest_arg(command, 1)),
        Mode::Complete if command.args_rule().takes_args() => {
            cmd = cmd.args(positional_args(command));
        }
        Mode::Complete => {}
    }

    for sub in command.subcommands() {
        cmd = cmd.subcommand(build(&lineage.child(sub), mode));
    }

    cmd
}

fn flag_arg(flag: &Flag, mode: Mode) -> Arg {
    let mut arg = Arg::new(flag.name().to_string())
        .long(flag.name().to_string())
        .help(flag.usage_text().to_string())
        .hide(flag.is_hidden())
        .value_parser(clap::value_parser!(String));

    if let Some(short) = flag.shorthand() {
        arg = arg.short(short);
    }

    arg = match flag.kind() {
        ValueKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .action(ArgAction::Set),
        kind if kind.is_list() => arg.action(ArgAction::Append).value_name(flag.type_name()),
        _ => arg.action(ArgAction::Set).value_name(flag.type_name()),
    };

    if mode == Mode::Complete {
        if let Some(choices) = flag.choices() {
            arg = arg.value_parser(PossibleValuesParser::new(choices.entries.into_iter().map(
                |entry| {
                    let value = PossibleValue::new(entry.name);
                    if entry.help.is_empty() {
                        value
                    } else {
                        value.help(entry.help)
                    }
                },
            )));
        }
        if let Some(completer) = flag.completer() {
            arg = completer.apply(arg);
        }
    }

    arg
}

/// The positional argument collecting every remaining value, at `index`.
fn rest_arg(command: &Command, index: usize) -> Arg {
    Arg::new(ARGS_ID)
        .index(index)
        .num_args(0..)
        .action(ArgAction::Append)
        .value_parser(clap::value_parser!(String))
        .value_name(placeholder(command))
}

/// One argument per position with a completer, then the rest.
///
/// Positions without a completer of their own complete nothing.
fn positional_args(command: &Command) -> Vec<Arg> {
    let positional = command.positional_completers();
    let mut args: Vec<Arg> = positional
        .iter()
        .enumerate()
        .map(|(i, completer)| {
            let arg = Arg::new(format!("ARG{i}"))
                .index(i + 1)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(String))
                .value_name(positional_name(command, i));
            completer.as_ref().unwrap_or(&Completer::None).apply(arg)
        })
        .collect();

    let has_rest = command
        .args_rule()
        .max_args()
        .is_none_or(|max| max > positional.len());
    if positional.is_empty() || has_rest {
        let mut arg = rest_arg(command, positional.len() + 1);
        if let Some(completer) = command.args_completer() {
            arg = completer.apply(arg);
        }
        args.push(arg);
    }
    args
}

/// The name of the positional at `index` in the use line, e.g. `dst` for
/// index 1 of `copy <src> <dst>`.
fn positional_name(command: &Command, index: usize) -> String {
    command
        .use_line()
        .split_whitespace()
        .skip(1)
        .nth(index)
        .map(|word| word.trim_matches(|c: char| matches!(c, '<' | '>' | '[' | ']' | '.')))
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("ARG{}", index + 1), str::to_string)
}

/// The value name of a command's positional arguments, taken from its use
/// line: `highlight <LINE>...` gives `LINE`.
fn placeholder(command: &Command) -> String {
    command
        .use_line()
        .split_once(' ')
        .map(|(_, args)| args.trim_matches(|c: char| matches!(c, '<' | '>' | '[' | ']' | '.')))
        .filter(|name| !name.is_empty() && !name.contains(' '))
        .unwrap_or(ARGS_ID)
        .to_string()
}

/// Parses `args`, which exclude the program name.
pub(crate) fn parse(root: &Command, args: &[String]) -> Result<Parsed, clap::Error> {
    let matches = build(&Lineage::root(root), Mode::Parse)
        .try_get_matches_from(std::iter::once(root.name().to_string()).chain(args.iter().cloned()))?;

    let mut parsed = Parsed::default();
    let mut lineage = Lineage::root(root);
    let mut current: &ArgMatches = &matches;

    loop {
        collect_flags(&lineage, current, &mut parsed);

        let Some((name, sub)) = current.subcommand() else {
            break;
        };
        let Some(child) = lineage.command().find_subcommand(name) else {
            break;
        };
        lineage = lineage.child(child);
        parsed.path.push(name.to_string());
        current = sub;
    }

    parsed.args = current
        .try_get_many::<String>(ARGS_ID)
        .ok()
        .flatten()
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(parsed)
}

fn collect_flags(lineage: &Lineage<'_>, matches: &ArgMatches, parsed: &mut Parsed) {
    for flag in lineage.all_flags() {
        let name = flag.name();
        if matches.value_source(name) != Some(ValueSource::CommandLine) {
            continue;
        }
        let Some(depth) = lineage.owner_depth(name) else {
            continue;
        };
        let values = matches
            .get_many::<String>(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        parsed.flags.push(FlagInput {
            owner: parsed.path[..depth].to_vec(),
            name: name.to_string(),
            values,
        });
    }
}

/// Finds the flag `name` defined on the command at `owner`.
pub(crate) fn owned_flag_mut<'a>(
    root: &'a mut Command,
    owner: &[String],
    name: &str,
) -> Option<&'a mut Flag> {
    let mut command = root;
    for segment in owner {
        command = command.find_subcommand_mut(segment)?;
    }
    command.lookup_flag_mut(name)
}

/// The subcommand path `args` point at, ignoring flags and unknown words.
///
/// Used to pick whose usage to show when parsing fails.
pub(crate) fn locate(root: &Command, args: &[String]) -> Vec<String> {
    let mut path = Vec::new();
    let mut command = root;
    for arg in args.iter().filter(|arg| !arg.starts_with('-')) {
        if let Some(sub) = command.find_subcommand(arg) {
            path.push(arg.clone());
            command = sub;
        }
    }
    path
}

/// The first line of a clap error, without its `error: ` prefix.
pub(crate) fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
