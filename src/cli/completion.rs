//! Shell completion: the `completion` command and completion sources.
//!
//! Scripts are generated by `clap_complete` from the command tree, with
//! enumerated flags contributing their choices.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use anyhow::Result;
use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Arg, ValueEnum, ValueHint};

use super::parse::{self, Mode};
use crate::command::{ArgsRule, Command, Lineage};
use crate::error::Error;
use crate::flag::complete_flag;

/// A shell completion scripts can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

impl Shell {
    /// The shells enabled when none are configured.
    pub const DEFAULT: [Self; 3] = [Self::Bash, Self::Zsh, Self::Fish];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::PowerShell => "powershell",
            Self::Elvish => "elvish",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Bash => "Bourne Again Shell",
            Self::Zsh => "Z Shell",
            Self::Fish => "Friendly Interactive Shell",
            Self::PowerShell => "PowerShell",
            Self::Elvish => "Elvish",
        }
    }

    /// The command line that loads completions for `app` in this shell.
    pub fn install_example(self, app: &str) -> String {
        match self {
            Self::Bash | Self::Zsh => format!("source <({app} completion {})", self.name()),
            Self::Fish => format!("{app} completion fish | source"),
            Self::PowerShell => {
                format!("{app} completion powershell | Out-String | Invoke-Expression")
            }
            Self::Elvish => format!("eval ({app} completion elvish | slurp)"),
        }
    }

    const fn generator(self) -> clap_complete::Shell {
        match self {
            Self::Bash => clap_complete::Shell::Bash,
            Self::Zsh => clap_complete::Shell::Zsh,
            Self::Fish => clap_complete::Shell::Fish,
            Self::PowerShell => clap_complete::Shell::PowerShell,
            Self::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where completion candidates for a flag or argument come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completer {
    /// File paths. Extensions are recorded but not every shell filters on them.
    Files(Vec<String>),
    Directories,
    /// Executable names from `PATH`.
    Executables,
    Values(Vec<String>),
    /// Values paired with a description.
    ValuesDescribed(Vec<(String, String)>),
    /// No candidates, and no fallback to file names.
    None,
}

impl Completer {
    pub fn files<S: Into<String>>(extensions: impl IntoIterator<Item = S>) -> Self {
        Self::Files(extensions.into_iter().map(Into::into).collect())
    }

    pub fn values<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn values_described(pairs: &[(&str, &str)]) -> Self {
        Self::ValuesDescribed(
            pairs
                .iter()
                .map(|(value, help)| ((*value).to_string(), (*help).to_string()))
                .collect(),
        )
    }

    /// Attaches the completion hint to a clap argument.
    pub(crate) fn apply(&self, arg: Arg) -> Arg {
        match self {
            Self::Files(_) => arg.value_hint(ValueHint::FilePath),
            Self::Directories => arg.value_hint(ValueHint::DirPath),
            Self::Executables => arg.value_hint(ValueHint::CommandName),
            Self::Values(values) => {
                arg.value_parser(PossibleValuesParser::new(
                    values.iter().map(|value| PossibleValue::new(value.clone())),
                ))
            }
            Self::ValuesDescribed(pairs) => arg.value_parser(PossibleValuesParser::new(
                pairs
                    .iter()
                    .map(|(value, help)| PossibleValue::new(value.clone()).help(help.clone())),
            )),
            Self::None => arg.value_hint(ValueHint::Other),
        }
    }
}

/// Completion sources for one command and, by name, its subcommands.
///
/// Applied onto the command tree before any script is generated, so they
/// override completers set on the commands themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionScope {
    flags: Vec<(String, Completer)>,
    positional: BTreeMap<usize, Completer>,
    positional_any: Option<Completer>,
    subcommands: Vec<(String, Self)>,
}

impl CompletionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completes the value of the flag `name`, local or persistent.
    #[must_use]
    pub fn complete_flag(mut self, name: impl Into<String>, completer: Completer) -> Self {
        self.flags.push((name.into(), completer));
        self
    }

    /// Completes the positional argument at `index`, counting from zero.
    #[must_use]
    pub fn complete_positional(mut self, index: usize, completer: Completer) -> Self {
        self.positional.insert(index, completer);
        self
    }

    /// Completes every positional argument past the per-position ones.
    #[must_use]
    pub fn complete_positional_any(mut self, completer: Completer) -> Self {
        self.positional_any = Some(completer);
        self
    }

    /// Scopes completions to the subcommand `name`.
    #[must_use]
    pub fn complete_subcommand(mut self, name: impl Into<String>, scope: Self) -> Self {
        self.subcommands.push((name.into(), scope));
        self
    }

    /// Sets the completers on `command` and the named subcommands.
    ///
    /// Names that match no flag or subcommand are skipped.
    pub(crate) fn apply(&self, command: &mut Command) {
        for (name, completer) in &self.flags {
            complete_flag(command.lookup_flag_mut(name), completer.clone());
        }
        for (index, completer) in &self.positional {
            command.set_positional_completer(*index, completer.clone());
        }
        if let Some(completer) = &self.positional_any {
            command.set_args_completer(completer.clone());
        }
        for (name, scope) in &self.subcommands {
            if let Some(sub) = command.find_subcommand_mut(name) {
                scope.apply(sub);
            }
        }
    }
}

/// Which shells the `completion` command offers, and completion sources
/// for the root command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOptions {
    shells: Vec<Shell>,
    scope: CompletionScope,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            shells: Shell::DEFAULT.to_vec(),
            scope: CompletionScope::default(),
        }
    }
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default shells.
    #[must_use]
    pub fn with_shells(mut self, shells: &[Shell]) -> Self {
        self.shells = shells.to_vec();
        self
    }

    /// Adds shells to the defaults.
    #[must_use]
    pub fn with_extra_shells(mut self, shells: &[Shell]) -> Self {
        for shell in shells {
            if !self.shells.contains(shell) {
                self.shells.push(*shell);
            }
        }
        self
    }

    #[must_use]
    pub fn complete_flag(mut self, name: impl Into<String>, completer: Completer) -> Self {
        self.scope = self.scope.complete_flag(name, completer);
        self
    }

    #[must_use]
    pub fn complete_positional(mut self, index: usize, completer: Completer) -> Self {
        self.scope = self.scope.complete_positional(index, completer);
        self
    }

    #[must_use]
    pub fn complete_positional_any(mut self, completer: Completer) -> Self {
        self.scope = self.scope.complete_positional_any(completer);
        self
    }

    #[must_use]
    pub fn complete_subcommand(mut self, name: impl Into<String>, scope: CompletionScope) -> Self {
        self.scope = self.scope.complete_subcommand(name, scope);
        self
    }

    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    pub(crate) const fn scope(&self) -> &CompletionScope {
        &self.scope
    }
}

/// Builds the `completion <shell>` command for the application `app`.
pub(crate) fn completion_command(options: &CompletionOptions, app: &str) -> Command {
    let shells = options.shells.clone();
    let names: Vec<&str> = shells.iter().map(|s| s.name()).collect();

    let example = shells
        .iter()
        .map(|shell| format!("# {}\n{}", shell.description(), shell.install_example(app)))
        .collect::<Vec<_>>()
        .join("\n\n");

    let described: Vec<(&str, &str)> = shells.iter().map(|s| (s.name(), s.description())).collect();

    Command::new("completion <shell>")
        .short("Generate shell completion scripts for your shell")
        .long(format!(
            "Generate shell completion scripts for your shell.\n\nSupported shells: {}",
            names.join(", ")
        ))
        .example(example)
        .disable_flags_in_use_line()
        .hide_inherited_flags()
        .args(ArgsRule::Exact(1))
        .complete_args(Completer::values_described(&described))
        .action(move |ctx| {
            let requested = ctx.args.first().map(String::as_str).unwrap_or_default();
            let shell = shells
                .iter()
                .copied()
                .find(|shell| shell.name() == requested)
                .ok_or_else(|| Error::UnsupportedShell(requested.to_string()))?;
            generate(shell, ctx.root(), &mut *ctx.out)
        })
}

/// Writes the completion script for `root` in `shell`.
pub fn generate(shell: Shell, root: &Command, out: &mut dyn Write) -> Result<()> {
    let mut cmd = parse::build(&Lineage::root(root), Mode::Complete);
    clap_complete::generate(shell.generator(), &mut cmd, root.name(), out);
    Ok(())
}
