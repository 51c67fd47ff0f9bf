//! The in-memory command tree.
//!
//! A [`Command`] is built once at startup. [`Lineage`] is a command together
//! with its ancestors, which is what flag inheritance and help rendering
//! need.

use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;

use crate::cli::Completer;
use crate::flag::{Flag, FlagDescriptor, FlagSet};
use crate::help::{self, CommandSummary, HelpSource};
use crate::theme::Theme;

/// The body of a command.
pub type Action = Box<dyn Fn(&mut Context<'_>) -> Result<()>>;

/// The positional arguments a command accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgsRule {
    #[default]
    Any,
    None,
    Exact(usize),
    /// At least this many.
    Min(usize),
    Range(usize, usize),
}

impl ArgsRule {
    /// Checks `args` for the command at `path`, describing any violation.
    pub fn check(self, path: &str, args: &[String]) -> Result<(), String> {
        match self {
            Self::Any => Ok(()),
            Self::None => match args.first() {
                Some(arg) => Err(format!("unknown command \"{arg}\" for \"{path}\"")),
                None => Ok(()),
            },
            Self::Exact(n) if args.len() != n => Err(format!(
                "accepts {n} arg(s), received {}",
                args.len()
            )),
            Self::Min(n) if args.len() < n => Err(format!(
                "requires at least {n} arg(s), only received {}",
                args.len()
            )),
            Self::Range(min, max) if args.len() < min || args.len() > max => Err(format!(
                "accepts between {min} and {max} arg(s), received {}",
                args.len()
            )),
            Self::Exact(_) | Self::Min(_) | Self::Range(..) => Ok(()),
        }
    }

    /// Whether any positional argument can be given.
    pub const fn takes_args(self) -> bool {
        !matches!(self, Self::None | Self::Exact(0) | Self::Range(0, 0))
    }

    /// The most positional arguments accepted, `None` when unbounded.
    pub const fn max_args(self) -> Option<usize> {
        match self {
            Self::Any | Self::Min(_) => None,
            Self::None => Some(0),
            Self::Exact(n) | Self::Range(_, n) => Some(n),
        }
    }
}

/// A command and its subcommands.
#[derive(Default)]
pub struct Command {
    use_line: String,
    short: String,
    long: String,
    example: String,
    hidden: bool,
    args: ArgsRule,
    args_completer: Option<Completer>,
    positional_completers: Vec<Option<Completer>>,
    action: Option<Action>,
    subcommands: Vec<Self>,
    flags: FlagSet,
    persistent_flags: FlagSet,
    hide_inherited_flags: bool,
    disable_flags_in_use_line: bool,
}

impl Command {
    /// Creates a command from its invocation line, e.g. `deploy <env>`.
    ///
    /// The first word is the command's name; the rest is shown as the
    /// argument placeholder in usage.
    pub fn new(use_line: impl Into<String>) -> Self {
        Self {
            use_line: use_line.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    #[must_use]
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub const fn args(mut self, rule: ArgsRule) -> Self {
        self.args = rule;
        self
    }

    /// Sets the completion source for positional arguments not covered by
    /// [`Command::complete_positional`].
    #[must_use]
    pub fn complete_args(mut self, completer: Completer) -> Self {
        self.set_args_completer(completer);
        self
    }

    /// Sets the completion source for the positional argument at `index`,
    /// counting from zero.
    #[must_use]
    pub fn complete_positional(mut self, index: usize, completer: Completer) -> Self {
        self.set_positional_completer(index, completer);
        self
    }

    pub fn set_args_completer(&mut self, completer: Completer) {
        self.args_completer = Some(completer);
    }

    /// Positions below `index` without a completer complete nothing.
    pub fn set_positional_completer(&mut self, index: usize, completer: Completer) {
        if self.positional_completers.len() <= index {
            self.positional_completers.resize(index + 1, None);
        }
        self.positional_completers[index] = Some(completer);
    }

    #[must_use]
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> Result<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn subcommand(mut self, command: Self) -> Self {
        self.add_subcommand(command);
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.add(flag);
        self
    }

    #[must_use]
    pub fn persistent_flag(mut self, flag: Flag) -> Self {
        self.persistent_flags.add(flag);
        self
    }

    /// Leaves inherited flags out of this command's help.
    #[must_use]
    pub const fn hide_inherited_flags(mut self) -> Self {
        self.hide_inherited_flags = true;
        self
    }

    /// Leaves the `[FLAGS]` marker out of this command's usage line.
    #[must_use]
    pub const fn disable_flags_in_use_line(mut self) -> Self {
        self.disable_flags_in_use_line = true;
        self
    }

    /// Adds a subcommand, keeping subcommands sorted by name.
    pub fn add_subcommand(&mut self, command: Self) {
        let index = self
            .subcommands
            .partition_point(|sub| sub.name() < command.name());
        self.subcommands.insert(index, command);
    }

    pub fn name(&self) -> &str {
        self.use_line.split(' ').next().unwrap_or_default()
    }

    pub fn use_line(&self) -> &str {
        &self.use_line
    }

    pub fn short_description(&self) -> &str {
        &self.short
    }

    pub fn long_description(&self) -> &str {
        &self.long
    }

    pub fn example_text(&self) -> &str {
        &self.example
    }

    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub const fn args_rule(&self) -> ArgsRule {
        self.args
    }

    pub const fn args_completer(&self) -> Option<&Completer> {
        self.args_completer.as_ref()
    }

    pub fn positional_completers(&self) -> &[Option<Completer>] {
        &self.positional_completers
    }

    pub fn action_fn(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn subcommands(&self) -> &[Self] {
        &self.subcommands
    }

    pub fn subcommands_mut(&mut self) -> &mut [Self] {
        &mut self.subcommands
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&Self> {
        self.subcommands.iter().find(|sub| sub.name() == name)
    }

    pub fn find_subcommand_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.subcommands.iter_mut().find(|sub| sub.name() == name)
    }

    /// Flags that apply to this command only.
    pub const fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub const fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    /// Flags that apply to this command and every descendant.
    pub const fn persistent_flags(&self) -> &FlagSet {
        &self.persistent_flags
    }

    pub const fn persistent_flags_mut(&mut self) -> &mut FlagSet {
        &mut self.persistent_flags
    }

    pub const fn hides_inherited_flags(&self) -> bool {
        self.hide_inherited_flags
    }

    pub const fn flags_disabled_in_use_line(&self) -> bool {
        self.disable_flags_in_use_line
    }

    /// Looks up a flag defined on this command, local or persistent.
    pub fn lookup_flag_mut(&mut self, name: &str) -> Option<&mut Flag> {
        if self.flags.lookup(name).is_some() {
            return self.flags.lookup_mut(name);
        }
        self.persistent_flags.lookup_mut(name)
    }

    /// Whether the command has a visible subcommand.
    pub fn has_visible_subcommands(&self) -> bool {
        self.subcommands.iter().any(|sub| !sub.hidden)
    }
}

/// Assigns the named flags of `command` to `group` for help output.
///
/// Groups are rendered in the order their first flag is visited. Unknown
/// names are ignored.
pub fn flag_group(command: &mut Command, group: &str, names: &[&str]) {
    for name in names {
        if let Some(flag) = command.lookup_flag_mut(name) {
            flag.set_group(group);
        }
    }
}

/// A command together with its ancestors, root first.
#[derive(Clone)]
pub struct Lineage<'a> {
    chain: Vec<&'a Command>,
}

impl<'a> Lineage<'a> {
    pub fn root(command: &'a Command) -> Self {
        Self {
            chain: vec![command],
        }
    }

    /// Follows `path` from `root` by subcommand name.
    pub fn find(root: &'a Command, path: &[&str]) -> Option<Self> {
        let mut lineage = Self::root(root);
        for name in path {
            let next = lineage.command().find_subcommand(name)?;
            lineage.chain.push(next);
        }
        Some(lineage)
    }

    /// The lineage of the subcommand `child` of this command.
    #[must_use]
    pub fn child(&self, child: &'a Command) -> Self {
        let mut chain = self.chain.clone();
        chain.push(child);
        Self { chain }
    }

    /// How many commands deep the lineage goes; the root alone is `0`.
    pub fn depth(&self) -> usize {
        self.chain.len() - 1
    }

    /// The depth of the command that defines the flag `name` as seen from
    /// this command: the command itself, or the nearest ancestor with a
    /// persistent flag of that name.
    pub fn owner_depth(&self, name: &str) -> Option<usize> {
        let command = self.command();
        if command.flags.lookup(name).is_some() || command.persistent_flags.lookup(name).is_some() {
            return Some(self.depth());
        }
        self.chain
            .iter()
            .enumerate()
            .rev()
            .skip(1)
            .find(|(_, ancestor)| ancestor.persistent_flags.lookup(name).is_some())
            .map(|(depth, _)| depth)
    }

    /// The command this lineage ends at.
    pub fn command(&self) -> &'a Command {
        self.chain[self.chain.len() - 1]
    }

    pub fn root_command(&self) -> &'a Command {
        self.chain[0]
    }

    /// The space-separated names from the root down, e.g. `app deploy`.
    pub fn path(&self) -> String {
        self.chain
            .iter()
            .map(|cmd| cmd.name())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Flags defined on the command itself, local and persistent.
    pub fn local(&self) -> Vec<&'a Flag> {
        let command = self.command();
        let mut flags = command.flags.visit();
        for flag in command.persistent_flags.visit() {
            if !flags.iter().any(|f| f.name() == flag.name()) {
                flags.push(flag);
            }
        }
        self.order(flags)
    }

    /// Persistent flags of the ancestors, nearest first, minus any name the
    /// command or a nearer ancestor already defines.
    pub fn inherited(&self) -> Vec<&'a Flag> {
        let own = self.local();
        let mut flags: Vec<&'a Flag> = Vec::new();
        for ancestor in self.chain.iter().rev().skip(1) {
            for flag in ancestor.persistent_flags.visit() {
                let shadowed = own.iter().chain(flags.iter()).any(|f| f.name() == flag.name());
                if !shadowed {
                    flags.push(flag);
                }
            }
        }
        self.order(flags)
    }

    /// Every flag that applies to the command.
    pub fn all_flags(&self) -> Vec<&'a Flag> {
        let mut flags = self.local();
        flags.extend(self.inherited());
        self.order(flags)
    }

    fn order(&self, mut flags: Vec<&'a Flag>) -> Vec<&'a Flag> {
        if self.command().flags.is_sorted() {
            flags.sort_by(|a, b| a.name().cmp(b.name()));
        }
        flags
    }
}

impl HelpSource for Lineage<'_> {
    fn name(&self) -> &str {
        self.command().name()
    }

    fn command_path(&self) -> String {
        self.path()
    }

    fn short(&self) -> &str {
        &self.command().short
    }

    fn long(&self) -> &str {
        &self.command().long
    }

    fn example(&self) -> &str {
        &self.command().example
    }

    fn use_line(&self) -> &str {
        &self.command().use_line
    }

    fn local_flags(&self) -> Vec<FlagDescriptor> {
        self.local().iter().map(|f| f.descriptor()).collect()
    }

    fn inherited_flags(&self) -> Vec<FlagDescriptor> {
        self.inherited().iter().map(|f| f.descriptor()).collect()
    }

    fn subcommands(&self) -> Vec<CommandSummary> {
        self.command()
            .subcommands
            .iter()
            .filter(|sub| !sub.hidden)
            .map(|sub| CommandSummary {
                name: sub.name().to_string(),
                short: sub.short.clone(),
            })
            .collect()
    }

    fn root_subcommands(&self) -> HashSet<String> {
        self.root_command()
            .subcommands
            .iter()
            .filter(|sub| !sub.hidden)
            .map(|sub| sub.name().to_string())
            .collect()
    }

    fn disable_flags_in_use_line(&self) -> bool {
        self.command().disable_flags_in_use_line
    }

    fn hide_inherited_flags(&self) -> bool {
        self.command().hide_inherited_flags
    }
}

/// What an action sees while it runs.
pub struct Context<'a> {
    /// Positional arguments.
    pub args: Vec<String>,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub theme: &'a Theme,
    /// Wrap width for rendered text; `0` disables wrapping.
    pub width: usize,
    pub lineage: Lineage<'a>,
}

impl<'a> Context<'a> {
    pub fn command(&self) -> &'a Command {
        self.lineage.command()
    }

    pub fn root(&self) -> &'a Command {
        self.lineage.root_command()
    }

    /// Renders the running command's help page to `out`.
    pub fn render_help(&mut self) -> Result<()> {
        help::render(&mut *self.out, &self.lineage, self.theme, self.width)?;
        Ok(())
    }
}
