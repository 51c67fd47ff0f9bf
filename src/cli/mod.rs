//! Running a command tree.
//!
//! [`Cli`] wires the built-in `help` flag, `version`, `completion` and `man`
//! into a [`Command`] tree, parses the command line and dispatches to the
//! selected command's action.
//!
//! Work happens in a fixed order:
//!
//! 1. Parse and assign flag values from the command line
//! 2. `--help` and `--version` short-circuit
//! 3. Environment bindings fill flags not given on the command line
//! 4. Flag requirements, then the positional argument rule
//! 5. The action
//!
//! Failures print `Error: <message>` to the error writer. Usage mistakes
//! are followed by the help page of the command they concern.

mod completion;
mod man;
mod parse;
mod version;

use std::fmt;
use std::io::{self, Write};

use anyhow::anyhow;

use crate::command::{Command, Context, Lineage};
use crate::flag::{self, Flag, Scalar, shared};
use crate::help;
use crate::theme::Theme;

pub use completion::{Completer, CompletionOptions, CompletionScope, Shell, generate};
pub use version::{VersionInfo, default_platform, render_version, write_json};

/// Default wrap width for help output.
pub const DEFAULT_WIDTH: usize = 80;

const HELP_FLAG: &str = "help";
const VERSION_FLAG: &str = "version";

/// What went wrong, and which exit code it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad flags, arguments or subcommands.
    Usage,
    /// A bound environment variable held an invalid value.
    Env,
    /// Writing output failed.
    Io,
    /// The command's action returned an error.
    Action,
}

impl ErrorKind {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Usage => exitcode::USAGE,
            Self::Env => exitcode::CONFIG,
            Self::Io => exitcode::IOERR,
            Self::Action => 1,
        }
    }
}

/// A run that did not succeed. The message has already been printed.
#[derive(Debug)]
pub struct Failure {
    pub kind: ErrorKind,
    pub error: anyhow::Error,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for Failure {}

enum VersionSetup {
    Flag(VersionInfo),
    Command(VersionInfo),
}

/// A command tree plus the built-in commands and flags around it.
pub struct Cli {
    root: Command,
    theme: Theme,
    width: usize,
    version: Option<VersionSetup>,
    completion: Option<CompletionOptions>,
    manpage: bool,
}

impl Cli {
    pub fn new(root: Command) -> Self {
        Self {
            root,
            theme: Theme::plain(),
            width: DEFAULT_WIDTH,
            version: None,
            completion: None,
            manpage: true,
        }
    }

    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the wrap width; `0` disables wrapping.
    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Adds `-V, --version` to the root command.
    #[must_use]
    pub fn version_flag(mut self, info: VersionInfo) -> Self {
        self.version = Some(VersionSetup::Flag(info.with_default_platform()));
        self
    }

    /// Adds a `version` subcommand with `--short` and `--json`.
    #[must_use]
    pub fn version_command(mut self, info: VersionInfo) -> Self {
        self.version = Some(VersionSetup::Command(info.with_default_platform()));
        self
    }

    /// Adds the `completion <shell>` command.
    #[must_use]
    pub fn completion(mut self, options: CompletionOptions) -> Self {
        self.completion = Some(options);
        self
    }

    /// Leaves out the hidden `man` command.
    #[must_use]
    pub const fn without_manpage(mut self) -> Self {
        self.manpage = false;
        self
    }

    /// The root command, for adjustments after construction.
    pub const fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    /// Runs the command line `args`, which exclude the program name.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] after printing its message to `err`.
    pub fn run(
        mut self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), Failure> {
        let version = self.prepare();

        let parsed = match parse::parse(&self.root, args) {
            Ok(parsed) => parsed,
            Err(error) => {
                let target = parse::locate(&self.root, args);
                return Err(self.usage_failure(&target, parse::clap_message(&error), err));
            }
        };

        if let Err(message) = apply_values(&mut self.root, &parsed.flags) {
            return Err(self.usage_failure(&parsed.path, message, err));
        }

        let path: Vec<&str> = parsed.path.iter().map(String::as_str).collect();
        let lineage = Lineage::find(&self.root, &path).unwrap_or_else(|| Lineage::root(&self.root));
        let command = lineage.command();

        if is_set(command.flags().lookup(HELP_FLAG)) {
            return self.write_help(&lineage, out, err);
        }

        if let Some(info) = &version
            && path.is_empty()
            && is_set(command.flags().lookup(VERSION_FLAG))
        {
            return write!(out, "{}", render_version(info, &self.theme))
                .map_err(|e| report(err, ErrorKind::Io, e.into()));
        }

        let Some(action) = command.action_fn() else {
            if let Some(arg) = parsed.args.first()
                && !command.subcommands().is_empty()
            {
                let message = format!("unknown command \"{arg}\" for \"{}\"", lineage.path());
                return Err(self.usage_failure(&parsed.path, message, err));
            }
            return self.write_help(&lineage, out, err);
        };

        let flags = lineage.all_flags();
        if let Err(error) = flag::apply_env_bindings(&flags) {
            return Err(report(err, ErrorKind::Env, error.into()));
        }
        if let Err(error) = flag::validate_requirements(&flags) {
            return Err(self.usage_failure(&parsed.path, error.to_string(), err));
        }
        if let Err(message) = command.args_rule().check(&lineage.path(), &parsed.args) {
            return Err(self.usage_failure(&parsed.path, message, err));
        }

        let result = action(&mut Context {
            args: parsed.args.clone(),
            out,
            err: &mut *err,
            theme: &self.theme,
            width: self.width,
            lineage: lineage.clone(),
        });

        result.map_err(|error| report(err, ErrorKind::Action, error))
    }

    /// Runs with the process arguments and standard streams.
    ///
    /// # Errors
    ///
    /// See [`Cli::run`].
    pub fn execute(self) -> Result<(), Failure> {
        let args: Vec<String> = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let mut out = io::stdout().lock();
        let mut err = io::stderr().lock();
        let result = self.run(&args, &mut out, &mut err);
        let _ = out.flush();
        result
    }

    /// Adds the built-in commands and flags. Returns the version information
    /// when it is served by a flag.
    fn prepare(&mut self) -> Option<VersionInfo> {
        if self.manpage {
            self.root.add_subcommand(man::man_command());
        }

        let version = match self.version.take() {
            Some(VersionSetup::Flag(info)) => {
                let value = shared(Scalar::new(false));
                if self.root.flags().lookup(VERSION_FLAG).is_none() {
                    let mut flag = Flag::new(VERSION_FLAG, &value)
                        .usage("print build time version information");
                    if !self.root.flags().has_shorthand('V')
                        && !self.root.persistent_flags().has_shorthand('V')
                    {
                        flag = flag.short('V');
                    }
                    self.root.flags_mut().add(flag);
                }
                Some(info)
            }
            Some(VersionSetup::Command(info)) => {
                self.root.add_subcommand(version::version_command(info));
                None
            }
            None => None,
        };

        if let Some(options) = self.completion.take() {
            options.scope().apply(&mut self.root);
            let app = self.root.name().to_string();
            self.root
                .add_subcommand(completion::completion_command(&options, &app));
        }

        add_help_flags(&mut self.root, &[]);
        version
    }

    fn write_help(
        &self,
        lineage: &Lineage<'_>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), Failure> {
        help::render(out, lineage, &self.theme, self.width)
            .map_err(|e| report(err, ErrorKind::Io, e.into()))
    }

    /// Prints a usage error followed by the help of the command at `path`.
    fn usage_failure(&self, path: &[String], message: String, err: &mut dyn Write) -> Failure {
        let failure = report(err, ErrorKind::Usage, anyhow!(message));
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        let lineage = Lineage::find(&self.root, &path).unwrap_or_else(|| Lineage::root(&self.root));
        let _ = help::render(err, &lineage, &self.theme, self.width);
        failure
    }
}

/// Adds `-h, --help` to `command` and its descendants. The shorthand is
/// skipped where `h` is already taken.
fn add_help_flags(command: &mut Command, inherited: &[char]) {
    let mut taken: Vec<char> = inherited.to_vec();
    taken.extend(
        command
            .persistent_flags()
            .visit()
            .iter()
            .filter_map(|flag| flag.shorthand()),
    );

    if command.flags().lookup(HELP_FLAG).is_none()
        && command.persistent_flags().lookup(HELP_FLAG).is_none()
    {
        let value = shared(Scalar::new(false));
        let mut help =
            Flag::new(HELP_FLAG, &value).usage(format!("help for {}", command.name()));
        if !taken.contains(&'h') && !command.flags().has_shorthand('h') {
            help = help.short('h');
        }
        command.flags_mut().add(help);
    }

    for sub in command.subcommands_mut() {
        add_help_flags(sub, &taken);
    }
}

/// Assigns every value given on the command line to its flag.
fn apply_values(root: &mut Command, inputs: &[parse::FlagInput]) -> Result<(), String> {
    for input in inputs {
        let Some(flag) = parse::owned_flag_mut(root, &input.owner, &input.name) else {
            continue;
        };
        for raw in &input.values {
            flag.set(raw).map_err(|error| {
                format!("invalid argument \"{raw}\" for \"{}\" flag: {error}", label(flag))
            })?;
        }
    }
    Ok(())
}

/// `-p, --port` or `--port`.
fn label(flag: &Flag) -> String {
    match flag.shorthand() {
        Some(short) => format!("-{short}, --{}", flag.name()),
        None => format!("--{}", flag.name()),
    }
}

fn is_set(flag: Option<&Flag>) -> bool {
    flag.is_some_and(|flag| flag.is_changed() && flag.value_text() == "true")
}

fn report(err: &mut dyn Write, kind: ErrorKind, error: anyhow::Error) -> Failure {
    let _ = writeln!(err, "Error: {error}");
    Failure { kind, error }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::command::ArgsRule;
    use crate::flag::{EnumValue, Handle, bind_env, mark_flag_requires};
    use serial_test::serial;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run(cli: Cli, list: &[&str]) -> (Result<(), Failure>, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let result = cli.run(&args(list), &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn greeter(name: &Handle<Scalar<String>>) -> Command {
        let value = name.clone();
        Command::new("greet")
            .short("Say hello")
            .args(ArgsRule::None)
            .flag(Flag::new("name", name).short('n').usage("who to greet"))
            .action(move |ctx| {
                writeln!(ctx.out, "hello {}", value.borrow().get())?;
                Ok(())
            })
    }

    fn app(name: &Handle<Scalar<String>>) -> Command {
        Command::new("app")
            .short("A test application")
            .subcommand(greeter(name))
    }

    #[test]
    fn test_runs_action_with_flag_value() {
        let name = shared(Scalar::new("world".to_string()));
        let (result, out, _) = run(Cli::new(app(&name)), &["greet", "-n", "ada"]);
        assert!(result.is_ok());
        assert_eq!(out, "hello ada\n");
    }

    #[test]
    fn test_help_flag_renders_help() {
        let name = shared(Scalar::new(String::new()));
        let (result, out, _) = run(Cli::new(app(&name)), &["greet", "--help"]);
        assert!(result.is_ok());
        assert!(out.starts_with("Say hello\n\nUSAGE\n  app greet [FLAGS]\n"));
        assert!(out.contains("-h, --help\n          help for greet\n"));
    }

    #[test]
    fn test_root_without_action_renders_help() {
        let name = shared(Scalar::new(String::new()));
        let (result, out, _) = run(Cli::new(app(&name)).without_manpage(), &[]);
        assert!(result.is_ok());
        assert!(out.contains("COMMANDS\n  greet    Say hello\n"));
    }

    #[test]
    fn test_unknown_command() {
        let name = shared(Scalar::new(String::new()));
        let (result, _, err) = run(Cli::new(app(&name)), &["nope"]);
        let failure = result.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Usage);
        assert!(err.starts_with("Error: unknown command \"nope\" for \"app\"\n"));
        assert!(err.contains("USAGE\n  app"));
    }

    #[test]
    fn test_invalid_flag_value_names_the_flag() {
        let port = shared(Scalar::new(8080_u16));
        let root = Command::new("serve")
            .flag(Flag::new("port", &port).short('p'))
            .action(|_| Ok(()));
        let (result, _, err) = run(Cli::new(root), &["--port", "high"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Usage);
        assert!(err.starts_with("Error: invalid argument \"high\" for \"-p, --port\" flag:"));
    }

    #[test]
    fn test_enum_choice_error() {
        let format = shared(EnumValue::new("json", ["json", "yaml"]));
        let root = Command::new("dump")
            .flag(Flag::new("format", &format))
            .action(|_| Ok(()));
        let (result, _, err) = run(Cli::new(root), &["--format", "xml"]);
        assert!(result.is_err());
        assert!(err.contains("flag: must be one of: json, yaml"));
    }

    #[test]
    fn test_args_rule_enforced() {
        let name = shared(Scalar::new(String::new()));
        let (result, _, err) = run(Cli::new(app(&name)), &["greet", "extra"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Usage);
        assert!(err.starts_with("Error: unknown command \"extra\" for \"app greet\"\n"));
    }

    #[test]
    fn test_requirements_checked() {
        let value = shared(Scalar::new(false));
        let mut root = Command::new("app")
            .flag(Flag::new("workspace", &value))
            .flag(Flag::new("check", &value))
            .action(|_| Ok(()));
        mark_flag_requires(root.flags_mut().lookup_mut("workspace"), &["check"]);

        let (result, _, err) = run(Cli::new(root), &["--workspace"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Usage);
        assert!(err.starts_with("Error: flag --workspace requires --check\n"));
    }

    #[test]
    #[serial]
    fn test_env_binding_fills_unset_flag() {
        let retries = shared(Scalar::new(3_u32));
        let seen = retries.clone();
        let mut root = Command::new("app")
            .flag(Flag::new("retries", &retries))
            .action(move |ctx| {
                writeln!(ctx.out, "{}", seen.borrow().get())?;
                Ok(())
            });
        bind_env(root.flags_mut().lookup_mut("retries"), "HELPKIT_TEST_CLI_RETRIES");

        unsafe { std::env::set_var("HELPKIT_TEST_CLI_RETRIES", "7") };
        let (result, out, _) = run(Cli::new(root), &[]);
        unsafe { std::env::remove_var("HELPKIT_TEST_CLI_RETRIES") };

        assert!(result.is_ok());
        assert_eq!(out, "7\n");
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_env_error() {
        let retries = shared(Scalar::new(3_u32));
        let mut root = Command::new("app")
            .flag(Flag::new("retries", &retries))
            .action(|_| Ok(()));
        bind_env(root.flags_mut().lookup_mut("retries"), "HELPKIT_TEST_CLI_BAD");

        unsafe { std::env::set_var("HELPKIT_TEST_CLI_BAD", "lots") };
        let (result, _, err) = run(Cli::new(root), &[]);
        unsafe { std::env::remove_var("HELPKIT_TEST_CLI_BAD") };

        let failure = result.unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Env);
        assert_eq!(failure.kind.exit_code(), exitcode::CONFIG);
        assert!(err.contains("HELPKIT_TEST_CLI_BAD"));
        assert!(!err.contains("USAGE"));
    }

    #[test]
    fn test_version_flag() {
        let root = Command::new("app").action(|_| Ok(()));
        let info = VersionInfo {
            version: "1.2.3".to_string(),
            ..VersionInfo::default()
        };
        let (result, out, _) = run(Cli::new(root).version_flag(info), &["-V"]);
        assert!(result.is_ok());
        assert!(out.starts_with("1.2.3\n"));
        assert!(out.contains("Platform"));
    }

    #[test]
    fn test_version_command_short() {
        let name = shared(Scalar::new(String::new()));
        let cli = Cli::new(app(&name)).version_command(VersionInfo::new("0.9.0"));
        let (result, out, _) = run(cli, &["version", "--short"]);
        assert!(result.is_ok());
        assert_eq!(out, "0.9.0\n");
    }

    #[test]
    fn test_version_command_rejects_both_formats() {
        let name = shared(Scalar::new(String::new()));
        let cli = Cli::new(app(&name)).version_command(VersionInfo::new("0.9.0"));
        let (result, _, err) = run(cli, &["version", "--short", "--json"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Action);
        assert_eq!(err, "Error: flags --short and --json cannot be used together\n");
    }

    #[test]
    fn test_completion_command() {
        let name = shared(Scalar::new(String::new()));
        let cli = Cli::new(app(&name)).completion(CompletionOptions::new());
        let (result, out, _) = run(cli, &["completion", "bash"]);
        assert!(result.is_ok());
        assert!(out.contains("greet"));

        let cli = Cli::new(app(&name)).completion(CompletionOptions::new());
        let (result, _, err) = run(cli, &["completion", "tcsh"]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::Action);
        assert!(err.contains("unsupported shell: tcsh"));
    }

    #[test]
    fn test_completion_scope_reaches_subcommand_flags() {
        let name = shared(Scalar::new(String::new()));
        let cli = Cli::new(app(&name)).completion(
            CompletionOptions::new().complete_subcommand(
                "greet",
                CompletionScope::new().complete_flag("name", Completer::values(["ada", "grace"])),
            ),
        );
        let (result, out, _) = run(cli, &["completion", "zsh"]);
        assert!(result.is_ok());
        assert!(out.contains("(ada grace)"));
    }

    #[test]
    fn test_man_command_hidden_from_help() {
        let name = shared(Scalar::new(String::new()));
        let (_, out, _) = run(Cli::new(app(&name)), &[]);
        assert!(!out.contains("man"));

        let (result, out, _) = run(Cli::new(app(&name)), &["man"]);
        assert!(result.is_ok());
        assert!(out.contains(".TH"));
    }

    #[test]
    fn test_help_shorthand_left_to_existing_flag() {
        let host = shared(Scalar::new(String::new()));
        let root = Command::new("app")
            .flag(Flag::new("host", &host).short('h'))
            .action(|_| Ok(()));
        let (result, out, _) = run(Cli::new(root), &["--help"]);
        assert!(result.is_ok());
        assert!(out.contains("  --help\n"));
        assert!(out.contains("-h, --host"));
    }
}
