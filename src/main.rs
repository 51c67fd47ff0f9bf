use std::collections::HashSet;
use std::rc::Rc;

use anyhow::Result;

use helpkit::cli::{Cli, Completer, CompletionOptions, Shell, VersionInfo};
use helpkit::command::{ArgsRule, Command, Context, flag_group};
use helpkit::example::{style_line, tokenize};
use helpkit::flag::{EnumValue, Flag, Handle, List, Scalar, bind_env, shared};
use helpkit::output::{self, OutputConfig};
use helpkit::text::{dedent, fill};
use helpkit::theme::palette::{Background, render_swatches};
use helpkit::theme::{Theme, ThemeFile, ThemeManager};
use helpkit::{status, warn};

const APP: &str = "helpkit";

/// Shared flags of the root command.
struct Globals {
    quiet: Handle<Scalar<bool>>,
    background: Handle<EnumValue<&'static str>>,
}

impl Globals {
    fn new() -> Self {
        Self {
            quiet: shared(Scalar::new(false)),
            background: shared(
                EnumValue::new("", ["dark", "light"])
                    .with_help(["light text on a dark terminal", "dark text on a light terminal"]),
            ),
        }
    }

    /// Applies `--quiet` and returns the theme to render with.
    fn init(&self, ctx: &Context<'_>) -> Theme {
        output::init(OutputConfig {
            quiet: self.quiet.borrow().get(),
            ..OutputConfig::default()
        });
        match background(&self.background) {
            Some(background) => Theme::clay(background),
            None => *ctx.theme,
        }
    }
}

fn background(value: &Handle<EnumValue<&'static str>>) -> Option<Background> {
    match value.borrow().get() {
        "dark" => Some(Background::Dark),
        "light" => Some(Background::Light),
        _ => None,
    }
}

fn main() {
    let theme_file = load_theme_file();
    let theme = theme_file.resolve().unwrap_or_else(|e| {
        warn!("{e:#}");
        Theme::plain()
    });

    let globals = Rc::new(Globals::new());
    let root = root_command(&globals);

    let mut cli = Cli::new(root)
        .theme(theme)
        .version_command(
            VersionInfo::new(env!("CARGO_PKG_VERSION"))
                .rust_version(option_env!("CARGO_PKG_RUST_VERSION").unwrap_or_default()),
        )
        .completion(CompletionOptions::new().with_extra_shells(&[Shell::PowerShell]));
    if let Some(width) = theme_file.width {
        cli = cli.width(width);
    }

    if let Err(failure) = cli.execute() {
        output::flush_stderr();
        std::process::exit(failure.kind.exit_code());
    }
}

/// The theme file, or the defaults when it cannot be read.
fn load_theme_file() -> ThemeFile {
    let loaded = ThemeManager::new(APP).and_then(|manager| manager.load_or_default());
    loaded.unwrap_or_else(|e| {
        warn!("{e:#}");
        ThemeFile::default()
    })
}

fn root_command(globals: &Rc<Globals>) -> Command {
    let mut root = Command::new(APP)
        .short("Render styled help pages for command-line tools")
        .long(
            "
            helpkit renders help pages the way the library does for any command
            tree: reflowed descriptions, highlighted examples and grouped flags
            with their types, defaults and environment variables.

            Colors come from the theme file in the config directory.",
        )
        .example(
            "
            # Highlight an example line
            helpkit highlight 'LOG=debug helpkit fill --width 40 \"some text\" | less'

            # Show the tokens of a line
            helpkit highlight --tokens 'a && b'",
        )
        .persistent_flag(
            Flag::new("quiet", &globals.quiet)
                .short('q')
                .usage("suppress status messages"),
        )
        .persistent_flag(
            Flag::new("background", &globals.background)
                .usage("terminal background for the built-in palette"),
        )
        .subcommand(highlight_command(globals))
        .subcommand(fill_command(globals))
        .subcommand(palette_command(globals));

    bind_env(root.persistent_flags_mut().lookup_mut("quiet"), "HELPKIT_QUIET");
    bind_env(
        root.persistent_flags_mut().lookup_mut("background"),
        "HELPKIT_BACKGROUND",
    );
    flag_group(&mut root, "Output", &["quiet", "background"]);
    root
}

fn highlight_command(globals: &Rc<Globals>) -> Command {
    let tokens = shared(Scalar::new(false));
    let commands = shared(List::<String>::default());
    let (show_tokens, extra) = (tokens.clone(), commands.clone());
    let globals = globals.clone();

    Command::new("highlight <LINE>...")
        .short("Highlight example lines")
        .long("Highlight each LINE the way the EXAMPLES section of a help page does.")
        .args(ArgsRule::Min(1))
        .flag(Flag::new("tokens", &tokens).usage("list the tokens of each line instead"))
        .flag(
            Flag::new("command", &commands)
                .short('c')
                .usage("extra names to treat as subcommands")
                .complete(Completer::None),
        )
        .action(move |ctx| {
            let theme = globals.init(ctx);

            if show_tokens.borrow().get() {
                return write_tokens(ctx);
            }

            let subcommands = known_subcommands(ctx.root(), extra.borrow().get());

            for line in &ctx.args {
                writeln!(ctx.out, "{}", style_line(line, &subcommands, &theme))?;
            }
            Ok(())
        })
}

/// The visible subcommands of `root` plus `extra`.
fn known_subcommands(root: &Command, extra: Vec<String>) -> HashSet<String> {
    root.subcommands()
        .iter()
        .filter(|sub| !sub.is_hidden())
        .map(|sub| sub.name().to_string())
        .chain(extra)
        .collect()
}

fn write_tokens(ctx: &mut Context<'_>) -> Result<()> {
    for line in &ctx.args {
        for token in tokenize(line) {
            writeln!(ctx.out, "{:?}\t{:?}", token.kind, token.value)?;
        }
    }
    Ok(())
}

fn fill_command(globals: &Rc<Globals>) -> Command {
    let width = shared(Scalar::new(0_usize));
    let dedented = shared(Scalar::new(false));
    let (fill_width, strip) = (width.clone(), dedented.clone());
    let globals = globals.clone();

    Command::new("fill <TEXT>")
        .short("Reflow text to a width")
        .example("helpkit fill --width 20 'a long paragraph of text'")
        .args(ArgsRule::Exact(1))
        .flag(
            Flag::new("width", &width)
                .short('w')
                .usage("wrap width; the configured width when unset")
                .complete(Completer::values(["40", "60", "80", "100"])),
        )
        .flag(
            Flag::new("dedent", &dedented).usage("remove common indentation first"),
        )
        .action(move |ctx| {
            globals.init(ctx);

            let mut text = ctx.args.first().cloned().unwrap_or_default();
            if strip.borrow().get() {
                text = dedent(&text);
            }
            let width = match fill_width.borrow().get() {
                0 => ctx.width,
                n => n,
            };
            status!("Filling to {width} columns");
            writeln!(ctx.out, "{}", fill(&text, width))?;
            Ok(())
        })
}

fn palette_command(globals: &Rc<Globals>) -> Command {
    let globals = globals.clone();

    Command::new("palette")
        .short("Show the color palette")
        .args(ArgsRule::None)
        .action(move |ctx| {
            globals.init(ctx);
            if let Ok(manager) = ThemeManager::new(APP) {
                status!("Theme file: {}", manager.theme_path().display());
            }
            let background = background(&globals.background).unwrap_or_default();
            render_swatches(&mut *ctx.out, background)?;
            Ok(())
        })
}
