//! # helpkit - styled help pages for command-line tools
//!
//! `helpkit` renders the help output of a command tree: a reflowed
//! description, a usage line, a commands table, syntax-highlighted examples
//! and grouped flag sections with type hints, defaults, environment
//! variables and enum choices.
//!
//! ## Features
//!
//! - **Help pages**: the layout is fixed; the [`theme::Theme`] decides colors
//! - **Example highlighting**: commands, flags, operators and env assignments
//! - **Typed flags**: scalars, lists and enumerated values with per-choice help
//! - **Environment fallback**: flags bound to variables, CLI values win
//! - **Built-ins**: `--help`, version output, shell completion and a man page
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::io::Write;
//!
//! use helpkit::cli::{Cli, CompletionOptions, VersionInfo};
//! use helpkit::command::Command;
//! use helpkit::flag::{Flag, Scalar, shared};
//!
//! let name = shared(Scalar::new("world".to_string()));
//! let greeting = name.clone();
//!
//! let root = Command::new("greet")
//!     .short("Say hello")
//!     .example("# Greet someone\ngreet --name ada")
//!     .flag(Flag::new("name", &name).short('n').usage("who to greet"))
//!     .action(move |ctx| {
//!         writeln!(ctx.out, "hello {}", greeting.borrow().get())?;
//!         Ok(())
//!     });
//!
//! let result = Cli::new(root)
//!     .version_flag(VersionInfo::new(env!("CARGO_PKG_VERSION")))
//!     .completion(CompletionOptions::new())
//!     .execute();
//! if let Err(failure) = result {
//!     std::process::exit(failure.kind.exit_code());
//! }
//! ```
//!
//! ## Theme file
//!
//! Styles can be loaded from `~/.config/<app>/theme.toml`:
//!
//! ```toml
//! preset = "clay"
//! background = "dark"
//! width = 100
//!
//! [styles.flag]
//! fg = "#e0a060"
//! bold = true
//! ```

/// Process wiring: parsing, dispatch, completion, version and man page.
pub mod cli;

/// The in-memory command tree.
pub mod command;

/// Flag-level errors.
pub mod error;

/// Lexing and highlighting of example lines.
pub mod example;

/// Flag values, enumerated values, env binding and requirements.
pub mod flag;

/// Help page rendering.
pub mod help;

/// Global output configuration (quiet mode, colors, stderr diagnostics).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Text reflow, wrapping and dedenting.
pub mod text;

/// Styles, palette and the theme file.
pub mod theme;
