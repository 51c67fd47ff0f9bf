//! The hidden `man` command.

use crate::command::{ArgsRule, Command, Lineage};

use super::parse::{self, Mode};

/// Builds the `man` command, which writes a roff man page for the whole tree.
pub(crate) fn man_command() -> Command {
    Command::new("man")
        .short("Generate a manpage for the CLI")
        .hidden()
        .disable_flags_in_use_line()
        .args(ArgsRule::None)
        .action(|ctx| {
            let cmd = parse::build(&Lineage::root(ctx.root()), Mode::Complete);
            clap_mangen::Man::new(cmd).render(&mut *ctx.out)?;
            Ok(())
        })
}
