//! Syntax highlighting for the EXAMPLES section of a help page.
//!
//! Each example line is lexed by [`tokenize`] and classified by a
//! [`StyleContext`] that tracks whether the next word sits in command
//! position. Blank lines pass through and `#` comment lines are painted
//! as comments without tokenizing.

mod styler;
mod tokenizer;

use std::collections::HashSet;
use std::io::{self, Write};

use crate::theme::Theme;

pub use styler::{Highlight, Span, StyleContext, highlight_line, style_line};
pub use tokenizer::{Token, TokenKind, tokenize};

/// Writes an example block, one indented line per input line.
pub fn render_examples(
    w: &mut dyn Write,
    examples: &str,
    subcommands: &HashSet<String>,
    theme: &Theme,
) -> io::Result<()> {
    for line in examples.split('\n') {
        if line.is_empty() {
            writeln!(w)?;
        } else if line.trim().starts_with('#') {
            writeln!(w, "  {}", theme.comment.render(line))?;
        } else {
            writeln!(w, "  {}", style_line(line, subcommands, theme))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_examples_layout() {
        let subcommands: HashSet<String> = ["next".to_string()].into();
        let mut out = Vec::new();
        render_examples(
            &mut out,
            "# Generate the next version\nnsv next\n\nnsv next --show",
            &subcommands,
            &Theme::plain(),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  # Generate the next version\n  nsv next\n\n  nsv next --show\n"
        );
    }
}
