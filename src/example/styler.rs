//! Contextual highlighting of tokenized example lines.

use std::collections::HashSet;

use super::tokenizer::{Token, TokenKind, tokenize};
use crate::theme::Theme;

/// How a span of an example line is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Plain,
    Command,
    Flag,
    Operator,
    EnvVar,
    EnvVarValue,
}

/// A piece of an example line and how to highlight it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub highlight: Highlight,
}

impl Span {
    fn new(text: impl Into<String>, highlight: Highlight) -> Self {
        Self {
            text: text.into(),
            highlight,
        }
    }
}

/// Operators after which the next word names a new command.
const COMMAND_SEPARATORS: &[&str] = &["|", ";", "&&", "||"];

/// State carried across the tokens of a single line.
///
/// Any word in command position is a command, whether or not it is the root
/// command, so only the subcommand names need to be looked up.
#[derive(Debug)]
pub struct StyleContext<'a> {
    subcommands: &'a HashSet<String>,
    expect_command: bool,
}

impl<'a> StyleContext<'a> {
    pub const fn new(subcommands: &'a HashSet<String>) -> Self {
        Self {
            subcommands,
            expect_command: true,
        }
    }

    /// Classifies the tokens of one line, in order.
    pub fn highlight(&mut self, tokens: &[Token]) -> Vec<Span> {
        let mut spans = Vec::with_capacity(tokens.len());
        for token in tokens {
            self.push_token(token, &mut spans);
        }
        spans
    }

    fn push_token(&mut self, token: &Token, spans: &mut Vec<Span>) {
        let value = token.value.as_str();
        match token.kind {
            TokenKind::Whitespace | TokenKind::QuotedString => {
                spans.push(Span::new(value, Highlight::Plain));
            }
            TokenKind::Operator => {
                spans.push(Span::new(value, Highlight::Operator));
                if COMMAND_SEPARATORS.contains(&value) {
                    self.expect_command = true;
                }
            }
            TokenKind::LineContinuation => {
                spans.push(Span::new(value, Highlight::Operator));
            }
            TokenKind::EnvAssignment => {
                // an assignment still leaves the command position open
                if let Some(idx) = value.find('=') {
                    spans.push(Span::new(&value[..=idx], Highlight::EnvVar));
                    spans.push(Span::new(&value[idx + 1..], Highlight::EnvVarValue));
                } else {
                    spans.push(Span::new(value, Highlight::EnvVar));
                }
            }
            TokenKind::Word => self.push_word(value, spans),
        }
    }

    fn push_word(&mut self, word: &str, spans: &mut Vec<Span>) {
        if self.expect_command || self.subcommands.contains(word) {
            spans.push(Span::new(word, Highlight::Command));
            self.expect_command = false;
        } else if word.starts_with('-') {
            if let Some(idx) = word.find('=') {
                spans.push(Span::new(&word[..=idx], Highlight::Flag));
                spans.push(Span::new(&word[idx + 1..], Highlight::Plain));
            } else {
                spans.push(Span::new(word, Highlight::Flag));
            }
        } else {
            spans.push(Span::new(word, Highlight::Plain));
        }
    }
}

/// Tokenizes and classifies one example line.
pub fn highlight_line(line: &str, subcommands: &HashSet<String>) -> Vec<Span> {
    StyleContext::new(subcommands).highlight(&tokenize(line))
}

/// Renders one example line with the theme applied.
pub fn style_line(line: &str, subcommands: &HashSet<String>, theme: &Theme) -> String {
    highlight_line(line, subcommands)
        .iter()
        .map(|span| theme.highlight(span.highlight).render(&span.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subcommands(names: &[&str]) -> HashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn highlighted(line: &str, subs: &[&str]) -> Vec<(String, Highlight)> {
        highlight_line(line, &subcommands(subs))
            .into_iter()
            .filter(|span| !span.text.trim().is_empty())
            .map(|span| (span.text, span.highlight))
            .collect()
    }

    fn span(text: &str, highlight: Highlight) -> (String, Highlight) {
        (text.to_string(), highlight)
    }

    #[test]
    fn test_and_resets_command_position() {
        assert_eq!(
            highlighted("cmd1 && cmd2", &[]),
            vec![
                span("cmd1", Highlight::Command),
                span("&&", Highlight::Operator),
                span("cmd2", Highlight::Command),
            ]
        );
    }

    #[test]
    fn test_subcommand_and_flags() {
        assert_eq!(
            highlighted("nsv next --show -f x", &["next", "tag"]),
            vec![
                span("nsv", Highlight::Command),
                span("next", Highlight::Command),
                span("--show", Highlight::Flag),
                span("-f", Highlight::Flag),
                span("x", Highlight::Plain),
            ]
        );
    }

    #[test]
    fn test_flag_with_value_styles_only_flag_part() {
        assert_eq!(
            highlighted("nsv --format=json", &[]),
            vec![
                span("nsv", Highlight::Command),
                span("--format=", Highlight::Flag),
                span("json", Highlight::Plain),
            ]
        );
    }

    #[test]
    fn test_env_assignment_keeps_command_position() {
        assert_eq!(
            highlighted("LOG=debug nsv tag", &[]),
            vec![
                span("LOG=", Highlight::EnvVar),
                span("debug", Highlight::EnvVarValue),
                span("nsv", Highlight::Command),
                span("tag", Highlight::Plain),
            ]
        );
    }

    #[test]
    fn test_any_word_in_command_position_is_a_command() {
        assert_eq!(
            highlighted("cat notes.md | grep todo", &[]),
            vec![
                span("cat", Highlight::Command),
                span("notes.md", Highlight::Plain),
                span("|", Highlight::Operator),
                span("grep", Highlight::Command),
                span("todo", Highlight::Plain),
            ]
        );
    }

    #[test]
    fn test_redirect_does_not_reset_command_position() {
        assert_eq!(
            highlighted("nsv next > out.txt", &[]),
            vec![
                span("nsv", Highlight::Command),
                span("next", Highlight::Plain),
                span(">", Highlight::Operator),
                span("out.txt", Highlight::Plain),
            ]
        );
    }

    #[test]
    fn test_quoted_strings_and_continuation() {
        assert_eq!(
            highlighted("nsv tag -m \"a | b\" \\", &["tag"]),
            vec![
                span("nsv", Highlight::Command),
                span("tag", Highlight::Command),
                span("-m", Highlight::Flag),
                span("\"a | b\"", Highlight::Plain),
                span("\\", Highlight::Operator),
            ]
        );
    }

    #[test]
    fn test_style_line_with_plain_theme_is_identity() {
        let line = "A=1 nsv next --show | tee log; echo 'done' \\";
        assert_eq!(
            style_line(line, &subcommands(&["next"]), &Theme::plain()),
            line
        );
    }
}
