//! Lexer for shell-like example lines.

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of spaces and tabs.
    Whitespace,
    /// Anything else: commands, flags, arguments.
    Word,
    /// A shell operator such as `|` or `&&`.
    Operator,
    /// A single or double quoted string, quotes included.
    QuotedString,
    /// A leading `NAME=value` assignment.
    EnvAssignment,
    /// A trailing backslash.
    LineContinuation,
}

/// A slice of an example line together with its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

/// Shell operators, longest first so `&&` is never split into two `&`.
const SHELL_OPERATORS: &[&str] = &[">>", "<<", "&&", "||", "|", ">", "<", ";", "&"];

/// Splits one line of example text into tokens.
///
/// Concatenating the values of the returned tokens reproduces `line`.
pub fn tokenize(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if is_blank(c) {
            let start = i;
            while i < chars.len() && is_blank(chars[i]) {
                i += 1;
            }
            tokens.push(Token::new(collect(&chars[start..i]), TokenKind::Whitespace));
            continue;
        }

        if c == '"' || c == '\'' {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i] != c {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    i += 2;
                } else {
                    i += 1;
                }
            }
            // an unterminated string runs to the end of the line
            if i < chars.len() {
                i += 1;
            }
            tokens.push(Token::new(collect(&chars[start..i]), TokenKind::QuotedString));
            continue;
        }

        if c == '\\' && i == chars.len() - 1 {
            tokens.push(Token::new("\\", TokenKind::LineContinuation));
            i += 1;
            continue;
        }

        if let Some(op) = match_operator(&chars[i..]) {
            tokens.push(Token::new(op, TokenKind::Operator));
            i += op.len();
            continue;
        }

        let start = i;
        while i < chars.len() {
            let c = chars[i];
            if is_blank(c) || c == '"' || c == '\'' {
                break;
            }
            if c == '\\' && i == chars.len() - 1 {
                break;
            }
            if match_operator(&chars[i..]).is_some() {
                break;
            }
            i += 1;
        }

        let word = collect(&chars[start..i]);
        let kind = if is_env_assignment(&word) && only_env_or_whitespace(&tokens) {
            TokenKind::EnvAssignment
        } else {
            TokenKind::Word
        };
        tokens.push(Token::new(word, kind));
    }

    tokens
}

const fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn match_operator(rest: &[char]) -> Option<&'static str> {
    SHELL_OPERATORS.iter().copied().find(|op| {
        op.len() <= rest.len() && op.chars().zip(rest).all(|(a, &b)| a == b)
    })
}

fn is_env_assignment(word: &str) -> bool {
    !word.starts_with('-') && word.find('=').is_some_and(|idx| idx > 0)
}

fn only_env_or_whitespace(tokens: &[Token]) -> bool {
    tokens
        .iter()
        .all(|t| matches!(t.kind, TokenKind::Whitespace | TokenKind::EnvAssignment))
}
