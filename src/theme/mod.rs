//! Styles applied to each element of a help page.
//!
//! A [`Theme`] holds one [`Paint`] per element. [`Theme::plain`] applies no
//! styling at all and is what the renderer uses unless told otherwise;
//! [`Theme::clay`] is the branded palette from [`palette`].

pub mod config;
pub mod palette;

use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

use crate::example::Highlight;
use crate::output;
use palette::{
    Adaptive, Background, COMMAND_TEXT, COMMENT_TEXT, ENV_VAR_TEXT, ENV_VAR_VALUE_TEXT,
    FLAG_META_TEXT, FLAG_TEXT, OPERATOR_TEXT,
};

pub use config::{ThemeFile, ThemeManager};

/// A terminal style, or no style at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paint {
    style: Option<Style>,
    padding: usize,
}

impl Paint {
    /// A paint that leaves text untouched.
    pub const fn plain() -> Self {
        Self {
            style: None,
            padding: 0,
        }
    }

    pub const fn new(style: Style) -> Self {
        Self {
            style: Some(style),
            padding: 0,
        }
    }

    fn foreground(color: Adaptive, background: Background) -> Self {
        Self::new(Style::new().color(color.resolve(background)))
    }

    fn bold_foreground(color: Adaptive, background: Background) -> Self {
        Self::new(Style::new().bold().color(color.resolve(background)))
    }

    /// Adds `padding` spaces on both sides of the rendered text.
    #[must_use]
    pub const fn padded(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub const fn is_plain(&self) -> bool {
        self.style.is_none() && self.padding == 0
    }

    /// Renders `text`, skipping escape codes when colors are disabled.
    pub fn render<T: Display>(&self, text: T) -> String {
        let text = if self.padding > 0 {
            let pad = " ".repeat(self.padding);
            format!("{pad}{text}{pad}")
        } else {
            text.to_string()
        };

        match self.style {
            Some(style) if !output::is_no_color() => text.style(style).to_string(),
            _ => text,
        }
    }
}

/// Styles for every element of a help page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Theme {
    /// Command and subcommand names.
    pub command: Paint,
    /// Comment lines in the EXAMPLES section.
    pub comment: Paint,
    /// Descriptions of commands and flags.
    pub description: Paint,
    /// Environment variable names, in hints and examples.
    pub env_var: Paint,
    /// Environment variable values, in hints and examples.
    pub env_var_value: Paint,
    /// Flag names, e.g. `-v, --verbose`.
    pub flag: Paint,
    /// Default values shown after a flag's description.
    pub flag_default: Paint,
    /// Type hints such as `<string>` and usage placeholders.
    pub flag_type: Paint,
    /// Section headings such as USAGE and FLAGS.
    pub header: Paint,
    /// Shell operators in examples.
    pub operator: Paint,
}

impl Theme {
    /// A theme with no styling.
    pub fn plain() -> Self {
        Self::default()
    }

    /// The branded theme, adapted to the terminal background.
    pub fn clay(background: Background) -> Self {
        let flag_meta = Paint::foreground(FLAG_META_TEXT, background);

        Self {
            command: Paint::bold_foreground(COMMAND_TEXT, background),
            comment: Paint::foreground(COMMENT_TEXT, background),
            description: Paint::plain(),
            env_var: Paint::bold_foreground(ENV_VAR_TEXT, background),
            env_var_value: Paint::foreground(ENV_VAR_VALUE_TEXT, background),
            flag: Paint::bold_foreground(FLAG_TEXT, background),
            flag_default: flag_meta,
            flag_type: flag_meta,
            header: palette::heading(5, background),
            operator: Paint::bold_foreground(OPERATOR_TEXT, background),
        }
    }

    /// The paint used for an example-line highlight class.
    pub const fn highlight(&self, highlight: Highlight) -> Paint {
        match highlight {
            Highlight::Plain => Paint::plain(),
            Highlight::Command => self.command,
            Highlight::Flag => self.flag,
            Highlight::Operator => self.operator,
            Highlight::EnvVar => self.env_var,
            Highlight::EnvVarValue => self.env_var_value,
        }
    }
}
