//! Type-safe enumerated flag values.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use super::FlagValue;
use super::value::ValueKind;
use crate::error::Error;

/// Whether an enumerated type is represented by numbers or by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Int,
    String,
}

impl BaseKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
        }
    }

    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Int => ValueKind::Int,
            Self::String => ValueKind::String,
        }
    }
}

/// A type usable as the choices of an [`EnumValue`].
///
/// The display name of a choice is its `Display` output. Text-backed enums
/// implement this with `BASE = BaseKind::String`:
///
/// ```
/// use std::fmt;
/// use helpkit::flag::{BaseKind, Enumerable};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Format {
///     Json,
///     Yaml,
/// }
///
/// impl fmt::Display for Format {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(match self {
///             Self::Json => "json",
///             Self::Yaml => "yaml",
///         })
///     }
/// }
///
/// impl Enumerable for Format {
///     const BASE: BaseKind = BaseKind::String;
/// }
/// ```
pub trait Enumerable: Clone + Eq + Hash + Display + 'static {
    const BASE: BaseKind;
}

macro_rules! enumerable {
    ($base:ident: $($ty:ty),+) => {
        $(impl Enumerable for $ty {
            const BASE: BaseKind = BaseKind::$base;
        })+
    };
}

enumerable!(String: String, &'static str);
enumerable!(Int: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// One allowed choice and its help text (empty when none was given).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOption {
    pub name: String,
    pub help: String,
}

/// Choice metadata an enumerated flag exposes to the help renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumChoices {
    pub entries: Vec<EnumOption>,
    pub has_help: bool,
    pub base: BaseKind,
}

/// A flag value restricted to a closed, ordered set of choices.
#[derive(Debug, Clone)]
pub struct EnumValue<T: Enumerable> {
    value: T,
    names: HashMap<T, String>,
    values: HashMap<String, T>,
    allowed: Vec<String>,
    help: HashMap<String, String>,
}

impl<T: Enumerable> EnumValue<T> {
    /// Creates an enum starting at `default`, accepting `allowed` in order.
    pub fn new(default: T, allowed: impl IntoIterator<Item = T>) -> Self {
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        let mut ordered = Vec::new();

        for choice in allowed {
            let name = choice.to_string();
            names.insert(choice.clone(), name.clone());
            values.insert(name.clone(), choice);
            ordered.push(name);
        }

        Self {
            value: default,
            names,
            values,
            allowed: ordered,
            help: HashMap::new(),
        }
    }

    /// Attaches help text to the choices, position by position.
    ///
    /// Empty strings and entries beyond the last choice are ignored. Calling
    /// this with no entries leaves the enum unchanged.
    #[must_use]
    pub fn with_help<S: Into<String>>(mut self, help: impl IntoIterator<Item = S>) -> Self {
        let help: Vec<String> = help.into_iter().map(Into::into).collect();
        if help.is_empty() {
            return self;
        }

        self.help = self
            .allowed
            .iter()
            .zip(help)
            .filter(|(_, text)| !text.is_empty())
            .map(|(name, text)| (name.clone(), text))
            .collect();
        self
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn has_help(&self) -> bool {
        !self.help.is_empty()
    }

    /// Every choice with its help text, in display order.
    pub fn help_entries(&self) -> Vec<EnumOption> {
        self.allowed
            .iter()
            .map(|name| EnumOption {
                name: name.clone(),
                help: self.help.get(name).cloned().unwrap_or_default(),
            })
            .collect()
    }

    pub const fn base_kind(&self) -> BaseKind {
        T::BASE
    }
}

impl<T: Enumerable> FlagValue for EnumValue<T> {
    fn set(&mut self, raw: &str) -> Result<(), Error> {
        match self.values.get(raw) {
            Some(value) => {
                self.value = value.clone();
                Ok(())
            }
            None => Err(Error::InvalidChoice {
                allowed: self.allowed.clone(),
            }),
        }
    }

    fn type_name(&self) -> String {
        self.allowed.join("|")
    }

    fn to_text(&self) -> String {
        self.names.get(&self.value).cloned().unwrap_or_default()
    }

    fn kind(&self) -> ValueKind {
        T::BASE.kind()
    }

    fn choices(&self) -> Option<EnumChoices> {
        Some(EnumChoices {
            entries: self.help_entries(),
            has_help: self.has_help(),
            base: T::BASE,
        })
    }
}
