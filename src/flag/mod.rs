//! Typed command-line flags and the metadata attached to them.
//!
//! A [`Flag`] pairs a name with a shared [`FlagValue`]. The caller keeps a
//! typed [`Handle`] to the same value to read the parsed result:
//!
//! ```
//! use helpkit::flag::{Flag, FlagSet, Scalar, shared};
//!
//! let verbose = shared(Scalar::new(false));
//! let mut flags = FlagSet::new();
//! flags.add(Flag::new("verbose", &verbose).short('v').usage("print more"));
//!
//! flags.lookup_mut("verbose").unwrap().set("true").unwrap();
//! assert!(verbose.borrow().get());
//! ```

mod enum_value;
mod env;
mod require;
mod value;

use std::cell::RefCell;
use std::rc::Rc;

use crate::cli::Completer;
use crate::error::Error;

pub use enum_value::{BaseKind, EnumChoices, EnumOption, EnumValue, Enumerable};
pub use env::bind_env;
pub(crate) use env::apply_env_bindings;
pub use require::mark_flag_requires;
pub(crate) use require::validate_requirements;
pub use value::{List, Primitive, Scalar, ValueKind};

/// A value shared between a flag and the code that reads it.
pub type Handle<V> = Rc<RefCell<V>>;

/// Wraps `value` in a [`Handle`].
pub fn shared<V>(value: V) -> Handle<V> {
    Rc::new(RefCell::new(value))
}

/// The capability every flag value provides.
pub trait FlagValue {
    /// Parses `raw` into the value.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not valid for this value; the stored
    /// value is left unchanged.
    fn set(&mut self, raw: &str) -> Result<(), Error>;

    /// The type hint shown in help output.
    fn type_name(&self) -> String;

    /// The current value as text.
    fn to_text(&self) -> String;

    fn kind(&self) -> ValueKind;

    /// Choice metadata for enumerated values.
    fn choices(&self) -> Option<EnumChoices> {
        None
    }
}

/// A read-only view of a flag, as consumed by the help renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDescriptor {
    pub name: String,
    pub shorthand: Option<char>,
    pub kind: ValueKind,
    /// The value's type hint, e.g. `string` or `json|yaml`.
    pub type_name: String,
    /// The default value as text, captured when the flag was defined.
    pub default: String,
    pub usage: String,
    pub hidden: bool,
    pub env_var: Option<String>,
    pub group: Option<String>,
    pub choices: Option<EnumChoices>,
}

/// A named command-line setting.
pub struct Flag {
    name: String,
    shorthand: Option<char>,
    usage: String,
    default: String,
    value: Handle<dyn FlagValue>,
    hidden: bool,
    group: Option<String>,
    env_var: Option<String>,
    requires: Vec<String>,
    completer: Option<Completer>,
    changed: bool,
}

impl Flag {
    /// Creates a flag backed by `value`, whose current text becomes the default.
    pub fn new<V: FlagValue + 'static>(name: impl Into<String>, value: &Handle<V>) -> Self {
        let default = value.borrow().to_text();
        let value: Handle<dyn FlagValue> = value.clone();

        Self {
            name: name.into(),
            shorthand: None,
            usage: String::new(),
            default,
            value,
            hidden: false,
            group: None,
            env_var: None,
            requires: Vec::new(),
            completer: None,
            changed: false,
        }
    }

    #[must_use]
    pub const fn short(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn env(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    #[must_use]
    pub fn complete(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn set_group(&mut self, group: impl Into<String>) {
        self.group = Some(group.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn default_text(&self) -> &str {
        &self.default
    }

    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// The environment variable bound to this flag, if any.
    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    /// The flags that must also be set when this one is.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub const fn completer(&self) -> Option<&Completer> {
        self.completer.as_ref()
    }

    /// Whether the flag was given on the command line.
    pub const fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn kind(&self) -> ValueKind {
        self.value.borrow().kind()
    }

    pub fn type_name(&self) -> String {
        self.value.borrow().type_name()
    }

    pub fn value_text(&self) -> String {
        self.value.borrow().to_text()
    }

    pub fn choices(&self) -> Option<EnumChoices> {
        self.value.borrow().choices()
    }

    /// Sets the value from the command line and marks the flag as changed.
    ///
    /// # Errors
    ///
    /// Returns the value's parse error.
    pub fn set(&mut self, raw: &str) -> Result<(), Error> {
        self.value.borrow_mut().set(raw)?;
        self.changed = true;
        Ok(())
    }

    pub fn descriptor(&self) -> FlagDescriptor {
        let value = self.value.borrow();
        FlagDescriptor {
            name: self.name.clone(),
            shorthand: self.shorthand,
            kind: value.kind(),
            type_name: value.type_name(),
            default: self.default.clone(),
            usage: self.usage.clone(),
            hidden: self.hidden,
            env_var: self.env_var.clone(),
            group: self.group.clone(),
            choices: value.choices(),
        }
    }
}

/// Attaches a completion source to `flag`. A `None` flag is ignored.
pub fn complete_flag(flag: Option<&mut Flag>, completer: Completer) {
    if let Some(flag) = flag {
        flag.completer = Some(completer);
    }
}

/// An ordered collection of flags, unique by name.
///
/// Flags are visited sorted by name unless sorting is turned off, in which
/// case they keep definition order.
#[derive(Default)]
pub struct FlagSet {
    flags: Vec<Flag>,
    unsorted: bool,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `flag`, replacing any flag with the same name.
    pub fn add(&mut self, flag: Flag) -> &mut Flag {
        let index = match self.flags.iter().position(|f| f.name == flag.name) {
            Some(index) => {
                self.flags[index] = flag;
                index
            }
            None => {
                self.flags.push(flag);
                self.flags.len() - 1
            }
        };
        &mut self.flags[index]
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Flag> {
        self.flags.iter_mut().find(|f| f.name == name)
    }

    /// Whether a flag already uses `shorthand`.
    pub fn has_shorthand(&self, shorthand: char) -> bool {
        self.flags.iter().any(|f| f.shorthand == Some(shorthand))
    }

    pub fn set_sorted(&mut self, sorted: bool) {
        self.unsorted = !sorted;
    }

    pub const fn is_sorted(&self) -> bool {
        !self.unsorted
    }

    /// All flags, hidden ones included, in visit order.
    pub fn visit(&self) -> Vec<&Flag> {
        let mut flags: Vec<&Flag> = self.flags.iter().collect();
        if !self.unsorted {
            flags.sort_by(|a, b| a.name.cmp(&b.name));
        }
        flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether any flag would be shown in help output.
    pub fn has_visible(&self) -> bool {
        self.flags.iter().any(|f| !f.hidden)
    }
}
