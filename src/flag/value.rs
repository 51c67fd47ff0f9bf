//! Scalar and list flag values over primitive types.

use std::fmt::Display;
use std::net::IpAddr;
use std::str::FromStr;

use super::FlagValue;
use crate::error::Error;

/// The underlying kind of a flag value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    String,
    Int,
    Uint,
    Float,
    Ip,
    Bools,
    Strings,
    Ints,
    Uints,
    Floats,
    Ips,
}

impl ValueKind {
    /// The type hint shown in help output, e.g. `strings` for a string list.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Ip => "ip",
            Self::Bools => "bools",
            Self::Strings => "strings",
            Self::Ints => "ints",
            Self::Uints => "uints",
            Self::Floats => "floats",
            Self::Ips => "ips",
        }
    }

    /// The list kind holding elements of this kind.
    pub const fn list(self) -> Self {
        match self {
            Self::Bool | Self::Bools => Self::Bools,
            Self::String | Self::Strings => Self::Strings,
            Self::Int | Self::Ints => Self::Ints,
            Self::Uint | Self::Uints => Self::Uints,
            Self::Float | Self::Floats => Self::Floats,
            Self::Ip | Self::Ips => Self::Ips,
        }
    }

    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::Bools | Self::Strings | Self::Ints | Self::Uints | Self::Floats | Self::Ips
        )
    }
}

/// A type a flag can hold directly.
pub trait Primitive: FromStr<Err: Display> + Display + Clone + 'static {
    const KIND: ValueKind;
}

macro_rules! primitive {
    ($kind:ident: $($ty:ty),+) => {
        $(impl Primitive for $ty {
            const KIND: ValueKind = ValueKind::$kind;
        })+
    };
}

primitive!(Bool: bool);
primitive!(String: String);
primitive!(Int: i8, i16, i32, i64, isize);
primitive!(Uint: u8, u16, u32, u64, usize);
primitive!(Float: f32, f64);
primitive!(Ip: IpAddr);

fn parse<T: Primitive>(raw: &str) -> Result<T, Error> {
    raw.parse().map_err(|e: T::Err| Error::InvalidValue {
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// A single value of a primitive type.
#[derive(Debug, Clone)]
pub struct Scalar<T> {
    value: T,
}

impl<T: Primitive> Scalar<T> {
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }
}

impl<T: Primitive> FlagValue for Scalar<T> {
    fn set(&mut self, raw: &str) -> Result<(), Error> {
        self.value = parse(raw)?;
        Ok(())
    }

    fn type_name(&self) -> String {
        T::KIND.type_name().to_string()
    }

    fn to_text(&self) -> String {
        self.value.to_string()
    }

    fn kind(&self) -> ValueKind {
        T::KIND
    }
}

/// A comma-separated list of primitive values.
///
/// The first `set` replaces the default; later ones append.
#[derive(Debug, Clone)]
pub struct List<T> {
    values: Vec<T>,
    changed: bool,
}

impl<T: Primitive> List<T> {
    pub const fn new(values: Vec<T>) -> Self {
        Self {
            values,
            changed: false,
        }
    }

    pub fn get(&self) -> Vec<T> {
        self.values.clone()
    }
}

impl<T: Primitive> Default for List<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Primitive> FlagValue for List<T> {
    fn set(&mut self, raw: &str) -> Result<(), Error> {
        let parsed = raw
            .split(',')
            .map(parse::<T>)
            .collect::<Result<Vec<_>, _>>()?;

        if self.changed {
            self.values.extend(parsed);
        } else {
            self.values = parsed;
            self.changed = true;
        }
        Ok(())
    }

    fn type_name(&self) -> String {
        T::KIND.list().type_name().to_string()
    }

    fn to_text(&self) -> String {
        let items: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        format!("[{}]", items.join(","))
    }

    fn kind(&self) -> ValueKind {
        T::KIND.list()
    }
}
