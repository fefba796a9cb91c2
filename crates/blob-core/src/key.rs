//! Scalar values and the keys built from them.

use std::fmt;

use serde_json::Number;

/// A leaf value.
///
/// Scalars are hashable, so the same type serves as a mapping key, a set
/// member and a path step. An integer index is a `Number` holding a
/// non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// A single step of a key path.
pub type Key = Scalar;

impl Scalar {
    /// Returns the sequence index this key addresses, if any.
    ///
    /// Only non-negative integers index a sequence; `1.0` and `-1` do not.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Scalar::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::String(s.clone())
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                fn from(n: $t) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Scalar {
    /// Non-finite floats have no JSON number form and become `Null`.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Scalar::Null, Scalar::Number)
    }
}

impl From<f32> for Scalar {
    fn from(f: f32) -> Self {
        Scalar::from(f64::from(f))
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// Builds a key path from heterogeneous literals.
///
/// ```
/// use blob_core::{path, Key};
///
/// let p = path!["servers", 0, "port"];
/// assert_eq!(p[1], Key::from(0));
/// ```
#[macro_export]
macro_rules! path {
    () => {{
        let empty: [$crate::Key; 0] = [];
        empty
    }};
    ($($k:expr),+ $(,)?) => {
        [$($crate::Key::from($k)),+]
    };
}
