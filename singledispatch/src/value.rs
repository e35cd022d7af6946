//! Runtime values that report their concrete type.

use std::fmt;

/// A value whose concrete runtime type is known by name.
///
/// The name is looked up in the dispatcher's [`crate::Hierarchy`]; a
/// name the hierarchy does not declare dispatches to the default
/// implementation.
pub trait Typed {
    /// Name of the concrete runtime type of this value.
    fn type_name(&self) -> &str;
}

impl<T: Typed + ?Sized> Typed for &T {
    fn type_name(&self) -> &str {
        (**self).type_name()
    }
}

/// A dynamically typed value over the builtin hierarchy
/// ([`crate::Hierarchy::builtins`]). Every concrete builtin type has a
/// variant; `Object` is a bare instance of the root class.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Object,
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
    Range { start: i64, stop: i64, step: i64 },
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// A list of string values.
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(Value::str).collect())
    }

    /// A tuple of string values.
    pub fn str_tuple<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Tuple(items.into_iter().map(Value::str).collect())
    }

    /// A `range(start, stop)` with step 1.
    pub fn range(start: i64, stop: i64) -> Self {
        Value::Range { start, stop, step: 1 }
    }

    /// The contained string, for `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of an ordered container (`List` or `Tuple`).
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Quoted representation, as shown inside containers.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

impl Typed for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Object => "object",
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::FrozenSet(_) => "frozenset",
            Value::Range { .. } => "range",
        }
    }
}

fn join_repr<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(Value::repr).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object => f.write_str("<object object>"),
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(bytes) => write!(f, "b{:?}", String::from_utf8_lossy(bytes)),
            Value::List(items) => write!(f, "[{}]", join_repr(items.iter())),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].repr()),
            Value::Tuple(items) => write!(f, "({})", join_repr(items.iter())),
            Value::Dict(pairs) => {
                let body = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", body)
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => write!(f, "{{{}}}", join_repr(items.iter())),
            Value::FrozenSet(items) if items.is_empty() => f.write_str("frozenset()"),
            Value::FrozenSet(items) => write!(f, "frozenset({{{}}})", join_repr(items.iter())),
            Value::Range { start, stop, step: 1 } => write!(f, "range({}, {})", start, stop),
            Value::Range { start, stop, step } => {
                write!(f, "range({}, {}, {})", start, stop, step)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::None.type_name(), "NoneType");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::str_tuple(["a"]).type_name(), "tuple");
        assert_eq!((&Value::Int(1)).type_name(), "int");
        assert_eq!(Value::Object.type_name(), "object");
        assert_eq!(Value::FrozenSet(vec![]).type_name(), "frozenset");
        assert_eq!(Value::range(0, 3).type_name(), "range");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::str("val").to_string(), "val");
        assert_eq!(Value::str_list(["1", "2"]).to_string(), "['1', '2']");
        assert_eq!(Value::str_tuple(["1"]).to_string(), "('1',)");
        assert_eq!(Value::List(vec![]).to_string(), "[]");
        assert_eq!(Value::Set(vec![]).to_string(), "set()");
        assert_eq!(Value::FrozenSet(vec![]).to_string(), "frozenset()");
        assert_eq!(
            Value::FrozenSet(vec![Value::Int(1)]).to_string(),
            "frozenset({1})"
        );
        assert_eq!(Value::range(0, 3).to_string(), "range(0, 3)");
        assert_eq!(
            Value::Range { start: 0, stop: 10, step: 2 }.to_string(),
            "range(0, 10, 2)"
        );
        assert_eq!(Value::Object.to_string(), "<object object>");
        assert_eq!(
            Value::Dict(vec![(Value::str("k"), Value::Int(1))]).to_string(),
            "{'k': 1}"
        );
    }

    #[test]
    fn test_items() {
        assert_eq!(Value::str_list(["a", "b"]).items().map(<[Value]>::len), Some(2));
        assert_eq!(Value::List(vec![]).items().map(<[Value]>::len), Some(0));
        assert!(Value::str("ab").items().is_none());
        assert_eq!(Value::str("ab").as_str(), Some("ab"));
    }
}
