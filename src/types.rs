use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row, bound as parameters, or inlined by the
/// statement builder.
///
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// MySQL has no boolean column type, so `TINYINT` 0/1 also reads as a bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(1) => Some(true),
            RowValues::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let RowValues::JSON(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RowValues {
                fn from(value: $ty) -> Self {
                    RowValues::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&String> for RowValues {
    fn from(value: &String) -> Self {
        RowValues::Text(value.clone())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Name → value map for named-parameter execution (`:name` placeholders).
pub type NamedBindings = BTreeMap<String, RowValues>;

/// Parameters for [`Connection::exec`](crate::connection::Connection::exec).
///
/// The variant alone picks the execution path: `Named` runs the named-parameter
/// path, `Positional` runs the positional (`?`) path. The default is an empty
/// positional list.
#[derive(Debug, Clone, PartialEq)]
pub enum Bindings {
    Named(NamedBindings),
    Positional(Vec<RowValues>),
}

impl Default for Bindings {
    fn default() -> Self {
        Bindings::Positional(Vec::new())
    }
}

impl Bindings {
    /// An empty named map. Selects the named-parameter path with no parameters.
    #[must_use]
    pub fn named() -> Self {
        Bindings::Named(NamedBindings::new())
    }

    #[must_use]
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Bindings::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Add a named parameter. Called on a positional set, this starts a fresh named
    /// map, since the two shapes cannot be mixed in one execution.
    #[must_use]
    pub fn bind(self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        let mut map = match self {
            Bindings::Named(map) => map,
            Bindings::Positional(_) => NamedBindings::new(),
        };
        map.insert(name.into(), value.into());
        Bindings::Named(map)
    }

    /// Named bindings built from `(name, value)` pairs.
    #[must_use]
    pub fn named_from<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        Bindings::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        matches!(self, Bindings::Named(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Bindings::Named(map) => map.len(),
            Bindings::Positional(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<NamedBindings> for Bindings {
    fn from(map: NamedBindings) -> Self {
        Bindings::Named(map)
    }
}

impl<S: Into<String>> From<HashMap<S, RowValues>> for Bindings {
    fn from(map: HashMap<S, RowValues>) -> Self {
        Bindings::Named(map.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Vec<RowValues>> for Bindings {
    fn from(values: Vec<RowValues>) -> Self {
        Bindings::Positional(values)
    }
}

impl<const N: usize> From<[RowValues; N]> for Bindings {
    fn from(values: [RowValues; N]) -> Self {
        Bindings::Positional(values.into())
    }
}

impl From<()> for Bindings {
    fn from((): ()) -> Self {
        Bindings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_are_empty_positional() {
        let bindings = Bindings::default();
        assert!(!bindings.is_named());
        assert!(bindings.is_empty());
    }

    #[test]
    fn bind_switches_positional_to_named() {
        let bindings = Bindings::default().bind("id", 7).bind("name", "x");
        match bindings {
            Bindings::Named(map) => {
                assert_eq!(map.get("id"), Some(&RowValues::Int(7)));
                assert_eq!(map.get("name"), Some(&RowValues::Text("x".into())));
            }
            Bindings::Positional(_) => panic!("expected named bindings"),
        }
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(RowValues::from(None::<i32>), RowValues::Null);
        assert_eq!(RowValues::from(Some("a")), RowValues::Text("a".into()));
    }

    #[test]
    fn tinyint_reads_as_bool() {
        assert_eq!(RowValues::Int(1).as_bool(), Some(true));
        assert_eq!(RowValues::Int(2).as_bool(), None);
    }
}
