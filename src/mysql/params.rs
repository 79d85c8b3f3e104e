use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use mysql_async::{Params, Value};

use crate::error::SqlMiddlewareDbError;
use crate::types::{NamedBindings, RowValues};

/// Convert a middleware value into a driver value.
///
/// MySQL has no boolean wire type, so booleans travel as `1` / `0`. JSON values are
/// sent as their text form.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` for timestamps outside the year
/// range MySQL can store.
pub fn to_mysql_value(value: &RowValues) -> Result<Value, SqlMiddlewareDbError> {
    Ok(match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => timestamp_value(dt)?,
        RowValues::Null => Value::NULL,
        RowValues::JSON(json) => Value::Bytes(json.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp_value(dt: &NaiveDateTime) -> Result<Value, SqlMiddlewareDbError> {
    let year = u16::try_from(dt.year()).map_err(|_| {
        SqlMiddlewareDbError::ParameterError(format!("timestamp year out of range: {dt}"))
    })?;
    // chrono bounds month, day and time fields well below u8::MAX.
    Ok(Value::Date(
        year,
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
        dt.nanosecond() / 1_000,
    ))
}

/// Driver parameters for the positional (`?`) path.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` if a value cannot be converted.
pub fn convert_positional(values: &[RowValues]) -> Result<Params, SqlMiddlewareDbError> {
    if values.is_empty() {
        return Ok(Params::Empty);
    }
    let mut converted = Vec::with_capacity(values.len());
    for value in values {
        converted.push(to_mysql_value(value)?);
    }
    Ok(Params::Positional(converted))
}

/// Driver parameters for the named (`:name`) path.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ParameterError` if a value cannot be converted.
pub fn convert_named(bindings: &NamedBindings) -> Result<Params, SqlMiddlewareDbError> {
    if bindings.is_empty() {
        return Ok(Params::Empty);
    }
    let mut converted = HashMap::with_capacity(bindings.len());
    for (name, value) in bindings {
        converted.insert(name.as_bytes().to_vec(), to_mysql_value(value)?);
    }
    Ok(Params::Named(converted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn converts_scalars() {
        assert_eq!(to_mysql_value(&RowValues::Bool(true)).unwrap(), Value::Int(1));
        assert_eq!(to_mysql_value(&RowValues::Null).unwrap(), Value::NULL);
        assert_eq!(
            to_mysql_value(&RowValues::Text("O'Brien".into())).unwrap(),
            Value::Bytes(b"O'Brien".to_vec())
        );
    }

    #[test]
    fn converts_timestamps_with_micros() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_micro_opt(7, 8, 9, 123_456)
            .unwrap();
        assert_eq!(
            to_mysql_value(&RowValues::Timestamp(dt)).unwrap(),
            Value::Date(2024, 5, 6, 7, 8, 9, 123_456)
        );
    }

    #[test]
    fn empty_params_are_empty() {
        assert_eq!(convert_positional(&[]).unwrap(), Params::Empty);
        assert_eq!(convert_named(&NamedBindings::new()).unwrap(), Params::Empty);
    }

    #[test]
    fn named_keys_are_bytes() {
        let mut bindings = NamedBindings::new();
        bindings.insert("id".to_string(), RowValues::Int(5));
        match convert_named(&bindings).unwrap() {
            Params::Named(map) => assert_eq!(map.get(b"id".as_slice()), Some(&Value::Int(5))),
            other => panic!("unexpected params {other:?}"),
        }
    }
}
