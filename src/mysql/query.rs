use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use mysql_async::consts::ColumnType;
use mysql_async::prelude::Protocol;
use mysql_async::{Column, QueryResult, Row, Value};

use crate::error::SqlMiddlewareDbError;
use crate::results::{ExecOutcome, ResultSet, WriteSummary};
use crate::types::RowValues;

/// Character set number MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

/// Read the first result of a driver response: its rows when the statement
/// returned columns, the write summary otherwise. Any further result sets are
/// drained so the link is left clean.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::MysqlError` if reading from the server fails.
pub async fn collect_outcome<P>(
    mut result: QueryResult<'_, 'static, P>,
) -> Result<ExecOutcome, SqlMiddlewareDbError>
where
    P: Protocol,
{
    let columns = match result.columns() {
        Some(columns) if !columns.is_empty() => columns,
        _ => {
            let summary = WriteSummary {
                affected_rows: result.affected_rows(),
                last_insert_id: result.last_insert_id(),
                warnings: result.warnings(),
            };
            result.drop_result().await?;
            return Ok(ExecOutcome::Write(summary));
        }
    };

    let rows: Vec<Row> = result.collect().await?;
    result.drop_result().await?;
    Ok(ExecOutcome::Rows(build_result_set(&columns, &rows)?))
}

/// Build a result set from driver rows.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ExecutionError` if a cell cannot be decoded.
pub fn build_result_set(columns: &[Column], rows: &[Row]) -> Result<ResultSet, SqlMiddlewareDbError> {
    let column_names: Vec<String> = columns
        .iter()
        .map(|col| col.name_str().into_owned())
        .collect();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            let value = match row.as_ref(idx) {
                Some(value) => from_mysql_value(value, column)?,
                None => RowValues::Null,
            };
            row_values.push(value);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Convert one driver cell into a middleware value, using the column metadata to
/// decode text-protocol bytes.
///
/// # Errors
/// Returns `SqlMiddlewareDbError::ExecutionError` if a numeric column carries bytes
/// that do not parse as a number.
pub fn from_mysql_value(value: &Value, column: &Column) -> Result<RowValues, SqlMiddlewareDbError> {
    Ok(match value {
        Value::NULL => RowValues::Null,
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => unsigned(*u),
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(d) => RowValues::Float(*d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            date_value(*year, *month, *day, *hour, *minute, *second, *micros)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            RowValues::Text(time_text(*negative, *days, *hours, *minutes, *seconds, *micros))
        }
        Value::Bytes(bytes) => decode_bytes(bytes, column)?,
    })
}

fn unsigned(value: u64) -> RowValues {
    // BIGINT UNSIGNED values above i64::MAX keep their exact digits as text.
    i64::try_from(value).map_or_else(|_| RowValues::Text(value.to_string()), RowValues::Int)
}

#[allow(clippy::too_many_arguments)]
fn date_value(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> RowValues {
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .and_then(|d| {
            d.and_hms_micro_opt(u32::from(hour), u32::from(minute), u32::from(second), micros)
        })
        .map_or_else(
            // Zero dates such as 0000-00-00 have no chrono form.
            || {
                RowValues::Text(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            },
            RowValues::Timestamp,
        )
}

fn time_text(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let total_hours = days * 24 + u32::from(hours);
    if micros == 0 {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}

fn decode_bytes(bytes: &[u8], column: &Column) -> Result<RowValues, SqlMiddlewareDbError> {
    match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            let text = utf8(bytes, column)?;
            if let Ok(i) = text.parse::<i64>() {
                Ok(RowValues::Int(i))
            } else {
                let u = text.parse::<u64>().map_err(|e| decode_error(column, &e))?;
                Ok(unsigned(u))
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            let text = utf8(bytes, column)?;
            text.parse::<f64>()
                .map(RowValues::Float)
                .map_err(|e| decode_error(column, &e))
        }
        ColumnType::MYSQL_TYPE_JSON => Ok(serde_json::from_slice(bytes).map_or_else(
            |_| RowValues::Text(String::from_utf8_lossy(bytes).into_owned()),
            RowValues::JSON,
        )),
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2
        | ColumnType::MYSQL_TYPE_DATE
        | ColumnType::MYSQL_TYPE_NEWDATE => {
            let text = utf8(bytes, column)?;
            Ok(parse_datetime(text)
                .map_or_else(|| RowValues::Text(text.to_string()), RowValues::Timestamp))
        }
        // Numeric and temporal metadata reports the binary charset, so these are
        // matched before the charset check below.
        ColumnType::MYSQL_TYPE_DECIMAL
        | ColumnType::MYSQL_TYPE_NEWDECIMAL
        | ColumnType::MYSQL_TYPE_TIME
        | ColumnType::MYSQL_TYPE_TIME2 => Ok(RowValues::Text(utf8(bytes, column)?.to_string())),
        ColumnType::MYSQL_TYPE_BIT if bytes.len() == 1 => Ok(RowValues::Bool(bytes[0] != 0)),
        ColumnType::MYSQL_TYPE_BIT
        | ColumnType::MYSQL_TYPE_GEOMETRY
        | ColumnType::MYSQL_TYPE_VECTOR => Ok(RowValues::Blob(bytes.to_vec())),
        _ if column.character_set() == BINARY_CHARSET => Ok(RowValues::Blob(bytes.to_vec())),
        _ => Ok(match std::str::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text.to_string()),
            Err(_) => RowValues::Blob(bytes.to_vec()),
        }),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn utf8<'a>(bytes: &'a [u8], column: &Column) -> Result<&'a str, SqlMiddlewareDbError> {
    std::str::from_utf8(bytes).map_err(|e| decode_error(column, &e))
}

fn decode_error(column: &Column, err: &dyn std::fmt::Display) -> SqlMiddlewareDbError {
    SqlMiddlewareDbError::ExecutionError(format!(
        "failed to decode column `{}`: {err}",
        column.name_str()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_async::consts::ColumnType;

    fn column(name: &str, ty: ColumnType) -> Column {
        Column::new(ty).with_name(name.as_bytes()).with_character_set(33)
    }

    #[test]
    fn decodes_text_protocol_numbers() {
        let col = column("n", ColumnType::MYSQL_TYPE_LONGLONG);
        assert_eq!(
            from_mysql_value(&Value::Bytes(b"42".to_vec()), &col).unwrap(),
            RowValues::Int(42)
        );
        assert_eq!(
            from_mysql_value(&Value::Bytes(b"18446744073709551615".to_vec()), &col).unwrap(),
            RowValues::Text("18446744073709551615".into())
        );
        let col = column("f", ColumnType::MYSQL_TYPE_DOUBLE);
        assert_eq!(
            from_mysql_value(&Value::Bytes(b"1.5".to_vec()), &col).unwrap(),
            RowValues::Float(1.5)
        );
    }

    #[test]
    fn decodes_datetimes_and_zero_dates() {
        let col = column("t", ColumnType::MYSQL_TYPE_DATETIME);
        let value = from_mysql_value(&Value::Bytes(b"2024-01-02 03:04:05".to_vec()), &col).unwrap();
        assert_eq!(
            value.as_timestamp().map(|t| t.to_string()),
            Some("2024-01-02 03:04:05".to_string())
        );
        assert_eq!(
            from_mysql_value(&Value::Date(0, 0, 0, 0, 0, 0, 0), &col).unwrap(),
            RowValues::Text("0000-00-00 00:00:00".into())
        );
    }

    #[test]
    fn binary_charset_reads_as_blob() {
        let col = Column::new(ColumnType::MYSQL_TYPE_BLOB)
            .with_name(b"b")
            .with_character_set(BINARY_CHARSET);
        assert_eq!(
            from_mysql_value(&Value::Bytes(vec![0, 159]), &col).unwrap(),
            RowValues::Blob(vec![0, 159])
        );
    }

    #[test]
    fn json_and_decimal() {
        let col = column("j", ColumnType::MYSQL_TYPE_JSON);
        assert_eq!(
            from_mysql_value(&Value::Bytes(br#"{"a":1}"#.to_vec()), &col).unwrap(),
            RowValues::JSON(serde_json::json!({"a": 1}))
        );
        let col = column("d", ColumnType::MYSQL_TYPE_NEWDECIMAL);
        assert_eq!(
            from_mysql_value(&Value::Bytes(b"10.50".to_vec()), &col).unwrap(),
            RowValues::Text("10.50".into())
        );
    }

    #[test]
    fn negative_time_is_text() {
        let col = column("t", ColumnType::MYSQL_TYPE_TIME);
        assert_eq!(
            from_mysql_value(&Value::Time(true, 1, 2, 3, 4, 0), &col).unwrap(),
            RowValues::Text("-26:03:04".into())
        );
    }
}
