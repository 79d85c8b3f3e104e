use std::fmt::Write as _;

use chrono::{NaiveDateTime, Timelike};
use serde_json::Value as JsonValue;

use super::{Fragment, RenderContext, RenderMode, Select, Statement};
use crate::error::SqlMiddlewareDbError;
use crate::types::RowValues;

/// A value consumed by one `?` of a builder expression.
#[derive(Debug, Clone)]
pub enum SqlParam {
    /// A single value.
    Value(RowValues),
    /// A parenthesised list, e.g. for `IN ?`.
    List(Vec<RowValues>),
    /// A nested SELECT, rendered in parentheses.
    Query(Box<Select>),
}

impl SqlParam {
    #[must_use]
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        SqlParam::List(values.into_iter().map(Into::into).collect())
    }

    pub(crate) fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        match self {
            SqlParam::Value(value) => match ctx.mode {
                RenderMode::Inline => Ok(Fragment::from_text(format_value(value, ctx)?)),
                RenderMode::Parameterized => Ok(Fragment {
                    text: "?".to_string(),
                    values: vec![value.clone()],
                }),
            },
            SqlParam::List(values) => {
                let mut out = Fragment::default();
                let mut parts = Vec::with_capacity(values.len());
                for value in values {
                    let part = SqlParam::Value(value.clone()).render(ctx)?;
                    parts.push(part.text);
                    out.values.extend(part.values);
                }
                out.text = format!("({})", parts.join(", "));
                Ok(out)
            }
            SqlParam::Query(select) => {
                let inner = select.render(ctx.mode)?;
                Ok(Fragment {
                    text: format!("({})", inner.text),
                    values: inner.values,
                })
            }
        }
    }
}

impl From<Select> for SqlParam {
    fn from(select: Select) -> Self {
        SqlParam::Query(Box::new(select))
    }
}

impl<T: Into<RowValues>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        SqlParam::Value(value.into())
    }
}

/// Parameters accepted by builder calls: `()`, a single value, a nested
/// [`Select`], a tuple, or an array / `Vec` of values (one per `?`).
///
/// A list meant for a single `IN ?` placeholder is passed as
/// [`SqlParam::list`].
pub trait IntoParams {
    fn into_params(self) -> Vec<SqlParam>;
}

impl IntoParams for () {
    fn into_params(self) -> Vec<SqlParam> {
        Vec::new()
    }
}

impl IntoParams for SqlParam {
    fn into_params(self) -> Vec<SqlParam> {
        vec![self]
    }
}

impl IntoParams for Select {
    fn into_params(self) -> Vec<SqlParam> {
        vec![self.into()]
    }
}

impl<T: Into<RowValues>> IntoParams for Option<T> {
    fn into_params(self) -> Vec<SqlParam> {
        vec![self.into()]
    }
}

impl<T: Into<SqlParam>> IntoParams for Vec<T> {
    fn into_params(self) -> Vec<SqlParam> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<SqlParam>, const N: usize> IntoParams for [T; N] {
    fn into_params(self) -> Vec<SqlParam> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! impl_scalar_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SqlParam {
                fn from(value: $ty) -> Self {
                    SqlParam::Value(value.into())
                }
            }

            impl IntoParams for $ty {
                fn into_params(self) -> Vec<SqlParam> {
                    vec![self.into()]
                }
            }
        )*
    };
}

impl_scalar_param!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    &str,
    String,
    &String,
    NaiveDateTime,
    JsonValue,
    RowValues,
);

macro_rules! impl_tuple_params {
    ($($name:ident),+) => {
        impl<$($name: Into<SqlParam>),+> IntoParams for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_params(self) -> Vec<SqlParam> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

impl_tuple_params!(A);
impl_tuple_params!(A, B);
impl_tuple_params!(A, B, C);
impl_tuple_params!(A, B, C, D);
impl_tuple_params!(A, B, C, D, E);
impl_tuple_params!(A, B, C, D, E, F);

/// Text with `?` placeholders plus the parameters that fill them, in order.
#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    params: Vec<SqlParam>,
}

impl Expression {
    pub fn new(text: impl Into<String>, params: impl IntoParams) -> Self {
        Self {
            text: text.into(),
            params: params.into_params(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Substitute each `?` outside quoted sections with its rendered parameter.
    ///
    /// # Errors
    /// Returns `BuildError` when the number of placeholders and parameters differ.
    pub fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let placeholders = placeholder_positions(&self.text);
        if placeholders.len() != self.params.len() {
            return Err(SqlMiddlewareDbError::BuildError(format!(
                "`{}` has {} placeholder(s) but {} parameter(s) were given",
                self.text,
                placeholders.len(),
                self.params.len()
            )));
        }

        let mut out = Fragment::default();
        let mut last = 0;
        for (pos, param) in placeholders.into_iter().zip(&self.params) {
            out.text.push_str(&self.text[last..pos]);
            let rendered = param.render(ctx)?;
            out.text.push_str(&rendered.text);
            out.values.extend(rendered.values);
            last = pos + 1;
        }
        out.text.push_str(&self.text[last..]);
        Ok(out)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    Quoted(u8),
}

fn placeholder_positions(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut positions = Vec::new();
    let mut state = ScanState::Normal;
    let mut idx = 0;
    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            ScanState::Normal => match b {
                b'\'' | b'"' | b'`' => state = ScanState::Quoted(b),
                b'?' => positions.push(idx),
                _ => {}
            },
            ScanState::Quoted(q) => {
                if b == b'\\' && q != b'`' {
                    idx += 1;
                } else if b == q {
                    state = ScanState::Normal;
                }
            }
        }
        idx += 1;
    }
    positions
}

/// Format a value as an inline SQL literal.
///
/// # Errors
/// Returns `BuildError` for non-finite floats, which have no SQL literal.
pub(crate) fn format_value(
    value: &RowValues,
    ctx: &RenderContext<'_>,
) -> Result<String, SqlMiddlewareDbError> {
    let opts = ctx.options;
    Ok(match value {
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => {
            if !f.is_finite() {
                return Err(SqlMiddlewareDbError::BuildError(format!(
                    "cannot inline non-finite float {f}"
                )));
            }
            f.to_string()
        }
        RowValues::Text(s) => format!("'{}'", opts.escape_string(s)),
        RowValues::Bool(true) => "TRUE".to_string(),
        RowValues::Bool(false) => "FALSE".to_string(),
        RowValues::Null => "NULL".to_string(),
        RowValues::Timestamp(dt) => format!("'{}'", format_timestamp(dt)),
        RowValues::JSON(json) => format!("'{}'", opts.escape_string(&json.to_string())),
        RowValues::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2 + 3);
            hex.push_str("X'");
            for byte in bytes {
                let _ = write!(hex, "{byte:02X}");
            }
            hex.push('\'');
            hex
        }
    })
}

pub(crate) fn format_timestamp(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementOptions;
    use chrono::NaiveDate;

    fn inline(options: &StatementOptions) -> RenderContext<'_> {
        RenderContext {
            options,
            mode: RenderMode::Inline,
            has_source: false,
        }
    }

    #[test]
    fn inlines_scalars() {
        let opts = StatementOptions::default();
        let ctx = inline(&opts);
        let expr = Expression::new("a = ? AND b = ? AND c IS ?", (7, true, RowValues::Null));
        assert_eq!(expr.render(&ctx).unwrap().text, "a = 7 AND b = TRUE AND c IS NULL");
    }

    #[test]
    fn skips_placeholders_in_literals() {
        assert_eq!(placeholder_positions("a = '?' AND b = ?"), vec![16]);
        assert_eq!(placeholder_positions(r"a = 'it\'s ?' AND `c?` = ?"), vec![25]);
    }

    #[test]
    fn placeholder_count_mismatch_is_a_build_error() {
        let opts = StatementOptions::default();
        let err = Expression::new("a = ? AND b = ?", 1).render(&inline(&opts)).unwrap_err();
        assert!(matches!(err, SqlMiddlewareDbError::BuildError(_)));
    }

    #[test]
    fn list_param_renders_parenthesised() {
        let opts = StatementOptions::default();
        let expr = Expression::new("id IN ?", SqlParam::list([1, 2, 3]));
        assert_eq!(expr.render(&inline(&opts)).unwrap().text, "id IN (1, 2, 3)");

        let ctx = RenderContext {
            options: &opts,
            mode: RenderMode::Parameterized,
            has_source: false,
        };
        let frag = expr.render(&ctx).unwrap();
        assert_eq!(frag.text, "id IN (?, ?, ?)");
        assert_eq!(frag.values.len(), 3);
    }

    #[test]
    fn formats_timestamps_blobs_and_json() {
        let opts = StatementOptions::default();
        let ctx = inline(&opts);
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            format_value(&RowValues::Timestamp(dt), &ctx).unwrap(),
            "'2024-01-02 03:04:05'"
        );
        assert_eq!(
            format_value(&RowValues::Blob(vec![0xde, 0xad]), &ctx).unwrap(),
            "X'DEAD'"
        );
        assert_eq!(
            format_value(&RowValues::JSON(serde_json::json!({"n": "O'B"})), &ctx).unwrap(),
            r#"'{"n":"O\'B"}'"#
        );
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let opts = StatementOptions::default();
        assert!(format_value(&RowValues::Float(f64::NAN), &inline(&opts)).is_err());
    }
}
