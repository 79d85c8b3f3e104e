//! Clause blocks shared by the SELECT, INSERT, UPDATE and DELETE statements.

use super::{ClauseRenderer, Expression, Fragment, RenderContext, Select, SqlParam, Statement};
use crate::error::SqlMiddlewareDbError;

/// Fixed keyword such as `SELECT` or `DELETE`.
#[derive(Debug, Clone)]
pub struct KeywordBlock(pub(crate) &'static str);

impl ClauseRenderer for KeywordBlock {
    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        Ok(Fragment::from_text(self.0))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TableSource {
    Name(String),
    Query(Box<Select>),
}

#[derive(Debug, Clone)]
pub(crate) struct TableRef {
    source: TableSource,
    alias: Option<String>,
}

impl TableRef {
    pub(crate) fn named(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            source: TableSource::Name(name.into()),
            alias,
        }
    }

    pub(crate) fn query(select: Select, alias: Option<String>) -> Self {
        Self {
            source: TableSource::Query(Box::new(select)),
            alias,
        }
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let mut out = match &self.source {
            TableSource::Name(name) => Fragment::from_text(ctx.options.quote_table(name)),
            TableSource::Query(select) => {
                let inner = select.render(ctx.mode)?;
                Fragment {
                    text: format!("({})", inner.text),
                    values: inner.values,
                }
            }
        };
        if let Some(alias) = &self.alias {
            out.text.push(' ');
            out.text.push_str(&ctx.options.quote_alias(alias));
        }
        Ok(out)
    }
}

/// Comma-separated table list with an optional leading keyword (`FROM`, `INTO`).
#[derive(Debug, Clone)]
pub struct TableBlock {
    prefix: Option<&'static str>,
    tables: Vec<TableRef>,
    single: bool,
}

impl TableBlock {
    pub(crate) fn new(prefix: Option<&'static str>) -> Self {
        Self {
            prefix,
            tables: Vec::new(),
            single: false,
        }
    }

    /// A block that holds at most one table; adding another replaces it.
    pub(crate) fn single(prefix: Option<&'static str>) -> Self {
        Self {
            single: true,
            ..Self::new(prefix)
        }
    }

    pub(crate) fn push(&mut self, table: TableRef) {
        if self.single {
            self.tables.clear();
        }
        self.tables.push(table);
    }

    #[must_use]
    pub fn has_table(&self) -> bool {
        !self.tables.is_empty()
    }
}

impl ClauseRenderer for TableBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        if self.tables.is_empty() {
            return Ok(Fragment::default());
        }
        let mut list = Fragment::default();
        for table in &self.tables {
            list.append(table.render(ctx)?, ", ");
        }
        if let Some(prefix) = self.prefix {
            list.text = format!("{prefix} {}", list.text);
        }
        Ok(list)
    }
}

/// Raw function expressions rendered directly after `SELECT`, e.g. `NOW()`.
#[derive(Debug, Clone, Default)]
pub struct FunctionBlock {
    functions: Vec<Expression>,
}

impl FunctionBlock {
    pub(crate) fn push(&mut self, expr: Expression) {
        self.functions.push(expr);
    }
}

impl ClauseRenderer for FunctionBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let mut out = Fragment::default();
        for expr in &self.functions {
            out.append(expr.render(ctx)?, ", ");
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistinctBlock {
    distinct: bool,
}

impl DistinctBlock {
    pub(crate) fn activate(&mut self) {
        self.distinct = true;
    }
}

impl ClauseRenderer for DistinctBlock {
    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        Ok(if self.distinct {
            Fragment::from_text("DISTINCT")
        } else {
            Fragment::default()
        })
    }
}

#[derive(Debug, Clone)]
enum FieldSource {
    Name(String),
    Expr(Expression),
}

/// Selected fields. Renders `*` when empty and the statement has a source table.
#[derive(Debug, Clone, Default)]
pub struct FieldBlock {
    fields: Vec<(FieldSource, Option<String>)>,
}

impl FieldBlock {
    pub(crate) fn push_name(&mut self, name: impl Into<String>, alias: Option<String>) {
        self.fields.push((FieldSource::Name(name.into()), alias));
    }

    pub(crate) fn push_expr(&mut self, expr: Expression, alias: Option<String>) {
        self.fields.push((FieldSource::Expr(expr), alias));
    }
}

impl ClauseRenderer for FieldBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        if self.fields.is_empty() {
            return Ok(if ctx.has_source {
                Fragment::from_text("*")
            } else {
                Fragment::default()
            });
        }
        let mut out = Fragment::default();
        for (source, alias) in &self.fields {
            let mut field = match source {
                FieldSource::Name(name) => Fragment::from_text(ctx.options.quote_field(name)),
                FieldSource::Expr(expr) => expr.render(ctx)?,
            };
            if let Some(alias) = alias {
                field.text.push_str(" AS ");
                field.text.push_str(&ctx.options.quote_alias(alias));
            }
            out.append(field, ", ");
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    LeftOuter,
    RightOuter,
    Cross,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinBlock {
    joins: Vec<(JoinKind, TableRef, Option<Expression>)>,
}

impl JoinBlock {
    pub(crate) fn push(&mut self, kind: JoinKind, table: TableRef, on: Option<Expression>) {
        self.joins.push((kind, table, on));
    }
}

impl ClauseRenderer for JoinBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let mut out = Fragment::default();
        for (kind, table, on) in &self.joins {
            let mut join = Fragment::from_text(kind.keyword());
            join.append(table.render(ctx)?, " ");
            if let Some(on) = on {
                let cond = on.render(ctx)?;
                join.text.push_str(&format!(" ON ({})", cond.text));
                join.values.extend(cond.values);
            }
            out.append(join, &ctx.options.separator);
        }
        Ok(out)
    }
}

/// `WHERE` / `HAVING`: each condition parenthesised, joined with `AND`.
#[derive(Debug, Clone)]
pub struct ConditionBlock {
    keyword: &'static str,
    conditions: Vec<Expression>,
}

impl ConditionBlock {
    pub(crate) fn where_() -> Self {
        Self {
            keyword: "WHERE",
            conditions: Vec::new(),
        }
    }

    pub(crate) fn having() -> Self {
        Self {
            keyword: "HAVING",
            conditions: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, condition: Expression) {
        self.conditions.push(condition);
    }
}

impl ClauseRenderer for ConditionBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let mut out = Fragment::default();
        for condition in &self.conditions {
            let rendered = condition.render(ctx)?;
            if rendered.is_empty() {
                continue;
            }
            out.append(
                Fragment {
                    text: format!("({})", rendered.text),
                    values: rendered.values,
                },
                " AND ",
            );
        }
        if !out.is_empty() {
            out.text = format!("{} {}", self.keyword, out.text);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupByBlock {
    fields: Vec<String>,
}

impl GroupByBlock {
    pub(crate) fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }
}

impl ClauseRenderer for GroupByBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        if self.fields.is_empty() {
            return Ok(Fragment::default());
        }
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|f| ctx.options.quote_field(f))
            .collect();
        Ok(Fragment::from_text(format!("GROUP BY {}", fields.join(", "))))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct OrderByBlock {
    orders: Vec<(String, Option<SortOrder>)>,
}

impl OrderByBlock {
    pub(crate) fn push(&mut self, field: impl Into<String>, order: Option<SortOrder>) {
        self.orders.push((field.into(), order));
    }
}

impl ClauseRenderer for OrderByBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        if self.orders.is_empty() {
            return Ok(Fragment::default());
        }
        let parts: Vec<String> = self
            .orders
            .iter()
            .map(|(field, order)| {
                let field = ctx.options.quote_field(field);
                match order {
                    Some(SortOrder::Asc) => format!("{field} ASC"),
                    Some(SortOrder::Desc) => format!("{field} DESC"),
                    None => field,
                }
            })
            .collect();
        Ok(Fragment::from_text(format!("ORDER BY {}", parts.join(", "))))
    }
}

/// `LIMIT n` or `OFFSET n`.
#[derive(Debug, Clone)]
pub struct CountBlock {
    keyword: &'static str,
    count: Option<u64>,
}

impl CountBlock {
    pub(crate) fn limit() -> Self {
        Self {
            keyword: "LIMIT",
            count: None,
        }
    }

    pub(crate) fn offset() -> Self {
        Self {
            keyword: "OFFSET",
            count: None,
        }
    }

    pub(crate) fn set(&mut self, count: Option<u64>) {
        self.count = count;
    }
}

impl ClauseRenderer for CountBlock {
    fn render(&self, _ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        Ok(match self.count {
            Some(count) => Fragment::from_text(format!("{} {count}", self.keyword)),
            None => Fragment::default(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionKind {
    Distinct,
    All,
}

#[derive(Debug, Clone, Default)]
pub struct UnionBlock {
    unions: Vec<(UnionKind, Select)>,
}

impl UnionBlock {
    pub(crate) fn push(&mut self, kind: UnionKind, select: Select) {
        self.unions.push((kind, select));
    }
}

impl ClauseRenderer for UnionBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let mut out = Fragment::default();
        for (kind, select) in &self.unions {
            let inner = select.render(ctx.mode)?;
            let keyword = match kind {
                UnionKind::Distinct => "UNION",
                UnionKind::All => "UNION ALL",
            };
            out.append(
                Fragment {
                    text: format!("{keyword} ({})", inner.text),
                    values: inner.values,
                },
                &ctx.options.separator,
            );
        }
        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Assignment {
    Value(String, SqlParam),
    Raw(Expression),
}

impl Assignment {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        match self {
            Assignment::Value(field, value) => {
                let rendered = value.render(ctx)?;
                Ok(Fragment {
                    text: format!("{} = {}", ctx.options.quote_field(field), rendered.text),
                    values: rendered.values,
                })
            }
            Assignment::Raw(expr) => expr.render(ctx),
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            Assignment::Value(field, _) => Some(field),
            Assignment::Raw(_) => None,
        }
    }
}

/// `field = value` list with a leading keyword: `SET` for UPDATE,
/// `ON DUPLICATE KEY UPDATE` for INSERT.
#[derive(Debug, Clone)]
pub struct AssignmentBlock {
    keyword: &'static str,
    assignments: Vec<Assignment>,
}

impl AssignmentBlock {
    pub(crate) fn set() -> Self {
        Self {
            keyword: "SET",
            assignments: Vec::new(),
        }
    }

    pub(crate) fn on_duplicate_key_update() -> Self {
        Self {
            keyword: "ON DUPLICATE KEY UPDATE",
            assignments: Vec::new(),
        }
    }

    /// Assign `value` to `field`, replacing an earlier assignment of the same field.
    pub(crate) fn assign(&mut self, field: String, value: SqlParam) {
        if let Some(existing) = self
            .assignments
            .iter_mut()
            .find(|a| a.field() == Some(field.as_str()))
        {
            *existing = Assignment::Value(field, value);
        } else {
            self.assignments.push(Assignment::Value(field, value));
        }
    }

    pub(crate) fn push_raw(&mut self, expr: Expression) {
        self.assignments.push(Assignment::Raw(expr));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl ClauseRenderer for AssignmentBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        if self.assignments.is_empty() {
            return Ok(Fragment::default());
        }
        let mut out = Fragment::default();
        for assignment in &self.assignments {
            out.append(assignment.render(ctx)?, ", ");
        }
        out.text = format!("{} {}", self.keyword, out.text);
        Ok(out)
    }
}

/// `(fields) VALUES (...), (...)` for INSERT.
#[derive(Debug, Clone, Default)]
pub struct InsertValuesBlock {
    rows: Vec<Vec<(String, SqlParam)>>,
}

impl InsertValuesBlock {
    /// Set `field` in every row, creating the first row when there is none.
    pub(crate) fn set(&mut self, field: String, value: SqlParam) {
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        for row in &mut self.rows {
            if let Some(slot) = row.iter_mut().find(|(f, _)| *f == field) {
                slot.1 = value.clone();
            } else {
                row.push((field.clone(), value.clone()));
            }
        }
    }

    pub(crate) fn set_rows(&mut self, rows: Vec<Vec<(String, SqlParam)>>) {
        self.rows = rows;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    pub(crate) fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        let Some(first) = self.rows.first() else {
            return Ok(());
        };
        for row in &self.rows[1..] {
            let same = row.len() == first.len()
                && row.iter().zip(first).all(|((a, _), (b, _))| a == b);
            if !same {
                return Err(SqlMiddlewareDbError::BuildError(
                    "all rows of a multi-row insert must set the same fields in the same order"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl ClauseRenderer for InsertValuesBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let Some(first) = self.rows.first() else {
            return Ok(Fragment::default());
        };
        if first.is_empty() {
            return Ok(Fragment::default());
        }
        let fields: Vec<String> = first
            .iter()
            .map(|(f, _)| ctx.options.quote_field(f))
            .collect();
        let mut out = Fragment::from_text(format!("({}) VALUES ", fields.join(", ")));
        let mut tuples = Fragment::default();
        for row in &self.rows {
            let mut tuple = Fragment::default();
            for (_, value) in row {
                tuple.append(value.render(ctx)?, ", ");
            }
            tuple.text = format!("({})", tuple.text);
            tuples.append(tuple, ", ");
        }
        out.text.push_str(&tuples.text);
        out.values.extend(tuples.values);
        Ok(out)
    }
}

/// `(fields) (SELECT ...)` for `INSERT ... SELECT`.
#[derive(Debug, Clone, Default)]
pub struct InsertFromQueryBlock {
    source: Option<(Vec<String>, Select)>,
}

impl InsertFromQueryBlock {
    pub(crate) fn set(&mut self, fields: Vec<String>, select: Select) {
        self.source = Some((fields, select));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

impl ClauseRenderer for InsertFromQueryBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let Some((fields, select)) = &self.source else {
            return Ok(Fragment::default());
        };
        let fields: Vec<String> = fields.iter().map(|f| ctx.options.quote_field(f)).collect();
        let inner = select.render(ctx.mode)?;
        Ok(Fragment {
            text: format!("({}) ({})", fields.join(", "), inner.text),
            values: inner.values,
        })
    }
}

/// Tables named between `DELETE` and `FROM` in a multi-table delete.
#[derive(Debug, Clone, Default)]
pub struct TargetTableBlock {
    targets: Vec<String>,
}

impl TargetTableBlock {
    pub(crate) fn push(&mut self, table: impl Into<String>) {
        self.targets.push(table.into());
    }
}

impl ClauseRenderer for TargetTableBlock {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError> {
        let targets: Vec<String> = self
            .targets
            .iter()
            .map(|t| ctx.options.quote_table(t))
            .collect();
        Ok(Fragment::from_text(targets.join(", ")))
    }
}
