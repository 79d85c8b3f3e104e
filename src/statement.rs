//! MySQL-flavoured statement builder.
//!
//! Every statement is an ordered, fixed list of clause blocks. Each block implements
//! [`ClauseRenderer`] and contributes a text fragment plus the values it binds;
//! the statement joins the non-empty fragments with the configured separator.
//!
//! ```rust
//! use mysql_middleware::prelude::*;
//!
//! let sql = Select::new(StatementOptions::default())
//!     .from("users")
//!     .where_clause("id = ?", 1)
//!     .for_update()
//!     .to_sql()
//!     .unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE (id = 1) FOR UPDATE");
//! ```

pub mod blocks;
pub mod clauses;
mod delete;
mod insert;
pub mod lock;
mod options;
mod param;
mod select;
mod update;

pub use clauses::{
    Assignable, DeleteQuery, Filterable, FromTables, InsertQuery, Joinable, Limitable,
    SelectQuery, Sortable, UpdateQuery,
};
pub use delete::Delete;
pub use insert::Insert;
pub use lock::ForUpdateBlock;
pub use options::StatementOptions;
pub use param::{Expression, IntoParams, SqlParam};
pub use select::Select;
pub use update::Update;

use crate::error::SqlMiddlewareDbError;
use crate::types::RowValues;

/// Rendered SQL text plus the values bound by its placeholders (empty when inlined).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub values: Vec<RowValues>,
}

impl Fragment {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append `other` after `sep`, skipping empty fragments.
    pub(crate) fn append(&mut self, other: Fragment, sep: &str) {
        if other.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push_str(sep);
        }
        self.text.push_str(&other.text);
        self.values.extend(other.values);
    }
}

/// How parameters are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Values are formatted into the text as escaped literals.
    Inline,
    /// Values become `?` placeholders and are returned alongside the text.
    Parameterized,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub options: &'a StatementOptions,
    pub mode: RenderMode,
    /// Whether the statement has a source table; SELECT renders `*` fields only then.
    pub has_source: bool,
}

/// One renderable clause of a statement.
pub trait ClauseRenderer {
    /// Render this clause. An empty fragment contributes nothing to the statement.
    ///
    /// # Errors
    /// Returns `BuildError` when a nested expression cannot be rendered.
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Fragment, SqlMiddlewareDbError>;
}

/// A complete statement built from a closed list of clause blocks.
pub trait Statement {
    fn options(&self) -> &StatementOptions;

    /// The clause blocks in render order.
    fn blocks(&self) -> Vec<&dyn ClauseRenderer>;

    /// Grammar checks run before rendering.
    ///
    /// # Errors
    /// Returns `BuildError` describing the missing clause.
    fn validate(&self) -> Result<(), SqlMiddlewareDbError> {
        Ok(())
    }

    fn has_source(&self) -> bool {
        false
    }

    /// Render every block in order.
    ///
    /// # Errors
    /// Returns `BuildError` if validation or any block fails.
    fn render(&self, mode: RenderMode) -> Result<Fragment, SqlMiddlewareDbError> {
        self.validate()?;
        let options = self.options();
        let ctx = RenderContext {
            options,
            mode,
            has_source: self.has_source(),
        };
        let mut out = Fragment::default();
        for block in self.blocks() {
            out.append(block.render(&ctx)?, &options.separator);
        }
        Ok(out)
    }

    /// SQL text with every value inlined as an escaped literal.
    ///
    /// # Errors
    /// Returns `BuildError` if the statement is incomplete.
    fn to_sql(&self) -> Result<String, SqlMiddlewareDbError> {
        Ok(self.render(RenderMode::Inline)?.text)
    }

    /// SQL text with `?` placeholders and the ordered values they bind.
    ///
    /// # Errors
    /// Returns `BuildError` if the statement is incomplete.
    fn to_param(&self) -> Result<(String, Vec<RowValues>), SqlMiddlewareDbError> {
        let fragment = self.render(RenderMode::Parameterized)?;
        Ok((fragment.text, fragment.values))
    }
}
