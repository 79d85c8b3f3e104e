use serde::Deserialize;

/// Rendering options for a statement.
///
/// Every field has a default, so a partial override (in code through the `with_*`
/// setters, or deserialized from a config map) keeps the defaults for the keys it
/// does not mention:
///
/// ```rust
/// use mysql_middleware::prelude::*;
///
/// let opts: StatementOptions =
///     serde_json::from_str(r#"{ "auto_quote_field_names": true }"#).unwrap();
/// assert!(opts.replace_single_quotes);
/// assert!(opts.auto_quote_field_names);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatementOptions {
    /// Replace `'` inside inlined string literals.
    pub replace_single_quotes: bool,
    /// Text substituted for each `'` when `replace_single_quotes` is on.
    pub single_quote_replacement: String,
    pub auto_quote_table_names: bool,
    pub auto_quote_field_names: bool,
    pub auto_quote_alias_names: bool,
    pub name_quote_character: char,
    /// Text placed between rendered clause blocks.
    pub separator: String,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self {
            replace_single_quotes: true,
            single_quote_replacement: "\\'".to_string(),
            auto_quote_table_names: false,
            auto_quote_field_names: false,
            auto_quote_alias_names: true,
            name_quote_character: '`',
            separator: " ".to_string(),
        }
    }
}

impl StatementOptions {
    #[must_use]
    pub fn with_replace_single_quotes(mut self, replace: bool) -> Self {
        self.replace_single_quotes = replace;
        self
    }

    #[must_use]
    pub fn with_single_quote_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.single_quote_replacement = replacement.into();
        self
    }

    #[must_use]
    pub fn with_auto_quote_table_names(mut self, quote: bool) -> Self {
        self.auto_quote_table_names = quote;
        self
    }

    #[must_use]
    pub fn with_auto_quote_field_names(mut self, quote: bool) -> Self {
        self.auto_quote_field_names = quote;
        self
    }

    #[must_use]
    pub fn with_auto_quote_alias_names(mut self, quote: bool) -> Self {
        self.auto_quote_alias_names = quote;
        self
    }

    #[must_use]
    pub fn with_name_quote_character(mut self, quote: char) -> Self {
        self.name_quote_character = quote;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Escape a string for inclusion between single quotes.
    ///
    /// With a backslash-based replacement (the default `\'`), backslashes are
    /// doubled first so a trailing `\` in the input cannot swallow the closing quote.
    pub(crate) fn escape_string(&self, value: &str) -> String {
        if !self.replace_single_quotes {
            return value.to_string();
        }
        let escaped = if self.single_quote_replacement.starts_with('\\') {
            value.replace('\\', "\\\\")
        } else {
            value.to_string()
        };
        escaped.replace('\'', &self.single_quote_replacement)
    }

    pub(crate) fn quote_table(&self, name: &str) -> String {
        self.quote_path(name, self.auto_quote_table_names)
    }

    pub(crate) fn quote_field(&self, name: &str) -> String {
        self.quote_path(name, self.auto_quote_field_names)
    }

    pub(crate) fn quote_alias(&self, alias: &str) -> String {
        if self.auto_quote_alias_names {
            self.wrap(alias)
        } else {
            alias.to_string()
        }
    }

    fn quote_path(&self, name: &str, enabled: bool) -> String {
        if !enabled {
            return name.to_string();
        }
        name.split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.wrap(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn wrap(&self, part: &str) -> String {
        let q = self.name_quote_character;
        if part.len() >= 2 && part.starts_with(q) && part.ends_with(q) {
            return part.to_string();
        }
        format!("{q}{part}{q}")
    }
}
