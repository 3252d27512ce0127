//! Row filters for the backend's REST query API.
//!
//! [`TableQuery`] renders to the query-string pairs the REST layer expects:
//! `select=*`, `column=eq.value`, `or=(a.ilike.*t*,b.ilike.*t*)`,
//! `order=column.desc` and `limit=n`.

use std::fmt::Display;

/// Sort direction of an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A read (or write target) against one backend table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    columns: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl TableQuery {
    /// Start a query selecting every column of `table`.
    #[must_use]
    pub fn from(table: &'static str) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Restrict the returned columns (comma-separated).
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        columns.clone_into(&mut self.columns);
        self
    }

    /// Keep rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Keep rows where any of `columns` contains `term`, case-insensitively.
    ///
    /// A blank term adds no filter.
    #[must_use]
    pub fn search_any(mut self, columns: &[&str], term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }

        let pattern = quote_value(&format!("*{term}*"));
        let clauses = columns
            .iter()
            .map(|column| format!("{column}.ilike.{pattern}"))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push(("or".to_string(), format!("({clauses})")));
        self
    }

    /// Append an ordering clause. Earlier clauses take precedence.
    #[must_use]
    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order.push(format!("{column}.{}", order.as_str()));
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Table this query targets.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Query-string pairs for a read.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        pairs.push(("select".to_string(), self.columns.clone()));
        pairs.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Query-string pairs for a write: filters only.
    #[must_use]
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        self.filters.clone()
    }
}

/// Double-quote a filter value when it contains characters the filter
/// grammar reserves.
fn quote_value(value: &str) -> String {
    if !value.contains([',', '(', ')', '"', '\\', ':']) {
        return value.to_string();
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
