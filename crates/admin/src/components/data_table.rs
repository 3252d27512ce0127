//! Data table component types.
//!
//! These types describe how each member list is presented: its columns,
//! filter controls, search placeholder and empty state. The behavior behind
//! them lives in [`list_engine`](super::list_engine).

use serde::Serialize;

use super::list_engine::{DASHBOARD_RECENT, ID_CARD_STUDIO, ListConfig, MEMBERS_TABLE, SortKey};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Sort key behind the header, when the column is sortable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<&'static str>,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: SortKey, label: &str) -> Self {
        Self {
            key: key.as_str().to_string(),
            label: label.to_string(),
            sort_key: Some(key.as_str()),
            default_visible: true,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sort_key: None,
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Text input filter.
    Text,
    /// Single-select dropdown.
    Select,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct TableFilter {
    /// Filter parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Available options (for selects). The empty value means "All".
    pub options: Vec<FilterOption>,
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            options,
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Search placeholder text; `None` when the list has no search box.
    pub search_placeholder: Option<String>,
    /// Page sizes offered to the operator.
    pub page_size_options: Vec<usize>,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
    /// Whether to show filter panel.
    pub has_filters: bool,
}

impl DataTableConfig {
    /// Create a new data table configuration for a list call site.
    #[must_use]
    pub fn new(list: &ListConfig) -> Self {
        Self {
            table_id: list.name.to_string(),
            columns: vec![],
            filters: vec![],
            search_placeholder: list.search.then(|| "Search...".to_string()),
            page_size_options: list.page_size_options.to_vec(),
            empty_title: "No members found".to_string(),
            empty_description: None,
            has_filters: false,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.has_filters = true;
        self.filters.push(filter);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = Some(placeholder.to_string());
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Get default visible columns.
    #[must_use]
    pub fn default_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.default_visible)
            .map(|c| c.key.clone())
            .collect()
    }
}

fn status_filter() -> TableFilter {
    TableFilter::select(
        "status",
        "Status",
        vec![
            FilterOption::new("", "Status: All"),
            FilterOption::new("Active", "Active"),
            FilterOption::new("Inactive", "Inactive"),
        ],
    )
}

/// Build the members directory table configuration.
#[must_use]
pub fn members_table_config() -> DataTableConfig {
    DataTableConfig::new(&MEMBERS_TABLE)
        .column(TableColumn::sortable(SortKey::Name, "Member"))
        .column(TableColumn::new("member_id", "Member ID"))
        .column(TableColumn::new("unit", "Unit"))
        .column(TableColumn::new("phone", "Phone").visible(false))
        .column(TableColumn::sortable(SortKey::Status, "Status"))
        .column(TableColumn::sortable(SortKey::CreatedAt, "Joined"))
        .column(TableColumn::sortable(SortKey::IdCardCreated, "ID Card"))
        .filter(status_filter())
        .filter(TableFilter::select(
            "id_card",
            "ID Card",
            vec![
                FilterOption::new("", "ID Card: All"),
                FilterOption::new("created", "ID Card: Created only"),
                FilterOption::new("not_created", "ID Card: Not created only"),
            ],
        ))
        .search_placeholder("Search by name, email or member ID...")
        .empty_state(
            "No members found",
            Some("Try adjusting your search or filters"),
        )
}

/// Build the ID-card studio grid configuration.
#[must_use]
pub fn id_card_studio_config() -> DataTableConfig {
    DataTableConfig::new(&ID_CARD_STUDIO)
        .column(TableColumn::sortable(SortKey::Name, "Member"))
        .column(TableColumn::new("unit", "Unit"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::sortable(SortKey::CreatedAt, "Joined").visible(false))
        .filter(status_filter())
        .search_placeholder("Search by name, email or member ID...")
        .empty_state(
            "No ID cards yet",
            Some("No members with an ID card match your search or filters."),
        )
}

/// Build the dashboard recent-members list configuration.
#[must_use]
pub fn recent_members_config() -> DataTableConfig {
    DataTableConfig::new(&DASHBOARD_RECENT)
        .column(TableColumn::new("name", "Member"))
        .column(TableColumn::new("unit", "Unit"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("created_at", "Joined"))
        .empty_state("No members yet", None)
}
