//! Member list components: the engine and the table descriptors over it.

pub mod data_table;
pub mod list_engine;

pub use list_engine::{
    DASHBOARD_RECENT, ID_CARD_STUDIO, IdCardFilter, ListConfig, ListPage, MEMBERS_TABLE,
    SortKey, SortOrder, ViewParams,
};
