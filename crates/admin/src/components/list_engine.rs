//! Client-side search, filter, sort and pagination over a fetched member list.
//!
//! One engine serves every member list in the console. A [`ListConfig`]
//! describes what a call site honors (which filters, which sort keys, the
//! page size) and [`ViewParams`] holds the operator's current choices.
//! [`run`] turns both plus the full collection into a [`ListPage`].
//!
//! Processing order is fixed: structural ID-card scope, ID-card filter,
//! status filter, search, stable sort, page clamp, slice.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use courtyard_core::{Member, MemberStatus};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Page sizes the members table offers.
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 25, 50, 100];

/// Column a member list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Status,
    CreatedAt,
    IdCardCreated,
}

impl SortKey {
    pub const ALL: &'static [Self] = &[
        Self::Name,
        Self::Status,
        Self::CreatedAt,
        Self::IdCardCreated,
    ];

    /// Order applied when the column is first selected.
    #[must_use]
    pub const fn default_order(self) -> SortOrder {
        match self {
            Self::Name | Self::Status => SortOrder::Asc,
            Self::CreatedAt | Self::IdCardCreated => SortOrder::Desc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
            Self::IdCardCreated => "id_card_created",
        }
    }

    fn compare(self, a: &Member, b: &Member) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.name, &b.name),
            Self::Status => locale_cmp(a.status.as_str(), b.status.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::IdCardCreated => a.id_card_created.cmp(&b.id_card_created),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Which members to keep by ID-card state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IdCardFilter {
    #[default]
    All,
    Created,
    NotCreated,
}

impl IdCardFilter {
    #[must_use]
    pub const fn matches(self, id_card_created: bool) -> bool {
        match self {
            Self::All => true,
            Self::Created => id_card_created,
            Self::NotCreated => !id_card_created,
        }
    }

    const fn label(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Created => Some("ID Card: Created"),
            Self::NotCreated => Some("ID Card: Not created"),
        }
    }
}

impl FromStr for IdCardFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "created" => Ok(Self::Created),
            "not_created" => Ok(Self::NotCreated),
            other => Err(format!("unknown ID card filter: {other}")),
        }
    }
}

/// What one call site of the engine honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListConfig {
    pub name: &'static str,
    /// Structural scope applied before anything else.
    pub scope: IdCardFilter,
    pub search: bool,
    pub status_filter: bool,
    pub id_card_filter: bool,
    pub sort_keys: &'static [SortKey],
    pub default_sort: SortKey,
    pub default_order: SortOrder,
    pub page_size: usize,
    pub page_size_options: &'static [usize],
}

/// The members directory table.
pub const MEMBERS_TABLE: ListConfig = ListConfig {
    name: "members",
    scope: IdCardFilter::All,
    search: true,
    status_filter: true,
    id_card_filter: true,
    sort_keys: SortKey::ALL,
    default_sort: SortKey::CreatedAt,
    default_order: SortOrder::Desc,
    page_size: 10,
    page_size_options: PAGE_SIZE_OPTIONS,
};

/// The ID-card studio grid: members with an issued card.
pub const ID_CARD_STUDIO: ListConfig = ListConfig {
    name: "id_card_studio",
    scope: IdCardFilter::Created,
    search: true,
    status_filter: true,
    id_card_filter: false,
    sort_keys: &[SortKey::Name, SortKey::CreatedAt],
    default_sort: SortKey::CreatedAt,
    default_order: SortOrder::Desc,
    page_size: 8,
    page_size_options: &[8],
};

/// The dashboard's recently added members.
pub const DASHBOARD_RECENT: ListConfig = ListConfig {
    name: "dashboard_recent",
    scope: IdCardFilter::All,
    search: false,
    status_filter: false,
    id_card_filter: false,
    sort_keys: &[SortKey::CreatedAt],
    default_sort: SortKey::CreatedAt,
    default_order: SortOrder::Desc,
    page_size: 5,
    page_size_options: &[5],
};

impl ListConfig {
    /// The sort actually applied for a requested key and order.
    #[must_use]
    pub fn effective_sort(&self, key: SortKey, order: SortOrder) -> (SortKey, SortOrder) {
        if self.sort_keys.contains(&key) {
            (key, order)
        } else {
            (self.default_sort, self.default_order)
        }
    }
}

/// The operator's current search, filters, sort and page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    search: String,
    status_filter: Option<MemberStatus>,
    id_card_filter: IdCardFilter,
    sort_key: SortKey,
    sort_order: SortOrder,
    page: usize,
    page_size: usize,
}

impl ViewParams {
    /// Defaults for `config`: no search or filters, default sort, page 1.
    #[must_use]
    pub const fn new(config: &ListConfig) -> Self {
        Self {
            search: String::new(),
            status_filter: None,
            id_card_filter: IdCardFilter::All,
            sort_key: config.default_sort,
            sort_order: config.default_order,
            page: 1,
            page_size: config.page_size,
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn status_filter(&self) -> Option<MemberStatus> {
        self.status_filter
    }

    #[must_use]
    pub const fn id_card_filter(&self) -> IdCardFilter {
        self.id_card_filter
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Requested page; the engine clamps it.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub const fn set_status_filter(&mut self, status: Option<MemberStatus>) {
        self.status_filter = status;
        self.page = 1;
    }

    pub const fn set_id_card_filter(&mut self, filter: IdCardFilter) {
        self.id_card_filter = filter;
        self.page = 1;
    }

    /// Column-header click: flip the active column, or select another
    /// column with its default order.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_key = key;
            self.sort_order = key.default_order();
        }
        self.page = 1;
    }

    pub const fn set_sort(&mut self, key: SortKey, order: SortOrder) {
        self.sort_key = key;
        self.sort_order = order;
        self.page = 1;
    }

    /// Go to a page. Zero is treated as the first page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size, keeping the current page when it still exists
    /// for `total_count` matching items.
    pub fn set_page_size(&mut self, page_size: usize, total_count: usize) {
        self.page_size = page_size.max(1);
        self.page = self.page.min(total_pages(total_count, self.page_size));
    }

    /// Reset the status and ID-card filters.
    pub const fn clear_filters(&mut self) {
        self.status_filter = None;
        self.id_card_filter = IdCardFilter::All;
        self.page = 1;
    }

    #[must_use]
    pub const fn has_active_filters(&self) -> bool {
        self.status_filter.is_some() || !matches!(self.id_card_filter, IdCardFilter::All)
    }

    /// `"Status: Active, ID Card: Created"`, or `None` without filters.
    #[must_use]
    pub fn filter_label(&self) -> Option<String> {
        let status = self.status_filter.map(|s| format!("Status: {s}"));
        let parts: Vec<String> = status
            .into_iter()
            .chain(self.id_card_filter.label().map(str::to_string))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// One page of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage {
    pub items: Vec<Member>,
    pub total_count: usize,
    pub total_pages: usize,
    /// Clamped 1-based page actually shown.
    pub current_page: usize,
    /// 1-based index of the first shown item; 0 when empty.
    pub window_start: usize,
    /// 1-based index of the last shown item; 0 when empty.
    pub window_end: usize,
}

impl ListPage {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl fmt::Display for ListPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {}–{} of {}",
            self.window_start, self.window_end, self.total_count
        )
    }
}

/// `max(1, ceil(total / page_size))`.
#[must_use]
pub const fn total_pages(total_count: usize, page_size: usize) -> usize {
    let pages = total_count.div_ceil(if page_size == 0 { 1 } else { page_size });
    if pages == 0 { 1 } else { pages }
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Dictionary-style string order.
///
/// Letters compare without accents or case first (`"Élodie"` sorts between
/// `"adam"` and `"eric"`). Ties are broken by accents, unaccented first,
/// then by case, lowercase first.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            let lower_a = a.nfc().flat_map(char::to_lowercase);
            let lower_b = b.nfc().flat_map(char::to_lowercase);
            lower_a.cmp(lower_b)
        })
        .then_with(|| b.nfc().cmp(a.nfc()))
}

/// Whether `member` matches an already trimmed, lowercased search term.
fn matches_search(member: &Member, needle: &str) -> bool {
    [&member.name, &member.email, &member.member_id]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Every item that passes the filters, in display order.
#[must_use]
pub fn filter_and_sort<'a>(
    config: &ListConfig,
    items: &'a [Member],
    params: &ViewParams,
) -> Vec<&'a Member> {
    let id_card = if config.id_card_filter {
        params.id_card_filter
    } else {
        IdCardFilter::All
    };
    let status = params.status_filter.filter(|_| config.status_filter);
    let needle = if config.search {
        params.search.trim().to_lowercase()
    } else {
        String::new()
    };

    let mut visible: Vec<&Member> = items
        .iter()
        .filter(|m| config.scope.matches(m.id_card_created))
        .filter(|m| id_card.matches(m.id_card_created))
        .filter(|m| status.is_none_or(|s| m.status == s))
        .filter(|m| needle.is_empty() || matches_search(m, &needle))
        .collect();

    let (key, order) = config.effective_sort(params.sort_key, params.sort_order);
    visible.sort_by(|a, b| {
        let ordering = key.compare(a, b);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    visible
}

/// Slice an already filtered and sorted list.
#[must_use]
pub fn paginate(sorted: &[&Member], page: usize, page_size: usize) -> ListPage {
    let page_size = page_size.max(1);
    let total_count = sorted.len();
    let total_pages = total_pages(total_count, page_size);
    let current_page = page.clamp(1, total_pages);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total_count);
    let items: Vec<Member> = sorted
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|m| (*m).clone())
        .collect();

    let (window_start, window_end) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    ListPage {
        items,
        total_count,
        total_pages,
        current_page,
        window_start,
        window_end,
    }
}

/// Run the full pipeline for one call site.
#[must_use]
pub fn run(config: &ListConfig, items: &[Member], params: &ViewParams) -> ListPage {
    let sorted = filter_and_sort(config, items, params);
    paginate(&sorted, params.page, params.page_size)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use courtyard_core::{MemberId, MemberType};

    use super::*;

    fn member(n: i64, name: &str) -> Member {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::days(n);
        Member {
            id: MemberId::random(),
            member_id: format!("M-{n:04}"),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            phone_country_code: None,
            date_of_birth: None,
            occupation: None,
            unit: format!("{n}A"),
            building: "Tower A".to_string(),
            residential_address: None,
            mailing_address: None,
            member_type: MemberType::Owner,
            status: if n % 3 == 0 {
                MemberStatus::Inactive
            } else {
                MemberStatus::Active
            },
            id_card_created: n % 2 == 0,
            move_in_date: None,
            move_out_date: None,
            emergency_contact_name: None,
            emergency_contact_relationship: None,
            emergency_contact_phone: None,
            emergency_contact_email: None,
            last_access: None,
            last_access_location: None,
            avatar_url: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn members(count: i64) -> Vec<Member> {
        (1..=count).map(|n| member(n, &format!("Resident {n}"))).collect()
    }

    fn names(page: &ListPage) -> Vec<&str> {
        page.items.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_pages_concatenate_to_the_filtered_set() {
        let items = members(47);
        for page_size in [1, 3, 10, 25, 47, 100] {
            let mut params = ViewParams::new(&MEMBERS_TABLE);
            params.set_search("resident 1");
            params.set_page_size(page_size, 0);

            let expected: Vec<MemberId> = filter_and_sort(&MEMBERS_TABLE, &items, &params)
                .iter()
                .map(|m| m.id)
                .collect();

            let first = run(&MEMBERS_TABLE, &items, &params);
            let mut seen = Vec::new();
            for page in 1..=first.total_pages {
                params.set_page(page);
                let out = run(&MEMBERS_TABLE, &items, &params);
                assert!(out.items.len() <= page_size);
                seen.extend(out.items.iter().map(|m| m.id));
            }
            assert_eq!(seen, expected, "page size {page_size}");
        }
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut items = members(12);
        // Equal sort keys must keep their input order every time.
        for m in &mut items {
            m.created_at = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        }
        let params = ViewParams::new(&MEMBERS_TABLE);
        let first = run(&MEMBERS_TABLE, &items, &params);
        let second = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(first, second);
        assert_eq!(first.items[0].name, "Resident 1");
    }

    #[test]
    fn test_name_sort_is_case_insensitive() {
        let items = vec![member(1, "Bob"), member(2, "alice"), member(3, "Carol")];
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.toggle_sort(SortKey::Name);

        let page = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(names(&page), vec!["alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let items = vec![
            member(1, "Zoe"),
            member(2, "Émile"),
            member(3, "adam"),
            member(4, "Élodie"),
            member(5, "eric"),
        ];
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.toggle_sort(SortKey::Name);

        let page = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(names(&page), vec!["adam", "Élodie", "Émile", "eric", "Zoe"]);
    }

    #[test]
    fn test_accents_then_case_break_ties() {
        assert_eq!(locale_cmp("Elodie", "Élodie"), Ordering::Less);
        assert_eq!(locale_cmp("élodie", "Elodie"), Ordering::Greater);
        assert_eq!(locale_cmp("élodie", "Élodie"), Ordering::Less);
        // Precomposed and decomposed forms are the same name
        assert_eq!(locale_cmp("\u{e9}mile", "e\u{301}mile"), Ordering::Equal);
    }

    #[test]
    fn test_case_only_breaks_ties() {
        assert_eq!(locale_cmp("alice", "Alice"), Ordering::Less);
        assert_eq!(locale_cmp("Alice", "bob"), Ordering::Less);
        assert_eq!(locale_cmp("Zoe", "zoe"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_search_change_resets_page() {
        let items = members(30);
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.set_page(3);
        assert_eq!(run(&MEMBERS_TABLE, &items, &params).current_page, 3);

        params.set_search("Resident 3");
        assert_eq!(params.page(), 1);
        let page = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        // "Resident 3" and "Resident 30"
        assert_eq!(page.total_count, 2);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_stale_page_is_clamped_not_empty() {
        let items = members(5);
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.set_page(9);
        let page = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_last_partial_page_window() {
        let items = members(23);
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.set_page(3);

        let page = run(&MEMBERS_TABLE, &items, &params);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.window_start, 21);
        assert_eq!(page.window_end, 23);
        assert_eq!(page.to_string(), "Showing 21–23 of 23");
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_items() {
        let params = ViewParams::new(&MEMBERS_TABLE);
        let page = run(&MEMBERS_TABLE, &[], &params);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_count, 0);
        assert_eq!((page.window_start, page.window_end), (0, 0));
        assert!(page.is_empty());
    }

    #[test]
    fn test_studio_scope_excludes_members_without_card() {
        let mut without_card = member(1, "Zed Without Card");
        without_card.id_card_created = false;
        let mut with_card = member(2, "Zed With Card");
        with_card.id_card_created = true;
        let items = vec![without_card.clone(), with_card];

        for (search, key) in [
            ("", SortKey::Name),
            ("zed", SortKey::CreatedAt),
            ("without", SortKey::Status),
        ] {
            let mut params = ViewParams::new(&ID_CARD_STUDIO);
            params.set_search(search);
            params.toggle_sort(key);
            // The operator's ID-card filter is not honored in the studio.
            params.set_id_card_filter(IdCardFilter::NotCreated);

            let page = run(&ID_CARD_STUDIO, &items, &params);
            assert!(page.items.iter().all(|m| m.id != without_card.id));
        }
    }

    #[test]
    fn test_disallowed_sort_key_falls_back_to_default() {
        let items = members(4);
        let mut params = ViewParams::new(&ID_CARD_STUDIO);
        params.set_sort(SortKey::IdCardCreated, SortOrder::Asc);
        assert_eq!(
            ID_CARD_STUDIO.effective_sort(params.sort_key(), params.sort_order()),
            (SortKey::CreatedAt, SortOrder::Desc)
        );
        let page = run(&ID_CARD_STUDIO, &items, &params);
        assert_eq!(names(&page), vec!["Resident 4", "Resident 2"]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        assert_eq!(
            (params.sort_key(), params.sort_order()),
            (SortKey::CreatedAt, SortOrder::Desc)
        );

        params.set_page(4);
        params.toggle_sort(SortKey::Name);
        assert_eq!((params.sort_key(), params.sort_order()), (SortKey::Name, SortOrder::Asc));
        assert_eq!(params.page(), 1);

        params.toggle_sort(SortKey::Name);
        assert_eq!((params.sort_key(), params.sort_order()), (SortKey::Name, SortOrder::Desc));

        params.toggle_sort(SortKey::IdCardCreated);
        assert_eq!(
            (params.sort_key(), params.sort_order()),
            (SortKey::IdCardCreated, SortOrder::Desc)
        );
    }

    #[test]
    fn test_page_size_change_reclamps_instead_of_resetting() {
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        params.set_page(3);
        params.set_page_size(25, 60);
        assert_eq!(params.page(), 3);

        params.set_page_size(50, 60);
        assert_eq!(params.page(), 2);
    }

    #[test]
    fn test_filters_and_label() {
        let items = members(12);
        let mut params = ViewParams::new(&MEMBERS_TABLE);
        assert!(!params.has_active_filters());
        assert_eq!(params.filter_label(), None);

        params.set_status_filter(Some(MemberStatus::Active));
        params.set_id_card_filter(IdCardFilter::Created);
        assert_eq!(
            params.filter_label().as_deref(),
            Some("Status: Active, ID Card: Created")
        );

        let page = run(&MEMBERS_TABLE, &items, &params);
        assert!(
            page.items
                .iter()
                .all(|m| m.status == MemberStatus::Active && m.id_card_created)
        );
        // Even and not a multiple of three: 2, 4, 8, 10
        assert_eq!(page.total_count, 4);

        params.clear_filters();
        assert!(!params.has_active_filters());
        assert_eq!(run(&MEMBERS_TABLE, &items, &params).total_count, 12);
    }

    #[test]
    fn test_search_matches_email_and_member_number() {
        let items = members(12);
        let mut params = ViewParams::new(&MEMBERS_TABLE);

        params.set_search("  M-0007 ");
        assert_eq!(names(&run(&MEMBERS_TABLE, &items, &params)), vec!["Resident 7"]);

        params.set_search("RESIDENT.11@");
        assert_eq!(names(&run(&MEMBERS_TABLE, &items, &params)), vec!["Resident 11"]);

        params.set_search("   ");
        assert_eq!(run(&MEMBERS_TABLE, &items, &params).total_count, 12);
    }

    #[test]
    fn test_dashboard_recent_ignores_filters() {
        let items = members(9);
        let mut params = ViewParams::new(&DASHBOARD_RECENT);
        params.set_search("nobody");
        params.set_status_filter(Some(MemberStatus::Inactive));

        let page = run(&DASHBOARD_RECENT, &items, &params);
        assert_eq!(page.total_count, 9);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].name, "Resident 9");
    }

    #[test]
    fn test_parse_view_params_text() {
        assert_eq!("created_at".parse::<SortKey>().unwrap(), SortKey::CreatedAt);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!(
            "not_created".parse::<IdCardFilter>().unwrap(),
            IdCardFilter::NotCreated
        );
        assert!("age".parse::<SortKey>().is_err());
    }
}
