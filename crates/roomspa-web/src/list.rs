//! Shared list page machinery: load state, query inputs, filtering, paging

use roomspa_core::types::PaginationMeta;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a view's data currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch succeeded
    Loaded(T),
    /// The latest fetch failed with a user-facing message
    Failed(String),
}

/// Handle for one fetch; only the newest ticket may resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Load state guarded by generations so superseded fetches are dropped
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    state: LoadState<T>,
    generation: u64,
    mounted: bool,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            generation: 0,
            mounted: true,
        }
    }
}

impl<T> Loadable<T> {
    /// Fresh, mounted, idle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = LoadState::Loading;
        Ticket(self.generation)
    }

    /// Apply a result if `ticket` is still the latest and the view is mounted
    ///
    /// Returns whether the result was applied.
    pub fn resolve(&mut self, ticket: Ticket, result: roomspa_core::Result<T>) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                latest = self.generation,
                mounted = self.mounted,
                "Discarding stale fetch result"
            );
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, showing degraded view");
                LoadState::Failed(e.user_message())
            }
        };
        true
    }

    /// Mark the view as gone; later results are discarded
    pub const fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Take the state out
    #[must_use]
    pub fn into_state(self) -> LoadState<T> {
        self.state
    }

    /// Loaded value, if any
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Run one fetch through a fresh [`Loadable`]
pub async fn load<T, F>(fetch: F) -> LoadState<T>
where
    F: Future<Output = roomspa_core::Result<T>>,
{
    let mut loadable = Loadable::new();
    let ticket = loadable.begin();
    let result = fetch.await;
    loadable.resolve(ticket, result);
    loadable.into_state()
}

/// List inputs carried in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Requested page; junk and values below one become page one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Search text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    /// Status or filter value
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// Flash notice after a redirect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Flash error after a redirect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListQuery {
    /// 1-based page, clamped
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Flash notice and error, for [`crate::shell::Shell::with_flash`]
    #[must_use]
    pub const fn flash(&self) -> (Option<&String>, Option<&String>) {
        (self.notice.as_ref(), self.error.as_ref())
    }

    /// Status filter, `all` when unset
    #[must_use]
    pub fn status_or_all(&self) -> &str {
        let status = self.status.trim();
        if status.is_empty() { "all" } else { status }
    }

    /// Query string for `page`, keeping search and status
    #[must_use]
    pub fn href(&self, base: &str, page: u32) -> String {
        let query = Self {
            page: Some(page.to_string()),
            search: self.search.clone(),
            status: self.status.clone(),
            notice: None,
            error: None,
        };
        match serde_urlencoded::to_string(&query) {
            Ok(qs) if !qs.is_empty() => format!("{base}?{qs}"),
            _ => base.to_string(),
        }
    }
}

/// Extracts one searchable field from a record
pub type Projection<T> = fn(&T) -> String;

/// Case-insensitive substring filter across the given projections
///
/// Pure: the input is left untouched and an empty query returns every item.
#[must_use]
pub fn filter_items<T: Clone>(items: &[T], query: &str, projections: &[Projection<T>]) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            projections
                .iter()
                .any(|project| project(item).to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Previous/next controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNav {
    /// Current page, 1-based
    pub current_page: u64,
    /// Total pages, at least one
    pub total_pages: u64,
    /// Link to the previous page when there is one
    pub prev_href: Option<String>,
    /// Link to the next page when there is one
    pub next_href: Option<String>,
}

impl PageNav {
    /// Build controls from backend metadata, defaulting to a single page
    #[must_use]
    pub fn new(meta: &PaginationMeta, query: &ListQuery, base: &str) -> Self {
        let total_pages = meta.pages();
        let current_page = meta
            .current_page
            .unwrap_or_else(|| u64::from(query.page()))
            .clamp(1, total_pages);
        let link = |page: u64| query.href(base, u32::try_from(page).unwrap_or(u32::MAX));

        Self {
            current_page,
            total_pages,
            prev_href: (current_page > 1).then(|| link(current_page - 1)),
            next_href: (current_page < total_pages).then(|| link(current_page + 1)),
        }
    }

    /// Single page, no links
    #[must_use]
    pub const fn single() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            prev_href: None,
            next_href: None,
        }
    }

    /// Previous control enabled
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.prev_href.is_some()
    }

    /// Next control enabled
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next_href.is_some()
    }

    /// Whether to render the controls at all
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

/// What a list page renders
#[derive(Debug, Clone)]
pub struct ListView<T> {
    /// Rows after client-side filtering
    pub items: Vec<T>,
    /// Rows the backend returned for this page
    pub loaded: usize,
    /// Paging controls
    pub nav: PageNav,
    /// Failure message; the page shows the error state
    pub error: Option<String>,
    /// Empty-state text, e.g. "No users found"
    pub empty_label: &'static str,
}

impl<T: Clone> ListView<T> {
    /// Assemble a view from a load result
    ///
    /// `split` pulls the rows and pagination metadata out of the payload.
    pub fn build<P>(
        state: LoadState<P>,
        split: impl FnOnce(P) -> (Vec<T>, PaginationMeta),
        query: &ListQuery,
        base: &str,
        projections: &[Projection<T>],
        empty_label: &'static str,
    ) -> Self {
        match state {
            LoadState::Loaded(payload) => {
                let (rows, meta) = split(payload);
                Self {
                    items: filter_items(&rows, &query.search, projections),
                    loaded: rows.len(),
                    nav: PageNav::new(&meta, query, base),
                    error: None,
                    empty_label,
                }
            }
            LoadState::Failed(message) => Self::failed(message, empty_label),
            LoadState::Idle | LoadState::Loading => Self::failed(String::new(), empty_label),
        }
    }

    /// Error state
    #[must_use]
    pub const fn failed(message: String, empty_label: &'static str) -> Self {
        Self {
            items: Vec::new(),
            loaded: 0,
            nav: PageNav::single(),
            error: Some(message),
            empty_label,
        }
    }

    /// Nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map rows into display rows, keeping everything else
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListView<U> {
        ListView {
            items: self.items.into_iter().map(f).collect(),
            loaded: self.loaded,
            nav: self.nav,
            error: self.error,
            empty_label: self.empty_label,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use roomspa_core::Error;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        email: String,
    }

    fn row(name: &str, email: &str) -> Row {
        Row {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    const FIELDS: [Projection<Row>; 2] = [|r| r.name.clone(), |r| r.email.clone()];

    #[test]
    fn test_latest_ticket_wins() {
        let mut loadable: Loadable<u32> = Loadable::new();
        let first = loadable.begin();
        let second = loadable.begin();

        assert!(loadable.resolve(second, Ok(2)));
        assert!(!loadable.resolve(first, Ok(1)));
        assert_eq!(loadable.value(), Some(&2));
    }

    #[test]
    fn test_unmounted_view_ignores_results() {
        let mut loadable: Loadable<u32> = Loadable::new();
        let ticket = loadable.begin();
        loadable.unmount();

        assert!(!loadable.resolve(ticket, Ok(1)));
        assert_eq!(loadable.state(), &LoadState::Loading);
    }

    #[test]
    fn test_failure_carries_user_message() {
        let mut loadable: Loadable<u32> = Loadable::new();
        let ticket = loadable.begin();
        loadable.resolve(ticket, Err(Error::rejected(Some("unavailable".to_string()))));

        assert_eq!(
            loadable.into_state(),
            LoadState::Failed("unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_helper() {
        let state = load(async { Ok::<_, Error>(5) }).await;
        assert_eq!(state, LoadState::Loaded(5));
    }

    #[test]
    fn test_page_is_clamped() {
        let mut query = ListQuery::default();
        assert_eq!(query.page(), 1);
        query.page = Some("0".to_string());
        assert_eq!(query.page(), 1);
        query.page = Some("abc".to_string());
        assert_eq!(query.page(), 1);
        query.page = Some("7".to_string());
        assert_eq!(query.page(), 7);
    }

    #[test]
    fn test_filter_matches_any_projection_case_insensitively() {
        let rows = vec![row("Ada Lovelace", "ada@x.io"), row("Alan Turing", "alan@x.io")];

        assert_eq!(filter_items(&rows, "LOVE", &FIELDS), vec![rows[0].clone()]);
        assert_eq!(filter_items(&rows, "alan@", &FIELDS), vec![rows[1].clone()]);
        assert_eq!(filter_items(&rows, "  ", &FIELDS), rows);
        assert!(filter_items(&rows, "grace", &FIELDS).is_empty());
    }

    #[test]
    fn test_page_nav_boundaries() {
        let query = ListQuery {
            search: "spa day".to_string(),
            status: "pending".to_string(),
            ..ListQuery::default()
        };
        let meta = PaginationMeta {
            current_page: Some(1),
            total_pages: Some(3),
            total_count: None,
        };
        let nav = PageNav::new(&meta, &query, "/admin/bookings");

        assert!(!nav.has_prev());
        assert_eq!(
            nav.next_href.as_deref(),
            Some("/admin/bookings?page=2&search=spa+day&status=pending")
        );

        let meta = PaginationMeta {
            current_page: Some(3),
            total_pages: Some(3),
            total_count: None,
        };
        let nav = PageNav::new(&meta, &query, "/admin/bookings");
        assert!(nav.has_prev());
        assert!(!nav.has_next());
    }

    #[test]
    fn test_missing_metadata_is_single_page() {
        let nav = PageNav::new(&PaginationMeta::default(), &ListQuery::default(), "/admin/users");
        assert_eq!(nav.total_pages, 1);
        assert!(!nav.is_paged());
    }

    #[test]
    fn test_list_view_failure_is_error_state() {
        let view: ListView<Row> = ListView::build(
            LoadState::<Vec<Row>>::Failed("Could not reach the server. Please try again.".to_string()),
            |rows| (rows, PaginationMeta::default()),
            &ListQuery::default(),
            "/admin/users",
            &FIELDS,
            "No users found",
        );

        assert!(view.is_empty());
        assert!(view.error.is_some());
    }

    proptest! {
        #[test]
        fn test_filter_is_idempotent(names in proptest::collection::vec("[a-zA-Z ]{0,10}", 0..20), q in "[a-z]{0,3}") {
            let rows: Vec<Row> = names.iter().map(|n| row(n, "")).collect();
            let once = filter_items(&rows, &q, &FIELDS);
            let twice = filter_items(&once, &q, &FIELDS);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_filter_never_grows(names in proptest::collection::vec("[a-z]{0,8}", 0..20), q in ".{0,4}") {
            let rows: Vec<Row> = names.iter().map(|n| row(n, n)).collect();
            prop_assert!(filter_items(&rows, &q, &FIELDS).len() <= rows.len());
        }
    }
}
