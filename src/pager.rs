//! Offset pagination over the catalog listing.
//!
//! The pager is a plain state machine: [`ListPager::begin`] hands out the next
//! request, and the caller reports back with [`ListPager::complete`] or
//! [`ListPager::fail`]. Only one request is outstanding at a time.

use serde::{Deserialize, Serialize};

use crate::api::ListResponse;
use crate::state::CreatureSummary;

pub const PAGE_SIZE: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingCursor {
    pub offset: u32,
    pub page_size: u32,
    pub has_more: bool,
}

impl Default for PagingCursor {
    fn default() -> Self {
        Self {
            offset: 0,
            page_size: PAGE_SIZE,
            has_more: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

/// A fetched page, tagged with the offset it was requested at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub offset: u32,
    pub entries: Vec<CreatureSummary>,
    pub has_more: bool,
}

impl CatalogPage {
    pub fn from_response(offset: u32, response: ListResponse) -> Self {
        Self {
            offset,
            has_more: response.next.is_some(),
            entries: response
                .results
                .into_iter()
                .map(|resource| CreatureSummary {
                    name: resource.name,
                    url: resource.url,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPager {
    cursor: PagingCursor,
    entries: Vec<CreatureSummary>,
    in_flight: Option<u32>,
    error: Option<String>,
}

impl ListPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next page. Returns `None` while a request is outstanding or
    /// once the listing reported no further pages.
    pub fn begin(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.cursor.has_more {
            return None;
        }
        self.in_flight = Some(self.cursor.offset);
        self.error = None;
        Some(PageRequest {
            offset: self.cursor.offset,
            limit: self.cursor.page_size,
        })
    }

    /// Apply a loaded page and return the rows it appended. Pages that do
    /// not answer the outstanding request are dropped.
    pub fn complete(&mut self, page: CatalogPage) -> Option<&[CreatureSummary]> {
        if self.in_flight != Some(page.offset) {
            tracing::debug!(offset = page.offset, "dropping stale catalog page");
            return None;
        }
        self.in_flight = None;
        self.error = None;
        let start = self.entries.len();
        self.entries.extend(page.entries);
        self.cursor.offset = page.offset + self.cursor.page_size;
        self.cursor.has_more = page.has_more;
        Some(&self.entries[start..])
    }

    /// Record a failed request. The cursor is left where it was so the same
    /// offset is requested again on retry.
    pub fn fail(&mut self, offset: u32, error: impl Into<String>) -> bool {
        if self.in_flight != Some(offset) {
            return false;
        }
        self.in_flight = None;
        self.error = Some(error.into());
        true
    }

    pub fn cursor(&self) -> PagingCursor {
        self.cursor
    }

    pub fn entries(&self) -> &[CreatureSummary] {
        &self.entries
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NamedResource;
    use pretty_assertions::assert_eq;

    fn response(names: &[&str], next: Option<&str>) -> ListResponse {
        ListResponse {
            results: names
                .iter()
                .map(|name| NamedResource {
                    name: name.to_string(),
                    url: format!("https://pokeapi.co/api/v2/pokemon/{name}/"),
                })
                .collect(),
            next: next.map(str::to_string),
        }
    }

    #[test]
    fn test_first_page_advances_cursor() {
        let mut pager = ListPager::new();
        let request = pager.begin().unwrap();
        assert_eq!(request, PageRequest { offset: 0, limit: 20 });
        assert!(pager.is_loading());

        let page = CatalogPage::from_response(
            0,
            response(&["bulbasaur"], Some("https://pokeapi.co/api/v2/pokemon?offset=20&limit=20")),
        );
        let appended = pager.complete(page).unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].name, "bulbasaur");
        assert_eq!(
            pager.cursor(),
            PagingCursor { offset: 20, page_size: 20, has_more: true }
        );
        assert!(!pager.is_loading());
    }

    #[test]
    fn test_begin_while_outstanding_is_noop() {
        let mut pager = ListPager::new();
        pager.begin().unwrap();
        assert_eq!(pager.begin(), None);
        assert_eq!(pager.cursor().offset, 0);
        assert!(pager.entries().is_empty());
    }

    #[test]
    fn test_last_page_stops_paging() {
        let mut pager = ListPager::new();
        pager.begin().unwrap();
        pager.complete(CatalogPage::from_response(0, response(&["a", "b"], None)));
        assert!(!pager.has_more());
        assert_eq!(pager.begin(), None);
        assert_eq!(pager.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_failure_keeps_cursor_for_retry() {
        let mut pager = ListPager::new();
        pager.begin().unwrap();
        pager.complete(CatalogPage::from_response(0, response(&["a"], Some("next"))));

        let request = pager.begin().unwrap();
        assert_eq!(request.offset, 20);
        assert!(pager.fail(20, "timeout"));
        assert_eq!(pager.error(), Some("timeout"));
        assert_eq!(pager.cursor().offset, 20);
        assert_eq!(pager.names(), vec!["a"]);

        let retry = pager.begin().unwrap();
        assert_eq!(retry.offset, 20);
        assert_eq!(pager.error(), None);
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut pager = ListPager::new();
        assert!(pager
            .complete(CatalogPage::from_response(0, response(&["a"], None)))
            .is_none());
        pager.begin().unwrap();
        assert!(pager
            .complete(CatalogPage::from_response(40, response(&["z"], None)))
            .is_none());
        assert!(!pager.fail(40, "late"));
        assert!(pager.is_loading());
        assert!(pager.entries().is_empty());
    }
}
