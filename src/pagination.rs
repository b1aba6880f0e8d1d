//! Cursor pagination over Shopify connection fields.
//!
//! Pages are fetched strictly sequentially: the next request is issued only
//! once the prior page's continuation cursor is known.

use std::future::Future;

use tracing::warn;

use crate::error::InventoryError;

/// Cursor-based page info.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorPageInfo {
    /// Whether there is another page.
    pub has_next_page: bool,
    /// Continuation cursor for the next page.
    pub end_cursor: Option<String>,
}

/// One page of a cursor-paginated connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Items in the page.
    pub items: Vec<T>,
    /// Pagination info.
    pub page_info: CursorPageInfo,
}

/// Result of walking a paginated connection to exhaustion.
///
/// A failure partway through does not discard pages already collected; the
/// error is recorded alongside the items so callers can tell an empty
/// location apart from a broken fetch.
#[derive(Debug)]
pub struct Paginated<T> {
    /// Flattened items, in page order.
    pub items: Vec<T>,
    /// Number of pages fetched successfully.
    pub pages: usize,
    /// The error that stopped the walk early, if any.
    pub error: Option<InventoryError>,
}

impl<T> Paginated<T> {
    /// Returns `true` when the walk reached the server-reported last page.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Drain a cursor-paginated connection.
///
/// The first request carries no cursor; each following request carries the
/// previous page's `end_cursor`. Fetching stops exactly when the server
/// reports no next page, the cursor is absent, or a request fails.
pub async fn paginate_cursor<T, F, Fut>(mut fetch_page: F) -> Paginated<T>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, InventoryError>>,
{
    let mut items = Vec::new();
    let mut pages = 0;
    let mut cursor: Option<String> = None;

    loop {
        let page = match fetch_page(cursor.clone()).await {
            Ok(page) => page,
            Err(error) => {
                warn!(pages, %error, "pagination stopped early, keeping partial results");
                return Paginated {
                    items,
                    pages,
                    error: Some(error),
                };
            }
        };

        pages += 1;
        items.extend(page.items);

        if !page.page_info.has_next_page {
            break;
        }
        cursor = page.page_info.end_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Paginated {
        items,
        pages,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, next: Option<&str>) -> CursorPage<u32> {
        CursorPage {
            items,
            page_info: CursorPageInfo {
                has_next_page: next.is_some(),
                end_cursor: next.map(String::from),
            },
        }
    }

    #[tokio::test]
    async fn walks_pages_in_order() {
        let mut requests = Vec::new();
        let result = paginate_cursor(|cursor| {
            requests.push(cursor.clone());
            let page = match cursor.as_deref() {
                None => page(vec![1, 2, 3], Some("c1")),
                Some("c1") => page(vec![4, 5, 6], Some("c2")),
                Some("c2") => page(vec![7], None),
                Some(other) => panic!("unexpected cursor {other}"),
            };
            async move { Ok(page) }
        })
        .await;

        assert_eq!(result.items, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(result.pages, 3);
        assert!(result.is_complete());
        assert_eq!(
            requests,
            vec![None, Some("c1".into()), Some("c2".into())]
        );
    }

    #[tokio::test]
    async fn failure_keeps_partial_results() {
        let result = paginate_cursor(|cursor| async move {
            match cursor.as_deref() {
                None => Ok(page(vec![1, 2, 3], Some("c1"))),
                Some(_) => Err(InventoryError::MissingData("location".into())),
            }
        })
        .await;

        assert_eq!(result.items, vec![1, 2, 3]);
        assert_eq!(result.pages, 1);
        assert!(!result.is_complete());
        assert!(matches!(result.error, Some(InventoryError::MissingData(_))));
    }

    #[tokio::test]
    async fn stops_when_cursor_absent_despite_next_page() {
        let result = paginate_cursor(|cursor| async move {
            assert!(cursor.is_none());
            Ok(CursorPage {
                items: vec![1],
                page_info: CursorPageInfo {
                    has_next_page: true,
                    end_cursor: None,
                },
            })
        })
        .await;

        assert_eq!(result.items, vec![1]);
        assert_eq!(result.pages, 1);
        assert!(result.is_complete());
    }
}
