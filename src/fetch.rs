//! Abstract page-fetching collaborator. The core pagination/flattening logic
//! only ever sees this trait, so tests drive it with scripted in-memory
//! fetchers and the binary plugs in the HTTP implementation.

use crate::config::{CommentSort, ListingSort, TimeWindow};
use anyhow::Result;
use serde_json::Value;

/// Outcome of one page fetch. `Blocked` and `Unparsable` are soft stops for
/// the current unit of work, never hard errors; a fatal condition (e.g. the
/// fetcher failing to construct) surfaces as `Err` instead.
#[derive(Clone, Debug)]
pub enum Fetched<T> {
    Payload(T),
    /// HTTP 403/429, or a transport failure such as a timeout.
    Blocked,
    /// Response body was not the expected JSON shape (interstitial HTML etc.).
    Unparsable,
}

/// One listing page: raw child nodes plus the opaque continuation cursor.
#[derive(Clone, Debug, Default)]
pub struct RawPage {
    pub children: Vec<Value>,
    pub after: Option<String>,
}

/// One post's raw nested reply payload (top-level children only; nesting
/// lives inside each node's `replies`).
#[derive(Clone, Debug, Default)]
pub struct RawThread {
    pub children: Vec<Value>,
}

pub trait PageFetcher: Sync {
    /// Fetch one listing page for `source`. `cursor` is the `after` token from
    /// the previous page; `offset` is the running item count the upstream
    /// pagination contract expects alongside it.
    fn listing_page(
        &self,
        source: &str,
        sort: ListingSort,
        time_window: TimeWindow,
        cursor: Option<&str>,
        offset: u64,
    ) -> Result<Fetched<RawPage>>;

    /// Fetch the nested reply payload for one post.
    fn comment_page(&self, post_id: &str, sort: CommentSort) -> Result<Fetched<RawThread>>;
}
