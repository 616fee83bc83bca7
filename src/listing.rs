//! Listing paginator: walks a cursor-based feed one page at a time until a
//! target unique-post count is reached, the feed is exhausted, or the fetcher
//! reports a soft stop.

use crate::config::{ListingSort, TimeWindow};
use crate::fetch::{Fetched, PageFetcher};
use crate::model::Post;
use crate::util::{absolutize_permalink, iso_utc_from_epoch};
use ahash::AHashSet;
use anyhow::Result;
use serde_json::Value;

pub struct ListingPaginator<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    source: String,
    sort: ListingSort,
    time_window: TimeWindow,
    target: usize,
    after: Option<String>,
    offset: u64,
    seen_ids: AHashSet<String>,
    produced: usize,
    page_no: u64,
    done: bool,
    soft_stopped: bool,
}

impl<'a, F: PageFetcher + ?Sized> ListingPaginator<'a, F> {
    pub fn new(
        fetcher: &'a F,
        source: impl Into<String>,
        sort: ListingSort,
        time_window: TimeWindow,
        target: usize,
    ) -> Self {
        Self {
            fetcher,
            source: source.into(),
            sort,
            time_window,
            target,
            after: None,
            offset: 0,
            seen_ids: AHashSet::new(),
            produced: 0,
            page_no: 0,
            done: target == 0,
            soft_stopped: false,
        }
    }

    /// True once no further page request will be made. The orchestrator uses
    /// this to avoid a trailing politeness delay.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True when pagination ended on a blocked or unparsable response rather
    /// than on exhaustion or the target count.
    pub fn soft_stopped(&self) -> bool {
        self.soft_stopped
    }

    /// Fetch and map the next page. Returns `None` once pagination has
    /// terminated (target reached, feed exhausted, or soft stop). A page may
    /// map to an empty batch when every item was a within-run duplicate.
    pub fn next_page(&mut self) -> Result<Option<Vec<Post>>> {
        if self.done {
            return Ok(None);
        }
        self.page_no += 1;
        tracing::debug!(
            source = %self.source,
            page = self.page_no,
            after = self.after.as_deref().unwrap_or("None"),
            "listing page"
        );

        let page = match self.fetcher.listing_page(
            &self.source,
            self.sort,
            self.time_window,
            self.after.as_deref(),
            self.offset,
        )? {
            Fetched::Payload(p) => p,
            Fetched::Blocked => {
                tracing::warn!(source = %self.source, "blocked/rate-limited fetching listing");
                self.done = true;
                self.soft_stopped = true;
                return Ok(None);
            }
            Fetched::Unparsable => {
                tracing::warn!(source = %self.source, "listing payload unparsable (likely interstitial)");
                self.done = true;
                self.soft_stopped = true;
                return Ok(None);
            }
        };

        if page.children.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let mut batch: Vec<Post> = Vec::new();
        for child in &page.children {
            if self.produced >= self.target {
                break;
            }
            let Some(post) = post_from_child(&self.source, child) else {
                continue;
            };
            // Feeds occasionally re-serve items across page boundaries when
            // new items land between requests; dedup within this run.
            if !self.seen_ids.insert(post.post_id.clone()) {
                continue;
            }
            self.produced += 1;
            batch.push(post);
        }

        self.offset += page.children.len() as u64;
        self.after = page.after;
        if self.produced >= self.target || self.after.is_none() {
            self.done = true;
        }
        Ok(Some(batch))
    }
}

/// Map one raw listing child to a `Post`. Returns `None` when the item lacks
/// an id (malformed records are dropped, not errors).
///
/// Optional coercions are strict on purpose: `score`/`num_comments` accept
/// only JSON integers, the boolean flags only booleans; anything else becomes
/// `None` rather than a guess.
pub(crate) fn post_from_child(source_id: &str, child: &Value) -> Option<Post> {
    let data = child.get("data").and_then(Value::as_object)?;
    let post_id = data
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;

    let fullname = data
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("t3_{post_id}"));

    Some(Post {
        source_id: source_id.to_string(),
        post_id: post_id.to_string(),
        fullname,
        title: data
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        author: data.get("author").and_then(Value::as_str).map(str::to_string),
        created_utc: iso_utc_from_epoch(data.get("created_utc")),
        score: data.get("score").and_then(Value::as_i64),
        num_comments: data.get("num_comments").and_then(Value::as_i64),
        upvote_ratio: data.get("upvote_ratio").and_then(Value::as_f64),
        over_18: data.get("over_18").and_then(Value::as_bool),
        is_self: data.get("is_self").and_then(Value::as_bool),
        link_flair_text: data
            .get("link_flair_text")
            .and_then(Value::as_str)
            .map(str::to_string),
        permalink: absolutize_permalink(
            data.get("permalink").and_then(Value::as_str).unwrap_or(""),
        ),
        post_url: data.get("url").and_then(Value::as_str).map(str::to_string),
        selftext: data
            .get("selftext")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}
