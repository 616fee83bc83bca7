#![allow(dead_code)]

use parking_lot::Mutex;
use rscrape::{CommentSort, Fetched, ListingSort, PageFetcher, RawPage, RawThread, TimeWindow};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};

/// Build a raw listing child (`kind: "t3"`) with reasonable defaults.
pub fn listing_child(id: &str) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "name": format!("t3_{id}"),
            "title": format!("Post {id}"),
            "author": "alice",
            "created_utc": 1136073600,
            "score": 42,
            "num_comments": 3,
            "upvote_ratio": 0.93,
            "over_18": false,
            "is_self": true,
            "link_flair_text": null,
            "permalink": format!("/r/test/comments/{id}/slug/"),
            "url": format!("https://www.reddit.com/r/test/comments/{id}/slug/"),
            "selftext": "hello"
        }
    })
}

/// Build a raw comment node (`kind: "t1"`) with nested replies.
pub fn t1(id: &str, body: &str, replies: &[Value]) -> Value {
    let replies_v = if replies.is_empty() {
        // Empty reply sets arrive as "" in real payloads, not as objects.
        json!("")
    } else {
        json!({ "kind": "Listing", "data": { "children": replies } })
    };
    json!({
        "kind": "t1",
        "data": {
            "id": id,
            "name": format!("t1_{id}"),
            "body": body,
            "author": "bob",
            "created_utc": 1136074600.5,
            "score": 7,
            "permalink": format!("/r/test/comments/p1/slug/{id}/"),
            "is_submitter": false,
            "distinguished": null,
            "stickied": false,
            "replies": replies_v
        }
    })
}

/// Build a "more replies" placeholder node.
pub fn more() -> Value {
    json!({
        "kind": "more",
        "data": { "count": 12, "depth": 0, "children": ["zzz1", "zzz2"] }
    })
}

pub fn page(ids: &[&str], after: Option<&str>) -> RawPage {
    RawPage {
        children: ids.iter().map(|id| listing_child(id)).collect(),
        after: after.map(str::to_string),
    }
}

/// In-memory `PageFetcher` driven by pre-scripted responses. Listing pages
/// are consumed in order per source; requesting beyond the script panics so
/// tests catch superfluous fetches.
#[derive(Default)]
pub struct ScriptedFetcher {
    listing_pages: Mutex<HashMap<String, VecDeque<Fetched<RawPage>>>>,
    threads: HashMap<String, Fetched<RawThread>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_listing(&mut self, source: &str, pages: Vec<Fetched<RawPage>>) {
        self.listing_pages
            .lock()
            .insert(source.to_string(), pages.into());
    }

    pub fn script_thread(&mut self, post_id: &str, thread: Fetched<RawThread>) {
        self.threads.insert(post_id.to_string(), thread);
    }

    pub fn script_thread_children(&mut self, post_id: &str, children: Vec<Value>) {
        self.script_thread(post_id, Fetched::Payload(RawThread { children }));
    }
}

impl PageFetcher for ScriptedFetcher {
    fn listing_page(
        &self,
        source: &str,
        _sort: ListingSort,
        _time_window: TimeWindow,
        _cursor: Option<&str>,
        _offset: u64,
    ) -> anyhow::Result<Fetched<RawPage>> {
        let mut pages = self.listing_pages.lock();
        let queue = pages
            .get_mut(source)
            .unwrap_or_else(|| panic!("unscripted listing source {source}"));
        Ok(queue
            .pop_front()
            .unwrap_or_else(|| panic!("listing request beyond script for {source}")))
    }

    fn comment_page(&self, post_id: &str, _sort: CommentSort) -> anyhow::Result<Fetched<RawThread>> {
        Ok(self
            .threads
            .get(post_id)
            .cloned()
            .unwrap_or(Fetched::Payload(RawThread { children: vec![] })))
    }
}
