#[path = "common/mod.rs"]
mod common;

use common::{page, ScriptedFetcher};
use rscrape::{Fetched, ListingPaginator, ListingSort, Post, RawPage, TimeWindow};

fn drain(paginator: &mut ListingPaginator<'_, ScriptedFetcher>) -> Vec<Post> {
    let mut posts = Vec::new();
    while let Some(batch) = paginator.next_page().unwrap() {
        posts.extend(batch);
    }
    posts
}

#[test]
fn paginates_to_exhaustion_and_dedups_overlap() {
    let mut fetcher = ScriptedFetcher::new();
    // "c" is re-served on page two (items shifted between requests).
    fetcher.script_listing(
        "travel",
        vec![
            Fetched::Payload(page(&["a", "b", "c"], Some("cur1"))),
            Fetched::Payload(page(&["c", "d"], Some("cur2"))),
            Fetched::Payload(page(&[], None)),
        ],
    );

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 100);
    let posts = drain(&mut p);

    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert!(p.is_done());
    assert!(!p.soft_stopped());
}

#[test]
fn stops_at_target_without_extra_requests() {
    let mut fetcher = ScriptedFetcher::new();
    // Only one page scripted: a second request would panic.
    fetcher.script_listing(
        "travel",
        vec![Fetched::Payload(page(&["a", "b", "c"], Some("cur1")))],
    );

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 2);
    let posts = drain(&mut p);

    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(p.is_done());
}

#[test]
fn blocked_first_page_yields_empty_soft_stop() {
    let mut fetcher = ScriptedFetcher::new();
    fetcher.script_listing("travel", vec![Fetched::Blocked]);

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert!(posts.is_empty());
    assert!(p.soft_stopped());
}

#[test]
fn blocked_mid_run_keeps_partial_results() {
    let mut fetcher = ScriptedFetcher::new();
    fetcher.script_listing(
        "travel",
        vec![
            Fetched::Payload(page(&["a", "b"], Some("cur1"))),
            Fetched::Blocked,
        ],
    );

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert_eq!(posts.len(), 2);
    assert!(p.soft_stopped());
}

#[test]
fn unparsable_page_treated_like_blocked() {
    let mut fetcher = ScriptedFetcher::new();
    fetcher.script_listing(
        "travel",
        vec![
            Fetched::Payload(page(&["a"], Some("cur1"))),
            Fetched::Unparsable,
        ],
    );

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert_eq!(posts.len(), 1);
    assert!(p.soft_stopped());
}

#[test]
fn absent_cursor_ends_pagination() {
    let mut fetcher = ScriptedFetcher::new();
    fetcher.script_listing("travel", vec![Fetched::Payload(page(&["a", "b"], None))]);

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert_eq!(posts.len(), 2);
    assert!(p.is_done());
    assert!(!p.soft_stopped());
}

#[test]
fn zero_target_makes_no_requests() {
    let fetcher = ScriptedFetcher::new(); // nothing scripted; any request panics
    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 0);
    assert!(p.is_done());
    assert!(p.next_page().unwrap().is_none());
}

#[test]
fn malformed_items_are_dropped_not_fatal() {
    let mut fetcher = ScriptedFetcher::new();
    let mut pg = page(&["a"], None);
    // Item without an id: silently dropped.
    pg.children.push(serde_json::json!({ "kind": "t3", "data": { "title": "no id" } }));
    fetcher.script_listing("travel", vec![Fetched::Payload(pg)]);

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "a");
}

#[test]
fn maps_listing_fields_and_fullname_fallback() {
    let mut fetcher = ScriptedFetcher::new();
    let raw = serde_json::json!({
        "kind": "t3",
        "data": {
            "id": "x1",
            // no "name": fullname must be derived
            "title": "Hello",
            "author": null,
            "created_utc": 1136073600,
            "score": 1.5,          // not an integer: dropped
            "num_comments": 4,
            "upvote_ratio": 1,     // integral ratio still accepted
            "over_18": "yes",      // not a bool: dropped
            "permalink": "/r/travel/comments/x1/hello/",
            "selftext": ""
        }
    });
    fetcher.script_listing(
        "travel",
        vec![Fetched::Payload(RawPage { children: vec![raw], after: None })],
    );

    let mut p = ListingPaginator::new(&fetcher, "travel", ListingSort::New, TimeWindow::Week, 10);
    let posts = drain(&mut p);

    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.fullname, "t3_x1");
    assert_eq!(post.author, None);
    assert_eq!(post.score, None);
    assert_eq!(post.num_comments, Some(4));
    assert_eq!(post.upvote_ratio, Some(1.0));
    assert_eq!(post.over_18, None);
    assert_eq!(post.created_utc.as_deref(), Some("2006-01-01T00:00:00Z"));
    assert_eq!(post.permalink, "https://www.reddit.com/r/travel/comments/x1/hello/");
    assert_eq!(post.selftext, None, "empty selftext normalizes to null");
}
