//! Tree flattener: walks one post's nested reply payload depth-first with an
//! explicit stack (no call-stack recursion, so arbitrarily deep payloads are
//! safe) and materializes flat `Comment` records with parent foreign keys.

use crate::model::Comment;
use crate::util::{absolutize_permalink, iso_utc_from_epoch};
use serde_json::Value;

/// Flatten `children` (the top-level reply nodes of one post) into a flat
/// ordered sequence of comments, plus the number of "more replies" placeholder
/// nodes encountered before traversal ended.
///
/// Ordering: depth-first in document order. Sibling groups are pushed onto the
/// stack in reverse so that popping yields the original order, and a node's
/// subtree is fully emitted (subject to caps) before its next sibling. Every
/// `parent_fullname` therefore refers to the post or to a comment that appears
/// earlier in the returned sequence.
///
/// Caps: nodes whose computed depth exceeds `max_depth` are pruned with their
/// subtrees; traversal halts the instant `max_comments` records exist, and
/// placeholders never visited because of the halt are not counted.
pub fn flatten_comment_tree(
    source_id: &str,
    post_id: &str,
    post_fullname: &str,
    children: &[Value],
    max_comments: usize,
    max_depth: u32,
) -> (Vec<Comment>, u64) {
    let mut out: Vec<Comment> = Vec::new();
    let mut skipped_more: u64 = 0;

    // DFS stack of (node, computed depth, parent fullname).
    let mut stack: Vec<(&Value, u32, String)> = Vec::with_capacity(children.len());
    for child in children.iter().rev() {
        stack.push((child, 0, post_fullname.to_string()));
    }

    while out.len() < max_comments {
        let Some((node, depth, parent_fullname)) = stack.pop() else {
            break;
        };

        let kind = node.get("kind").and_then(Value::as_str);
        if kind == Some("more") {
            // Placeholder for replies not included in this payload. Counted,
            // never materialized, never followed.
            skipped_more += 1;
            continue;
        }
        if kind != Some("t1") {
            continue;
        }
        if depth > max_depth {
            continue;
        }
        let Some(data) = node.get("data").and_then(Value::as_object) else {
            continue;
        };

        let comment_id = data
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        let fullname = data
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| comment_id.map(|id| format!("t1_{id}")));
        let (Some(comment_id), Some(fullname)) = (comment_id, fullname) else {
            // No defensible identity: drop the node and, by not enqueuing its
            // replies, its entire subtree. Re-parenting grandchildren to the
            // grandparent would fabricate linkage.
            continue;
        };

        let body = data.get("body").and_then(Value::as_str);
        let removed = matches!(body, None | Some("[removed]") | Some("[deleted]"));

        out.push(Comment {
            source_id: source_id.to_string(),
            post_id: post_id.to_string(),
            comment_id: comment_id.to_string(),
            fullname: fullname.clone(),
            parent_fullname,
            // The payload's own depth annotation wins when present: the origin
            // re-bases it after certain removals, which makes it more
            // authoritative than our computed value.
            depth: data
                .get("depth")
                .and_then(Value::as_i64)
                .unwrap_or(i64::from(depth)),
            author: data.get("author").and_then(Value::as_str).map(str::to_string),
            created_utc: iso_utc_from_epoch(data.get("created_utc")),
            score: data.get("score").and_then(Value::as_i64),
            body: body.map(str::to_string),
            permalink: absolutize_permalink(
                data.get("permalink").and_then(Value::as_str).unwrap_or(""),
            ),
            is_submitter: data.get("is_submitter").and_then(Value::as_bool),
            distinguished: data
                .get("distinguished")
                .and_then(Value::as_str)
                .map(str::to_string),
            stickied: data.get("stickied").and_then(Value::as_bool),
            removed,
        });

        // Enqueue replies. An empty reply set arrives as "" rather than an
        // object, so the as_object check covers both shapes.
        let next_depth = depth + 1;
        if next_depth <= max_depth {
            if let Some(rep_children) = data
                .get("replies")
                .and_then(Value::as_object)
                .and_then(|r| r.get("data"))
                .and_then(|d| d.get("children"))
                .and_then(Value::as_array)
            {
                for rep in rep_children.iter().rev() {
                    stack.push((rep, next_depth, fullname.clone()));
                }
            }
        }
    }

    (out, skipped_more)
}
