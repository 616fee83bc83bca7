//! Deduplication store: identity-keyed overwrite maps for the final pass over
//! everything accumulated across sources, pages and runs. Pure in-memory
//! state, no I/O, no randomness.

use crate::model::{Comment, Post};
use ahash::AHashMap;
use std::collections::hash_map::Entry;

/// Collapses duplicate identities with last-seen-wins values while keeping
/// output order deterministic: records iterate in first-seen order of their
/// key. Running the store over its own output is a fixed point.
#[derive(Debug, Default)]
pub struct DedupStore {
    post_idx: AHashMap<(String, String), usize>,
    posts: Vec<Post>,
    comment_idx: AHashMap<String, usize>,
    comments: Vec<Comment>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyed by `(source_id, post_id)`; a later record with the same identity
    /// replaces the earlier one wholesale (no field merging).
    pub fn insert_post(&mut self, post: Post) {
        let key = (post.source_id.clone(), post.post_id.clone());
        match self.post_idx.entry(key) {
            Entry::Occupied(e) => self.posts[*e.get()] = post,
            Entry::Vacant(e) => {
                e.insert(self.posts.len());
                self.posts.push(post);
            }
        }
    }

    /// Keyed by `fullname` alone: globally unique upstream, so two sources
    /// can never legitimately disagree about one comment.
    pub fn insert_comment(&mut self, comment: Comment) {
        match self.comment_idx.entry(comment.fullname.clone()) {
            Entry::Occupied(e) => self.comments[*e.get()] = comment,
            Entry::Vacant(e) => {
                e.insert(self.comments.len());
                self.comments.push(comment);
            }
        }
    }

    pub fn extend_posts(&mut self, posts: impl IntoIterator<Item = Post>) {
        for p in posts {
            self.insert_post(p);
        }
    }

    pub fn extend_comments(&mut self, comments: impl IntoIterator<Item = Comment>) {
        for c in comments {
            self.insert_comment(c);
        }
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Canonical sequences, in first-seen key order.
    pub fn into_parts(self) -> (Vec<Post>, Vec<Comment>) {
        (self.posts, self.comments)
    }
}
