use serde::Serialize;

/// One listing item, flattened. Identity is `(source_id, post_id)`.
///
/// Field declaration order is the persisted column order; downstream
/// consumers rely on column position, so do not reorder.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Post {
    pub source_id: String,
    pub post_id: String,
    pub fullname: String, // feed-wide unique token, "t3_{post_id}" when omitted
    pub title: String,
    pub author: Option<String>, // None for deleted accounts
    pub created_utc: Option<String>, // RFC3339 UTC
    pub score: Option<i64>,
    pub num_comments: Option<i64>,
    pub upvote_ratio: Option<f64>,
    pub over_18: Option<bool>,
    pub is_self: Option<bool>,
    pub link_flair_text: Option<String>,
    pub permalink: String, // canonical absolute URL
    pub post_url: Option<String>,
    pub selftext: Option<String>,
}

/// One flattened reply. Identity is `fullname` (globally unique upstream).
///
/// `parent_fullname` points at the owning post's fullname for depth-0
/// replies, otherwise at a comment emitted earlier in traversal order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Comment {
    pub source_id: String,
    pub post_id: String,
    pub comment_id: String,
    pub fullname: String,
    pub parent_fullname: String,
    pub depth: i64, // 0 = direct reply to the post
    pub author: Option<String>,
    pub created_utc: Option<String>,
    pub score: Option<i64>,
    pub body: Option<String>, // preserved verbatim even when removed
    pub permalink: String,
    pub is_submitter: Option<bool>,
    pub distinguished: Option<String>,
    pub stickied: Option<bool>,
    pub removed: bool,
}

/// Column order for the tabular sink; must match `Post` declaration order.
pub const POST_FIELDS: &[&str] = &[
    "source_id",
    "post_id",
    "fullname",
    "title",
    "author",
    "created_utc",
    "score",
    "num_comments",
    "upvote_ratio",
    "over_18",
    "is_self",
    "link_flair_text",
    "permalink",
    "post_url",
    "selftext",
];

/// Column order for the tabular sink; must match `Comment` declaration order.
pub const COMMENT_FIELDS: &[&str] = &[
    "source_id",
    "post_id",
    "comment_id",
    "fullname",
    "parent_fullname",
    "depth",
    "author",
    "created_utc",
    "score",
    "body",
    "permalink",
    "is_submitter",
    "distinguished",
    "stickied",
    "removed",
];
