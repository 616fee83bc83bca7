mod config;
mod dedup;
mod fetch;
mod harvest;
mod http;
mod listing;
mod model;
mod sink;
mod throttle;
mod tree;
mod util;

pub use crate::config::{
    CommentSort, HarvestOptions, ListingSort, TimeWindow, DEFAULT_USER_AGENT,
};
pub use crate::model::{Comment, Post, COMMENT_FIELDS, POST_FIELDS};

// Abstract collaborators (mockable in tests) and the HTTP implementation.
pub use crate::fetch::{Fetched, PageFetcher, RawPage, RawThread};
pub use crate::http::HttpFetcher;
pub use crate::sink::{FileSink, RecordSink};

// Core engine pieces.
pub use crate::dedup::DedupStore;
pub use crate::harvest::{Diagnostics, Harvest, Harvester};
pub use crate::listing::ListingPaginator;
pub use crate::throttle::JitterDelay;
pub use crate::tree::flatten_comment_tree;

// Expose tracing init so binaries can import from crate root.
pub use crate::util::{init_tracing_once, WWW_BASE};
