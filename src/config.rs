use std::fmt;

/// Stock browser User-Agent used when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/121.0 Safari/537.36";

/// Listing feed sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ListingSort {
    New,
    Hot,
    Top,
}

impl ListingSort {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingSort::New => "new",
            ListingSort::Hot => "hot",
            ListingSort::Top => "top",
        }
    }
}

impl fmt::Display for ListingSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time window applied by the upstream API to `top` listings (`t=` param).
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TimeWindow {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order requested for per-post comment payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CommentSort {
    Confidence,
    Top,
    New,
    Controversial,
    Old,
    Qa,
}

impl CommentSort {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentSort::Confidence => "confidence",
            CommentSort::Top => "top",
            CommentSort::New => "new",
            CommentSort::Controversial => "controversial",
            CommentSort::Old => "old",
            CommentSort::Qa => "qa",
        }
    }
}

impl fmt::Display for CommentSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct HarvestOptions {
    pub sort: ListingSort,
    pub time_window: TimeWindow,
    pub post_limit: usize,           // target unique posts per source
    pub comment_sort: CommentSort,
    pub max_comments_per_post: usize, // hard cap on flattened comments per post
    pub max_depth: u32,               // max reply depth to traverse
    pub min_sleep: f64,               // seconds between requests (lower bound)
    pub max_sleep: f64,               // seconds between requests (upper bound)
    pub timeout_secs: u64,            // per-request HTTP timeout
    pub user_agent: String,
    pub comment_lanes: usize,         // 1 = strictly sequential (default)
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            sort: ListingSort::New,
            time_window: TimeWindow::Week,
            post_limit: 25,
            comment_sort: CommentSort::Top,
            max_comments_per_post: 2000,
            max_depth: 50,
            min_sleep: 3.0,
            max_sleep: 8.0,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            comment_lanes: 1,
        }
    }
}

impl HarvestOptions {
    pub fn with_sort(mut self, sort: ListingSort) -> Self {
        self.sort = sort;
        self
    }
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = tw;
        self
    }
    pub fn with_post_limit(mut self, limit: usize) -> Self {
        self.post_limit = limit;
        self
    }
    pub fn with_comment_sort(mut self, sort: CommentSort) -> Self {
        self.comment_sort = sort;
        self
    }
    pub fn with_max_comments_per_post(mut self, cap: usize) -> Self {
        self.max_comments_per_post = cap;
        self
    }
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
    pub fn with_sleep_bounds(mut self, min_s: f64, max_s: f64) -> Self {
        self.min_sleep = min_s.max(0.0);
        self.max_sleep = max_s.max(self.min_sleep);
        self
    }
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
    pub fn with_comment_lanes(mut self, lanes: usize) -> Self {
        self.comment_lanes = lanes.max(1);
        self
    }
}
