//! Fetch orchestrator: composes the listing paginator with the tree
//! flattener per source, owns the politeness-delay sequencing and the
//! accumulated state, and hands everything to the dedup store at the end.

use crate::config::{CommentSort, HarvestOptions, ListingSort, TimeWindow};
use crate::dedup::DedupStore;
use crate::fetch::{Fetched, PageFetcher};
use crate::listing::ListingPaginator;
use crate::model::{Comment, Post};
use crate::throttle::JitterDelay;
use crate::tree::flatten_comment_tree;
use crate::util::init_tracing_once;
use anyhow::Result;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Per-run counters. Placeholder tallies are diagnostic only; the "more
/// replies" continuations themselves are never followed.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    /// Per-source count of "more replies" placeholder nodes skipped.
    pub skipped_placeholders: BTreeMap<String, u64>,
    /// Units of work (one listing run or one post's comment fetch) that ended
    /// early on a blocked or unparsable response.
    pub soft_stops: u64,
}

/// Canonical output of one orchestrator run.
#[derive(Clone, Debug)]
pub struct Harvest {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub diagnostics: Diagnostics,
}

#[derive(Clone, Debug, Default)]
pub struct Harvester {
    opts: HarvestOptions,
}

impl Harvester {
    pub fn new() -> Self {
        Self::default()
    }

    // -------- Builder methods --------
    pub fn sort(mut self, sort: ListingSort) -> Self { self.opts = self.opts.with_sort(sort); self }
    pub fn time_window(mut self, tw: TimeWindow) -> Self { self.opts = self.opts.with_time_window(tw); self }
    pub fn post_limit(mut self, limit: usize) -> Self { self.opts = self.opts.with_post_limit(limit); self }
    pub fn comment_sort(mut self, sort: CommentSort) -> Self { self.opts = self.opts.with_comment_sort(sort); self }
    pub fn max_comments_per_post(mut self, cap: usize) -> Self { self.opts = self.opts.with_max_comments_per_post(cap); self }
    pub fn max_depth(mut self, depth: u32) -> Self { self.opts = self.opts.with_max_depth(depth); self }
    pub fn sleep_bounds(mut self, min_s: f64, max_s: f64) -> Self { self.opts = self.opts.with_sleep_bounds(min_s, max_s); self }
    pub fn timeout_secs(mut self, secs: u64) -> Self { self.opts = self.opts.with_timeout_secs(secs); self }
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self { self.opts = self.opts.with_user_agent(ua); self }
    /// Opt-in bounded concurrency for independent per-post comment fetches.
    /// Each lane stays sequential with its own delay policy; listing
    /// pagination is never parallelized.
    pub fn comment_lanes(mut self, lanes: usize) -> Self { self.opts = self.opts.with_comment_lanes(lanes); self }

    pub fn options(&self) -> &HarvestOptions {
        &self.opts
    }

    /// Harvest every source in order: paginate the listing, then fetch and
    /// flatten each post's replies, then deduplicate globally. Soft stops end
    /// their own unit of work only; nothing here aborts the overall run.
    pub fn run_with<F, S>(&self, fetcher: &F, sources: &[S]) -> Result<Harvest>
    where
        F: PageFetcher + ?Sized,
        S: AsRef<str>,
    {
        init_tracing_once();
        let delay = JitterDelay::new(self.opts.min_sleep, self.opts.max_sleep);

        let mut store = DedupStore::new();
        let mut diagnostics = Diagnostics::default();

        for source in sources {
            let source = source.as_ref();
            tracing::info!(source, "harvesting");

            let posts = self.paginate_source(fetcher, source, &delay, &mut diagnostics)?;
            tracing::info!(source, posts = posts.len(), "listing collected");

            let (comments, skipped, soft) = if self.opts.comment_lanes > 1 && posts.len() > 1 {
                self.fetch_comments_lanes(fetcher, &posts)?
            } else {
                self.fetch_comments_sequential(fetcher, &posts, &delay)?
            };

            if skipped > 0 {
                tracing::info!(source, skipped, "skipped 'more replies' placeholders");
            }
            *diagnostics.skipped_placeholders.entry(source.to_string()).or_insert(0) += skipped;
            diagnostics.soft_stops += soft;

            store.extend_posts(posts);
            store.extend_comments(comments);
        }

        let (posts, comments) = store.into_parts();
        Ok(Harvest { posts, comments, diagnostics })
    }

    fn paginate_source<F>(
        &self,
        fetcher: &F,
        source: &str,
        delay: &JitterDelay,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Post>>
    where
        F: PageFetcher + ?Sized,
    {
        let mut paginator = ListingPaginator::new(
            fetcher,
            source,
            self.opts.sort,
            self.opts.time_window,
            self.opts.post_limit,
        );
        let mut posts: Vec<Post> = Vec::new();
        while let Some(batch) = paginator.next_page()? {
            posts.extend(batch);
            // Delay only between page requests: never before the first, never
            // once no further request will be made.
            if !paginator.is_done() {
                delay.pause();
            }
        }
        if paginator.soft_stopped() {
            diagnostics.soft_stops += 1;
        }
        Ok(posts)
    }

    fn fetch_comments_sequential<F>(
        &self,
        fetcher: &F,
        posts: &[Post],
        delay: &JitterDelay,
    ) -> Result<(Vec<Comment>, u64, u64)>
    where
        F: PageFetcher + ?Sized,
    {
        let mut comments: Vec<Comment> = Vec::new();
        let mut skipped: u64 = 0;
        let mut soft: u64 = 0;
        for (i, post) in posts.iter().enumerate() {
            tracing::debug!(n = i + 1, total = posts.len(), post_id = %post.post_id, "comments fetch");
            delay.pause();
            let (mut batch, s, blocked) = self.fetch_post_comments(fetcher, post)?;
            comments.append(&mut batch);
            skipped += s;
            soft += blocked;
        }
        Ok((comments, skipped, soft))
    }

    /// Bounded-lane variant: posts split into contiguous lanes, each lane
    /// strictly sequential with its own delay, results merged in lane order
    /// so output stays deterministic for a fixed fetcher.
    fn fetch_comments_lanes<F>(
        &self,
        fetcher: &F,
        posts: &[Post],
    ) -> Result<(Vec<Comment>, u64, u64)>
    where
        F: PageFetcher + ?Sized,
    {
        let lanes = self.opts.comment_lanes.min(posts.len()).max(1);
        let chunk = posts.len().div_ceil(lanes);

        let lane_results: Vec<(Vec<Comment>, u64, u64)> = posts
            .par_chunks(chunk)
            .map(|lane| -> Result<(Vec<Comment>, u64, u64)> {
                let delay = JitterDelay::new(self.opts.min_sleep, self.opts.max_sleep);
                let mut comments: Vec<Comment> = Vec::new();
                let mut skipped: u64 = 0;
                let mut soft: u64 = 0;
                for post in lane {
                    delay.pause();
                    let (mut batch, s, blocked) = self.fetch_post_comments(fetcher, post)?;
                    comments.append(&mut batch);
                    skipped += s;
                    soft += blocked;
                }
                Ok((comments, skipped, soft))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut comments: Vec<Comment> = Vec::new();
        let mut skipped: u64 = 0;
        let mut soft: u64 = 0;
        for (mut batch, s, blocked) in lane_results {
            comments.append(&mut batch);
            skipped += s;
            soft += blocked;
        }
        Ok((comments, skipped, soft))
    }

    /// One post's unit of work: fetch the reply payload and flatten it under
    /// this run's caps. Blocked/unparsable responses skip the post.
    fn fetch_post_comments<F>(
        &self,
        fetcher: &F,
        post: &Post,
    ) -> Result<(Vec<Comment>, u64, u64)>
    where
        F: PageFetcher + ?Sized,
    {
        let thread = match fetcher.comment_page(&post.post_id, self.opts.comment_sort)? {
            Fetched::Payload(t) => t,
            Fetched::Blocked => {
                tracing::warn!(post_id = %post.post_id, "blocked/rate-limited fetching comments");
                return Ok((Vec::new(), 0, 1));
            }
            Fetched::Unparsable => {
                tracing::warn!(post_id = %post.post_id, "comment payload unparsable (likely interstitial)");
                return Ok((Vec::new(), 0, 1));
            }
        };

        let (comments, skipped) = flatten_comment_tree(
            &post.source_id,
            &post.post_id,
            &post.fullname,
            &thread.children,
            self.opts.max_comments_per_post,
            self.opts.max_depth,
        );
        Ok((comments, skipped, 0))
    }
}
