use anyhow::Result;
use clap::Parser;
use rscrape::{
    init_tracing_once, CommentSort, FileSink, Harvester, HttpFetcher, ListingSort, RecordSink,
    TimeWindow, DEFAULT_USER_AGENT,
};
use std::path::PathBuf;
use std::time::Duration;

/// Pull posts and nested comment trees from public subreddit JSON listings
/// into flat CSV/NDJSON tables.
#[derive(Debug, Parser)]
#[command(name = "rscrape", version)]
struct Cli {
    /// Subreddits (no "r/"), e.g. --subs travel solotravel
    #[arg(long, required = true, num_args = 1..)]
    subs: Vec<String>,

    /// Post listing sort
    #[arg(long, value_enum, default_value_t = ListingSort::New)]
    sort: ListingSort,

    /// Time window for `top` listings
    #[arg(long = "t", value_enum, default_value_t = TimeWindow::Week)]
    time_window: TimeWindow,

    /// Target unique posts per subreddit
    #[arg(long, default_value_t = 25)]
    post_limit: usize,

    /// Comment sort used by the per-post comment endpoint
    #[arg(long, value_enum, default_value_t = CommentSort::Top)]
    comment_sort: CommentSort,

    /// Hard cap on flattened comments per post (safety)
    #[arg(long, default_value_t = 2000)]
    max_comments_per_post: usize,

    /// Max reply depth to traverse (safety)
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Min seconds between requests
    #[arg(long, default_value_t = 3.0)]
    min_sleep: f64,

    /// Max seconds between requests
    #[arg(long, default_value_t = 8.0)]
    max_sleep: f64,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Posts output (.csv, .jsonl or .ndjson)
    #[arg(long, default_value = "reddit_posts.csv")]
    posts_out: PathBuf,

    /// Comments output (.csv, .jsonl or .ndjson)
    #[arg(long, default_value = "reddit_comments.csv")]
    comments_out: PathBuf,

    /// Override the default browser User-Agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Parallel lanes for per-post comment fetches (1 = strictly sequential)
    #[arg(long, default_value_t = 1)]
    comment_lanes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_once();

    let user_agent = cli.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
    let fetcher = HttpFetcher::new(&user_agent, Duration::from_secs(cli.timeout.max(1)))?;

    let harvest = Harvester::new()
        .sort(cli.sort)
        .time_window(cli.time_window)
        .post_limit(cli.post_limit)
        .comment_sort(cli.comment_sort)
        .max_comments_per_post(cli.max_comments_per_post)
        .max_depth(cli.max_depth)
        .sleep_bounds(cli.min_sleep, cli.max_sleep)
        .timeout_secs(cli.timeout)
        .user_agent(user_agent)
        .comment_lanes(cli.comment_lanes)
        .run_with(&fetcher, &cli.subs)?;

    for (source, skipped) in &harvest.diagnostics.skipped_placeholders {
        if *skipped > 0 {
            tracing::info!(source = %source, skipped = *skipped, "'more replies' placeholders not followed");
        }
    }

    let mut sink = FileSink::new(&cli.posts_out, &cli.comments_out);
    sink.persist(&harvest.posts, &harvest.comments)?;

    println!(
        "Saved {} unique posts to {}",
        harvest.posts.len(),
        cli.posts_out.display()
    );
    println!(
        "Saved {} unique comments to {}",
        harvest.comments.len(),
        cli.comments_out.display()
    );
    Ok(())
}
