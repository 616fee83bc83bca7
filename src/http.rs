//! Blocking HTTP implementation of `PageFetcher` against the public
//! listing/comment JSON endpoints. All recoverable conditions (403/429,
//! transport failures, non-JSON bodies) surface as soft-stop outcomes, never
//! as errors; the only `Err` here is failing to build the client itself.

use crate::config::{CommentSort, ListingSort, TimeWindow};
use crate::fetch::{Fetched, PageFetcher, RawPage, RawThread};
use crate::util::WWW_BASE;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json,text/plain,*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("dnt", HeaderValue::from_static("1"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Fetched<Value>> {
        let resp = match self.client.get(url).query(query).send() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(url, error = %e, "request failed (treated as soft stop)");
                return Ok(Fetched::Blocked);
            }
        };
        let status = resp.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url, status = status.as_u16(), "blocked/rate-limited");
            return Ok(Fetched::Blocked);
        }
        match resp.json::<Value>() {
            Ok(v) => Ok(Fetched::Payload(v)),
            Err(_) => Ok(Fetched::Unparsable),
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn listing_page(
        &self,
        source: &str,
        sort: ListingSort,
        time_window: TimeWindow,
        cursor: Option<&str>,
        offset: u64,
    ) -> Result<Fetched<RawPage>> {
        let url = format!("{WWW_BASE}/r/{source}/{}.json", sort.as_str());
        let mut query: Vec<(&str, String)> = vec![
            ("raw_json", "1".to_string()),
            ("limit", "100".to_string()),
            ("t", time_window.as_str().to_string()),
        ];
        if let Some(after) = cursor {
            query.push(("after", after.to_string()));
            query.push(("count", offset.to_string()));
        }

        let payload = match self.get_json(&url, &query)? {
            Fetched::Payload(v) => v,
            Fetched::Blocked => return Ok(Fetched::Blocked),
            Fetched::Unparsable => return Ok(Fetched::Unparsable),
        };

        let data = payload.get("data");
        let children = data
            .and_then(|d| d.get("children"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let after = data
            .and_then(|d| d.get("after"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Fetched::Payload(RawPage { children, after }))
    }

    fn comment_page(&self, post_id: &str, sort: CommentSort) -> Result<Fetched<RawThread>> {
        let url = format!("{WWW_BASE}/comments/{post_id}.json");
        let query: Vec<(&str, String)> = vec![
            ("raw_json", "1".to_string()),
            ("sort", sort.as_str().to_string()),
            ("limit", "500".to_string()),
        ];

        let payload = match self.get_json(&url, &query)? {
            Fetched::Payload(v) => v,
            Fetched::Blocked => return Ok(Fetched::Blocked),
            Fetched::Unparsable => return Ok(Fetched::Unparsable),
        };

        // The endpoint returns a two-element array: [post listing, comment
        // listing]. Anything else yields an empty thread.
        let children = payload
            .as_array()
            .and_then(|a| a.get(1))
            .and_then(|listing| listing.get("data"))
            .and_then(|d| d.get("children"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Fetched::Payload(RawThread { children }))
    }
}
