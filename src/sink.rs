//! Record sink: persists the canonical post/comment sequences as CSV (one
//! record per row, column order fixed by `model::POST_FIELDS` /
//! `model::COMMENT_FIELDS`) or NDJSON, chosen per output path extension.

use crate::model::{Comment, Post, COMMENT_FIELDS, POST_FIELDS};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait RecordSink {
    fn persist(&mut self, posts: &[Post], comments: &[Comment]) -> Result<()>;
}

/// Writes posts and comments to two files. `.jsonl`/`.ndjson` extensions get
/// newline-delimited JSON; everything else gets CSV with a header row.
pub struct FileSink {
    posts_out: PathBuf,
    comments_out: PathBuf,
}

impl FileSink {
    pub fn new(posts_out: impl Into<PathBuf>, comments_out: impl Into<PathBuf>) -> Self {
        Self { posts_out: posts_out.into(), comments_out: comments_out.into() }
    }
}

impl RecordSink for FileSink {
    fn persist(&mut self, posts: &[Post], comments: &[Comment]) -> Result<()> {
        write_table(&self.posts_out, POST_FIELDS, posts)?;
        write_table(&self.comments_out, COMMENT_FIELDS, comments)?;
        Ok(())
    }
}

fn is_ndjson(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("jsonl") | Some("ndjson")
    )
}

fn write_table<T: Serialize>(path: &Path, fields: &[&str], rows: &[T]) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);

    if is_ndjson(path) {
        for row in rows {
            serde_json::to_writer(&mut w, row)?;
            w.write_all(b"\n")?;
        }
    } else {
        write_csv_row(&mut w, fields.iter().map(|s| s.to_string()))?;
        for row in rows {
            let v = serde_json::to_value(row)?;
            write_csv_row(&mut w, fields.iter().map(|field| csv_cell(v.get(*field))))?;
        }
    }

    w.flush().with_context(|| format!("flush {}", path.display()))
}

fn write_csv_row<W: Write>(w: &mut W, cells: impl Iterator<Item = String>) -> Result<()> {
    let mut first = true;
    for cell in cells {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        w.write_all(cell.as_bytes())?;
    }
    w.write_all(b"\r\n")?;
    Ok(())
}

/// Null fields serialize as empty cells; booleans as `true`/`false`.
fn csv_cell(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => csv_escape(s),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => csv_escape(&other.to_string()),
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
        out
    } else {
        s.to_string()
    }
}
