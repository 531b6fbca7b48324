// Persistence sink for accepted notes
//
// The dialogue core only supplies `AtomicNote.raw`; everything else about
// the storage format belongs to the sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::article::Article;
use crate::notes::AtomicNote;

/// Destination for accepted notes.
pub trait NoteSink {
    fn append(&mut self, notes: &[AtomicNote], article: &Article) -> Result<()>;
}

/// Appends notes to a markdown file under a dated source header.
pub struct MarkdownSink {
    path: PathBuf,
}

impl MarkdownSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NoteSink for MarkdownSink {
    fn append(&mut self, notes: &[AtomicNote], article: &Article) -> Result<()> {
        if notes.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open note file {}", self.path.display()))?;

        let date = chrono::Local::now().format("%Y-%m-%d");
        writeln!(
            file,
            "\n---\n\nFrom [{}]({}) on {date}\n",
            article.title, article.url
        )?;
        for note in notes {
            writeln!(file, "{}\n", note.raw)?;
        }

        tracing::info!(
            notes = notes.len(),
            path = %self.path.display(),
            "appended notes"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> Article {
        Article {
            title: "On Focus".to_string(),
            content: String::new(),
            url: "https://example.com/focus".to_string(),
            site_name: None,
            excerpt: None,
        }
    }

    fn note(raw: &str) -> AtomicNote {
        AtomicNote {
            heading: "h".to_string(),
            content: "c".to_string(),
            has_link: false,
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_append_writes_raw_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut sink = MarkdownSink::new(&path);

        sink.append(&[note("## One\n\nBody one.")], &article()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## One\n\nBody one."));
        assert!(written.contains("[On Focus](https://example.com/focus)"));
    }

    #[test]
    fn test_append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut sink = MarkdownSink::new(&path);

        sink.append(&[note("## First")], &article()).unwrap();
        sink.append(&[note("## Second")], &article()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## First"));
        assert!(written.contains("## Second"));
    }

    #[test]
    fn test_empty_notes_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut sink = MarkdownSink::new(&path);

        sink.append(&[], &article()).unwrap();
        assert!(!path.exists());
    }
}
