//! Upload progress accounting.
//!
//! The file body is sent as a stream of fixed-size chunks; each chunk
//! advances a [`ProgressReporter`], which forwards whole-percent changes to
//! the caller's callback.

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::types::ProgressCallback;

/// Size of each body chunk sent to the service.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Tracks bytes sent and reports percentage changes.
pub struct ProgressReporter {
    total: u64,
    sent: u64,
    last: Option<u8>,
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    /// Create a reporter for a body of `total` bytes.
    pub fn new(total: u64, callback: Option<ProgressCallback>) -> Self {
        Self {
            total,
            sent: 0,
            last: None,
            callback,
        }
    }

    /// Current percentage. An empty body counts as complete.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.sent.min(self.total) * 100 / self.total;
        u8::try_from(pct).unwrap_or(100)
    }

    /// Record `bytes` more as sent; notifies the callback if the percentage moved.
    pub fn advance(&mut self, bytes: usize) {
        self.sent = self.sent.saturating_add(bytes as u64);
        self.emit();
    }

    /// Notify the callback of the current percentage if it changed.
    pub fn emit(&mut self) {
        let pct = self.percent();
        if self.last == Some(pct) {
            return;
        }
        self.last = Some(pct);
        if let Some(cb) = &self.callback {
            cb(pct);
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("total", &self.total)
            .field("sent", &self.sent)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

/// Split `data` into chunks and report progress as each chunk is polled.
pub fn progress_stream(
    data: Bytes,
    callback: Option<ProgressCallback>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let total = data.len();
    let mut reporter = ProgressReporter::new(total as u64, callback);
    if total == 0 {
        reporter.emit();
    }

    let chunks: Vec<Bytes> = (0..total)
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(total)))
        .collect();

    futures::stream::iter(chunks).map(move |chunk| {
        reporter.advance(chunk.len());
        Ok(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
        (cb, seen)
    }

    #[test]
    fn test_reporter_only_emits_changes() {
        let (cb, seen) = recorder();
        let mut reporter = ProgressReporter::new(1000, Some(cb));
        reporter.advance(1);
        reporter.advance(1);
        reporter.advance(8);
        reporter.advance(490);
        reporter.advance(500);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 50, 100]);
    }

    #[test]
    fn test_reporter_never_exceeds_hundred() {
        let mut reporter = ProgressReporter::new(10, None);
        reporter.advance(50);
        assert_eq!(reporter.percent(), 100);
    }

    #[tokio::test]
    async fn test_stream_reports_up_to_hundred() {
        let (cb, seen) = recorder();
        let data = Bytes::from(vec![7_u8; CHUNK_SIZE * 3 + 10]);
        let chunks: Vec<_> = progress_stream(data.clone(), Some(cb)).collect().await;

        assert_eq!(chunks.len(), 4);
        let total: usize = chunks.iter().map(|c| c.as_ref().unwrap().len()).sum();
        assert_eq!(total, data.len());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_empty_body_reports_complete() {
        let (cb, seen) = recorder();
        let chunks: Vec<_> = progress_stream(Bytes::new(), Some(cb)).collect().await;
        assert!(chunks.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }
}
