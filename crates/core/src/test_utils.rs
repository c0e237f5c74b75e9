//! Test utilities for lightai-core crate
//!
//! Helpers for asserting on emitted log events without a global subscriber.

use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Drives `fut` to completion on the current thread with a subscriber that
/// records every event, returning the output together with the captured logs.
pub fn capture_logs<F: Future>(fut: F) -> (F::Output, String) {
    let capture = LogCapture::start();
    let output = futures::executor::block_on(fut);
    (output, capture.logs())
}

/// Records events on the current thread for as long as it is alive.
///
/// Use this from a current-thread `#[tokio::test]` when the code under test
/// needs the tokio runtime, e.g. a real HTTP client.
pub struct LogCapture {
    buffer: SharedBuffer,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn start() -> Self {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        Self {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    /// # Panics
    /// Panics if the captured logs are not valid UTF-8.
    pub fn logs(&self) -> String {
        String::from_utf8(self.buffer.0.lock().unwrap().clone()).unwrap()
    }
}

/// Counts captured log lines at the given level, e.g. `"WARN"`.
pub fn count_level(logs: &str, level: &str) -> usize {
    logs.lines()
        .filter(|line| line.trim_start().starts_with(level))
        .count()
}
