use async_trait::async_trait;
use crate::hardware::line_sink::{LineSink, SinkResult};
use std::io::Write;
use tracing::warn;

/// Verbose decorator: echoes every successfully sent line
///
/// A failed echo is logged and does not fail the send.
pub struct EchoSink<S, W = std::io::Stdout> {
    inner: S,
    out: W,
}

impl<S: LineSink> EchoSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            out: std::io::stdout(),
        }
    }
}

#[cfg(test)]
impl<S: LineSink, W: Write + Send> EchoSink<S, W> {
    pub fn with_writer(inner: S, out: W) -> Self {
        Self { inner, out }
    }

    pub fn into_parts(self) -> (S, W) {
        (self.inner, self.out)
    }
}

#[async_trait]
impl<S: LineSink, W: Write + Send> LineSink for EchoSink<S, W> {
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()> {
        self.inner.send_line(line).await?;

        let text = String::from_utf8_lossy(line);
        if let Err(e) = writeln!(self.out, "\n{}", text.trim_end_matches(['\r', '\n'])) {
            warn!("Failed to echo line: {}", e);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
