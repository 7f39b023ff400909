use async_trait::async_trait;
use crate::hardware::line_sink::{LineSink, SinkResult};
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

/// Writes lines to standard output instead of a device
pub struct ConsoleSink<W = Stdout> {
    out: W,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<W: AsyncWrite + Unpin + Send> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> LineSink for ConsoleSink<W> {
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()> {
        self.out.write_all(line).await?;
        self.out.flush().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
