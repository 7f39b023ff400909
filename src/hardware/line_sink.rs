use async_trait::async_trait;
use std::error::Error;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Destination for played-back lines
///
/// Implementations:
/// - Serial ports (the normal target)
/// - Standard output, for dry runs without hardware
/// - Recording sinks for tests
#[async_trait]
pub trait LineSink: Send {
    /// Transmit one fully formed, already terminated line verbatim
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()>;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        "line sink"
    }
}

#[async_trait]
impl<S: LineSink + ?Sized> LineSink for Box<S> {
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()> {
        (**self).send_line(line).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
