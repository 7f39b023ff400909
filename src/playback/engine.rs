use crate::error::PlayerResult;
use crate::hardware::LineSink;
use crate::input::{LogBuffer, LogSource};
use crate::playback::session::Session;
use crate::playback::{buffered, streaming};
use crate::playback::{PlaybackConfig, PlaybackReport, StopSignal, Window};
use tokio::io::{AsyncRead, AsyncSeek};
use tracing::info;

/// Drives one playback run against a sink
pub struct PlaybackEngine {
    config: PlaybackConfig,
    window: Window,
    stop: StopSignal,
}

impl PlaybackEngine {
    /// Create an engine, validating the line window
    pub fn new(config: PlaybackConfig) -> PlayerResult<Self> {
        let window = config.window()?;
        Ok(Self {
            config,
            window,
            stop: StopSignal::new(),
        })
    }

    /// Handle that ends playback at the next line boundary when triggered
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Play whichever source was opened for the configured mode
    pub async fn play(&self, source: LogSource, sink: &mut dyn LineSink) -> PlaybackReport {
        match source {
            LogSource::Buffered(buffer) => self.play_buffer(&buffer, sink).await,
            LogSource::Streaming(mut file) => self.play_stream(&mut file, sink).await,
        }
    }

    /// Buffered playback over an already loaded log
    pub async fn play_buffer(&self, buffer: &LogBuffer, sink: &mut dyn LineSink) -> PlaybackReport {
        info!("Playing {} bytes from memory to {}", buffer.len(), sink.name());
        let mut session = self.session(sink);
        let outcome = buffered::run(buffer, &self.config, self.window, &mut session).await;
        session.finish(outcome)
    }

    /// Streaming playback over a seekable byte source
    pub async fn play_stream<R>(&self, source: &mut R, sink: &mut dyn LineSink) -> PlaybackReport
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        info!("Streaming log byte by byte to {}", sink.name());
        let mut session = self.session(sink);
        let outcome = streaming::run(source, &self.config, self.window, &mut session).await;
        session.finish(outcome)
    }

    fn session<'a>(&'a self, sink: &'a mut dyn LineSink) -> Session<'a> {
        Session::new(sink, &self.stop, self.config.pause, self.config.show_progress)
    }
}
