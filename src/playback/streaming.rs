use crate::core::LF;
use crate::error::PlayerError;
use crate::input::{ByteEvent, StreamState};
use crate::playback::session::Session;
use crate::playback::{PlaybackConfig, PlaybackOutcome, Window};
use std::io::SeekFrom;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tracing::{debug, warn};

/// Seek back to the start and measure the current source length
async fn rewind<R>(source: &mut R) -> std::io::Result<u64>
where
    R: AsyncSeek + Unpin,
{
    let size = source.seek(SeekFrom::End(0)).await?;
    source.seek(SeekFrom::Start(0)).await?;
    Ok(size)
}

/// Play a log by reading it one byte at a time
///
/// Only a line feed completes a line; empty lines are counted but not
/// sent, and sent lines keep their trailing `\n`. The line counter starts
/// over on every restart so each pass replays the same window. The source
/// length is measured again on each restart, which picks up appended data.
pub(crate) async fn run<R>(
    source: &mut R,
    config: &PlaybackConfig,
    window: Window,
    session: &mut Session<'_>,
) -> PlaybackOutcome
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
{
    let mut state = StreamState::new(config.max_line);
    let mut size = match rewind(source).await {
        Ok(size) => size,
        Err(e) => return PlaybackOutcome::DeviceError(PlayerError::PlaybackRead(e)),
    };
    debug!("Streaming playback: {} bytes, window {:?}", size, window);

    let mut byte = [0u8; 1];

    loop {
        if session.interrupted() {
            return PlaybackOutcome::Interrupted;
        }

        if state.bytes_processed() >= size {
            let sent = session.complete_pass();
            if config.once {
                return PlaybackOutcome::Completed;
            }
            if sent == 0 {
                tokio::time::sleep(config.poll_interval).await;
            }
            size = match rewind(source).await {
                Ok(size) => size,
                Err(e) => return PlaybackOutcome::DeviceError(PlayerError::PlaybackRead(e)),
            };
            state.restart();
            continue;
        }

        match source.read(&mut byte).await {
            Ok(0) => {
                debug!(
                    "Read returned no data at offset {} of {}, restarting",
                    state.bytes_processed(),
                    size
                );
                session.abandon_pass();
                tokio::time::sleep(config.poll_interval).await;
                size = match rewind(source).await {
                    Ok(size) => size,
                    Err(e) => return PlaybackOutcome::DeviceError(PlayerError::PlaybackRead(e)),
                };
                state.restart();
                continue;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return PlaybackOutcome::DeviceError(PlayerError::PlaybackRead(e)),
        }

        if state.feed(byte[0]) != ByteEvent::LineComplete {
            continue;
        }

        let line_number = state.current_line_number();
        if !state.line().is_empty() && line_number >= window.start() {
            if state.line().is_truncated() {
                warn!(
                    "Line {} exceeds {} bytes and was truncated",
                    line_number,
                    state.line().max_len()
                );
            }
            if let Err(e) = session.transmit(&state.line().to_wire(LF)).await {
                return PlaybackOutcome::DeviceError(e);
            }
        }

        let count = state.finish_line();
        session.progress(count, None);

        if window.is_exhausted_by(count) {
            session.complete_pass();
            if config.once {
                return PlaybackOutcome::Completed;
            }
            size = match rewind(source).await {
                Ok(size) => size,
                Err(e) => return PlaybackOutcome::DeviceError(PlayerError::PlaybackRead(e)),
            };
            state.restart();
        }
    }
}
