pub mod line;

pub use line::{LineRecord, BUFFERED_MAX_LINE, CRLF, LF, STREAMING_MAX_LINE};
