pub mod console;
pub mod echo;
pub mod line_sink;
#[cfg(test)]
pub mod mock;
pub mod serial;

pub use console::ConsoleSink;
pub use echo::EchoSink;
pub use line_sink::LineSink;
#[cfg(test)]
pub use mock::RecorderSink;
pub use serial::SerialSink;
