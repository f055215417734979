//! Progress reporting for resolution runs

mod console;
mod handler;
mod logging;

pub use console::ConsoleHandler;
pub use handler::{FanOutHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
