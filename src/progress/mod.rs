//! Progress reporting for pipeline runs

mod handler;
mod logging;

pub use handler::{Category, NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
