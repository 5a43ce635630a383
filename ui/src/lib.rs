pub mod app;
pub mod logging;

use iced::Application;

pub use app::{Flags, Message, StudentDeskApp};
pub use logging::{apply_log_level, init_logging, LogEntry, LogStore, LoggingHandle, ReloadHandle};

pub type UiResult = iced::Result;

pub fn run(flags: Flags) -> UiResult {
    StudentDeskApp::run(iced::Settings::with_flags(flags))
}
