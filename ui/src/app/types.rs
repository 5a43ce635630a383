use std::fmt;
use std::sync::Arc;

use studentdesk_core::{AppConfig, ConsoleLevel, Error, LoadTicket, Record, RecordId, RecordStore};

use crate::logging::{LogStore, ReloadHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Records,
    Diagnostics,
}

#[derive(Debug, Clone)]
pub enum Message {
    SelectTab(Tab),
    FieldChanged { field: String, value: String },
    Submit,
    CancelEdit,
    Refresh,
    Loaded {
        ticket: LoadTicket,
        result: Result<Vec<Record>, StoreErrorInfo>,
    },
    Created(Result<Record, StoreErrorInfo>),
    Updated {
        id: RecordId,
        result: Result<Record, StoreErrorInfo>,
    },
    EditRecord(RecordId),
    DeleteRequested(RecordId),
    DeleteConfirmed,
    DeleteDeclined,
    Deleted {
        id: RecordId,
        result: Result<(), StoreErrorInfo>,
    },
    DismissNotice,
    LogTick,
    LogLevelChanged(ConsoleLevel),
    CopyDiagnostics,
}

/// Cloneable summary of a store failure, carried back to the UI thread.
#[derive(Debug, Clone)]
pub struct StoreErrorInfo {
    pub(crate) summary: String,
    pub(crate) detail: String,
}

impl From<Error> for StoreErrorInfo {
    fn from(error: Error) -> Self {
        Self {
            summary: error.user_summary(),
            detail: error.technical_detail(),
        }
    }
}

impl fmt::Display for StoreErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeTone {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub(crate) tone: NoticeTone,
    pub(crate) text: String,
}

impl Notice {
    pub(crate) fn error(text: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Error,
            text: text.into(),
        }
    }

    pub(crate) fn info(text: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Info,
            text: text.into(),
        }
    }
}

pub struct Flags {
    pub config: AppConfig,
    pub store: Arc<dyn RecordStore>,
    pub log_store: LogStore,
    pub reload_handle: ReloadHandle,
    /// `None` when the startup filter came from `RUST_LOG`.
    pub log_level: Option<ConsoleLevel>,
    pub startup_notice: Option<String>,
}
