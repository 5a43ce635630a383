use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("Invalid collection URL: {url}")]
    InvalidUrl { url: String, details: String },
    #[error("Store {action} request failed for {url}")]
    Transport {
        action: StoreAction,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Store {action} returned HTTP {status} for {url}")]
    Status {
        action: StoreAction,
        url: String,
        status: u16,
    },
    #[error("Store {action} response could not be decoded for {url}")]
    Decode {
        action: StoreAction,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Store {action} failure")]
    Store { action: StoreAction, details: String },
    #[error("Config read error")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Config RON error")]
    ConfigRon {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreAction::List => f.write_str("list"),
            StoreAction::Create => f.write_str("create"),
            StoreAction::Update => f.write_str("update"),
            StoreAction::Delete => f.write_str("delete"),
        }
    }
}

impl StoreAction {
    /// Notification shown to the user when this action fails, whatever the cause.
    pub fn failure_notice(self) -> &'static str {
        match self {
            StoreAction::List => "Lỗi khi tải dữ liệu",
            StoreAction::Create => "Lỗi khi tạo mục mới",
            StoreAction::Update => "Lỗi khi cập nhật",
            StoreAction::Delete => "Lỗi khi xóa",
        }
    }
}

impl Error {
    pub fn user_summary(&self) -> String {
        match self {
            Error::Validation { missing } => {
                format!("Vui lòng nhập {}", missing.join(", "))
            }
            Error::InvalidUrl { url, .. } => {
                format!("Địa chỉ dữ liệu không hợp lệ: {url}")
            }
            Error::Transport { action, .. }
            | Error::Status { action, .. }
            | Error::Decode { action, .. }
            | Error::Store { action, .. } => action.failure_notice().to_string(),
            Error::ConfigIo { path, .. } | Error::ConfigRon { path, .. } => {
                format!("Không đọc được cấu hình {path}")
            }
        }
    }

    pub fn technical_detail(&self) -> String {
        match self {
            Error::Validation { missing } => {
                format!("Validation failed, missing: {}.", missing.join(", "))
            }
            Error::InvalidUrl { url, details } => {
                format!("Invalid URL {url}: {details}")
            }
            Error::Transport {
                action,
                url,
                source,
            } => format!("Transport error on {action} {url}: {source}"),
            Error::Status {
                action,
                url,
                status,
            } => format!("HTTP {status} on {action} {url}."),
            Error::Decode {
                action,
                url,
                source,
            } => format!("Decode error on {action} {url}: {source}"),
            Error::Store { action, details } => {
                format!("Store {action} failure: {details}")
            }
            Error::ConfigIo { path, source } => {
                format!("Config read error. path={path}. {source}")
            }
            Error::ConfigRon { path, source } => {
                format!("Config RON error. path={path}. {source}")
            }
        }
    }
}
