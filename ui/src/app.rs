use std::sync::Arc;
use std::time::Duration;

use iced::{Application, Command, Element, Subscription, Theme};
use studentdesk_core::{
    targets, ConsoleLevel, LoadOutcome, RecordId, RecordManager, RecordStore, Submission,
};

use crate::logging::{apply_log_level, LogEntry, LogStore, ReloadHandle};

mod helpers;
mod styles;
mod types;
mod views;

pub use types::{Flags, Message, StoreErrorInfo, Tab};
use types::Notice;

pub struct StudentDeskApp {
    store: Arc<dyn RecordStore>,
    manager: RecordManager,
    collection_url: String,
    pending_delete: Option<RecordId>,
    notice: Option<Notice>,
    active_tab: Tab,
    log_store: LogStore,
    reload_handle: ReloadHandle,
    log_entries: Vec<LogEntry>,
    log_level: Option<ConsoleLevel>,
    copy_status: Option<String>,
}

impl Application for StudentDeskApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Flags;

    fn new(flags: Flags) -> (Self, Command<Message>) {
        let mut app = Self {
            store: flags.store,
            manager: RecordManager::new(flags.config.schema()),
            collection_url: flags.config.collection_url.clone(),
            pending_delete: None,
            notice: flags.startup_notice.map(Notice::error),
            active_tab: Tab::Records,
            log_store: flags.log_store,
            reload_handle: flags.reload_handle,
            log_entries: Vec::new(),
            log_level: flags.log_level,
            copy_status: None,
        };

        tracing::info!(
            target: targets::UI,
            schema = %app.manager.schema().name,
            url = %app.collection_url,
            "Record manager mounted"
        );
        let command = app.refresh();
        (app, command)
    }

    fn title(&self) -> String {
        format!("Student Desk - {}", self.manager.schema().name)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::SelectTab(tab) => {
                self.active_tab = tab;
                if tab == Tab::Diagnostics {
                    self.refresh_logs();
                }
                Command::none()
            }
            Message::FieldChanged { field, value } => {
                self.manager.set_field(&field, value);
                Command::none()
            }
            Message::Submit => self.submit(),
            Message::CancelEdit => {
                self.manager.cancel_edit();
                Command::none()
            }
            Message::Refresh => self.refresh(),
            Message::Loaded { ticket, result } => {
                match self.manager.finish_load(ticket, result) {
                    Ok(LoadOutcome::Applied { .. }) => {}
                    Ok(LoadOutcome::Stale) => {
                        self.notice = Some(Notice::info(
                            "Dữ liệu đã thay đổi trong lúc tải, hãy làm mới lại.",
                        ));
                    }
                    Err(error) => self.notice = Some(Notice::error(error.summary)),
                }
                Command::none()
            }
            Message::Created(result) => {
                if let Err(error) = self.manager.finish_create(result) {
                    self.notice = Some(Notice::error(error.summary));
                }
                Command::none()
            }
            Message::Updated { id, result } => {
                if let Err(error) = self.manager.finish_update(&id, result) {
                    self.notice = Some(Notice::error(error.summary));
                }
                Command::none()
            }
            Message::EditRecord(id) => {
                self.manager.begin_edit_by_id(&id);
                Command::none()
            }
            Message::DeleteRequested(id) => {
                self.pending_delete = Some(id);
                Command::none()
            }
            Message::DeleteConfirmed => self.delete_pending(),
            Message::DeleteDeclined => {
                if let Some(id) = self.pending_delete.take() {
                    tracing::info!(target: targets::UI, id = %id, "Delete declined");
                }
                Command::none()
            }
            Message::Deleted { id, result } => {
                if let Err(error) = self.manager.finish_delete(&id, result) {
                    self.notice = Some(Notice::error(error.summary));
                }
                Command::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Command::none()
            }
            Message::LogTick => {
                self.refresh_logs();
                Command::none()
            }
            Message::LogLevelChanged(level) => {
                self.log_level = Some(level);
                apply_log_level(&self.reload_handle, level);
                tracing::info!(target: targets::UI, "Log level set to {}", level);
                Command::none()
            }
            Message::CopyDiagnostics => {
                self.copy_status = Some(self.copy_diagnostics());
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.active_tab == Tab::Diagnostics {
            iced::time::every(Duration::from_millis(250)).map(|_| Message::LogTick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.root_view()
    }
}

impl StudentDeskApp {
    /// Issues a full reload unless one is already running.
    fn refresh(&mut self) -> Command<Message> {
        if self.manager.is_loading() {
            return Command::none();
        }

        let ticket = self.manager.start_load();
        let store = Arc::clone(&self.store);
        Command::perform(
            async move { store.list().await.map_err(StoreErrorInfo::from) },
            move |result| Message::Loaded { ticket, result },
        )
    }

    fn submit(&mut self) -> Command<Message> {
        let submission = match self.manager.submit() {
            Ok(submission) => submission,
            Err(error) => {
                tracing::debug!(target: targets::UI, error = %error, "Submit rejected");
                self.notice = Some(Notice::error(error.user_summary()));
                return Command::none();
            }
        };

        let store = Arc::clone(&self.store);
        match submission {
            Submission::Create(draft) => Command::perform(
                async move { store.create(draft).await.map_err(StoreErrorInfo::from) },
                Message::Created,
            ),
            Submission::Update { id, draft } => {
                let target = id.clone();
                Command::perform(
                    async move { store.update(target, draft).await.map_err(StoreErrorInfo::from) },
                    move |result| Message::Updated {
                        id: id.clone(),
                        result,
                    },
                )
            }
        }
    }

    fn delete_pending(&mut self) -> Command<Message> {
        let Some(id) = self.pending_delete.take() else {
            return Command::none();
        };

        let store = Arc::clone(&self.store);
        let target = id.clone();
        Command::perform(
            async move { store.delete(target).await.map_err(StoreErrorInfo::from) },
            move |result| Message::Deleted {
                id: id.clone(),
                result,
            },
        )
    }

    fn refresh_logs(&mut self) {
        self.log_entries = self.log_store.snapshot();
    }

    fn copy_diagnostics(&self) -> String {
        let text = self.diagnostics_text();
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                tracing::info!(target: targets::UI, "Diagnostics copied to clipboard");
                "Đã sao chép".to_string()
            }
            Err(error) => {
                tracing::warn!(target: targets::UI, "Clipboard copy failed: {}", error);
                format!("Lỗi: {error}")
            }
        }
    }

    fn diagnostics_text(&self) -> String {
        let mut lines = vec![
            "Student Desk diagnostics".to_string(),
            format!("Collection: {}", self.collection_url),
            format!("Schema: {}", self.manager.schema().name),
            format!("Records cached: {}", self.manager.records().len()),
            format!("Loading: {}", self.manager.is_loading()),
            format!(
                "Editing: {}",
                self.manager
                    .cursor()
                    .editing()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "none".to_string())
            ),
            format!(
                "Log level: {}",
                self.log_level
                    .map(|level| level.to_string())
                    .unwrap_or_else(|| "RUST_LOG".to_string())
            ),
            "Recent logs:".to_string(),
        ];

        let start = self.log_entries.len().saturating_sub(50);
        lines.extend(self.log_entries[start..].iter().map(LogEntry::format_line));
        lines.join("\n")
    }
}
