pub mod config;
pub mod controller;
pub mod error;
pub mod manager;
pub mod model;
pub mod schema;
pub mod store;
pub mod targets;

pub use config::{
    AppConfig, ConsoleLevel, CONFIG_PATH_ENV, DEFAULT_COLLECTION_URL, DEFAULT_CONFIG_PATH,
};
pub use controller::{Controller, Prompter, CONFIRM_DELETE};
pub use error::{Error, StoreAction};
pub use manager::{EditCursor, LoadOutcome, LoadTicket, RecordManager, Submission};
pub use model::{Draft, Record, RecordId};
pub use schema::{FieldKind, FieldSpec, Revision, Schema};
pub use store::{
    HttpRecordStore, MockRecordStore, MockReply, RecordStore, StoreCall, StoreConfig, StoreFuture,
};
