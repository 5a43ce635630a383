use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::error::StoreAction;
use crate::model::{Draft, Record, RecordId};
use crate::{targets, Error};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// Remote collection of records. Every call is a single request with no retry.
pub trait RecordStore: Send + Sync {
    fn list(&self) -> StoreFuture<'_, Vec<Record>>;
    fn create(&self, draft: Draft) -> StoreFuture<'_, Record>;
    fn update(&self, id: RecordId, draft: Draft) -> StoreFuture<'_, Record>;
    fn delete(&self, id: RecordId) -> StoreFuture<'_, ()>;
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub collection_url: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    http: reqwest::Client,
    collection_url: Url,
}

impl HttpRecordStore {
    pub fn new(config: StoreConfig) -> Result<Self, Error> {
        let raw = config.collection_url.trim().trim_end_matches('/').to_string();
        let collection_url = Url::parse(&raw).map_err(|error| Error::InvalidUrl {
            url: raw.clone(),
            details: error.to_string(),
        })?;
        if collection_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: raw,
                details: "URL cannot carry a record path".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|error| Error::InvalidUrl {
            url: raw,
            details: format!("HTTP client build failed: {error}"),
        })?;

        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn record_url(&self, id: &RecordId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    async fn send(
        &self,
        action: StoreAction,
        method: Method,
        url: Url,
        body: Option<&Draft>,
    ) -> Result<reqwest::Response, Error> {
        let label = url.to_string();
        debug!(target: targets::STORE, action = %action, method = %method, url = %label, "Store request");
        if let Some(draft) = body {
            trace!(target: targets::STORE, action = %action, body = ?draft, "Store request body");
        }

        let mut request = self.http.request(method, url);
        if let Some(draft) = body {
            request = request.json(draft);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(target: targets::STORE, action = %action, url = %label, error = %source, "Store request failed");
                return Err(Error::Transport {
                    action,
                    url: label,
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(target: targets::STORE, action = %action, url = %label, status = status.as_u16(), "Store returned error status");
            return Err(Error::Status {
                action,
                url: label,
                status: status.as_u16(),
            });
        }

        debug!(target: targets::STORE, action = %action, url = %label, status = status.as_u16(), "Store request ok");
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        action: StoreAction,
        method: Method,
        url: Url,
        body: Option<&Draft>,
    ) -> Result<T, Error> {
        let label = url.to_string();
        let response = self.send(action, method, url, body).await?;
        response.json::<T>().await.map_err(|source| {
            warn!(target: targets::STORE, action = %action, url = %label, error = %source, "Store response decode failed");
            Error::Decode {
                action,
                url: label,
                source,
            }
        })
    }
}

impl RecordStore for HttpRecordStore {
    fn list(&self) -> StoreFuture<'_, Vec<Record>> {
        let url = self.collection_url.clone();
        Box::pin(async move {
            self.send_json(StoreAction::List, Method::GET, url, None)
                .await
        })
    }

    fn create(&self, draft: Draft) -> StoreFuture<'_, Record> {
        let url = self.collection_url.clone();
        Box::pin(async move {
            self.send_json(StoreAction::Create, Method::POST, url, Some(&draft))
                .await
        })
    }

    fn update(&self, id: RecordId, draft: Draft) -> StoreFuture<'_, Record> {
        let url = self.record_url(&id);
        Box::pin(async move {
            self.send_json(StoreAction::Update, Method::PUT, url, Some(&draft))
                .await
        })
    }

    fn delete(&self, id: RecordId) -> StoreFuture<'_, ()> {
        let url = self.record_url(&id);
        Box::pin(async move {
            self.send(StoreAction::Delete, Method::DELETE, url, None)
                .await
                .map(|_| ())
        })
    }
}

/// One call observed by [`MockRecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Create(Draft),
    Update(RecordId, Draft),
    Delete(RecordId),
}

#[derive(Debug)]
pub enum MockReply {
    Records(Vec<Record>),
    Record(Record),
    Deleted,
    Failure(Error),
}

/// Scripted store: replies are consumed in order, calls are journaled.
#[derive(Debug, Clone, Default)]
pub struct MockRecordStore {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_records(&self, records: Vec<Record>) {
        self.push_reply(MockReply::Records(records));
    }

    pub fn push_record(&self, record: Record) {
        self.push_reply(MockReply::Record(record));
    }

    pub fn push_deleted(&self) {
        self.push_reply(MockReply::Deleted);
    }

    pub fn push_error(&self, error: Error) {
        self.push_reply(MockReply::Failure(error));
    }

    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        if let Ok(calls) = self.calls.lock() {
            return calls.clone();
        }
        Vec::new()
    }

    fn next_reply(&self, call: StoreCall) -> Option<MockReply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if let Ok(mut replies) = self.replies.lock() {
            return replies.pop_front();
        }
        None
    }
}

fn unexpected(action: StoreAction, reply: Option<MockReply>) -> Error {
    match reply {
        Some(MockReply::Failure(error)) => error,
        Some(other) => Error::Store {
            action,
            details: format!("MockRecordStore reply does not fit {action}: {other:?}"),
        },
        None => Error::Store {
            action,
            details: "MockRecordStore queue is empty".to_string(),
        },
    }
}

impl RecordStore for MockRecordStore {
    fn list(&self) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            match self.next_reply(StoreCall::List) {
                Some(MockReply::Records(records)) => Ok(records),
                other => Err(unexpected(StoreAction::List, other)),
            }
        })
    }

    fn create(&self, draft: Draft) -> StoreFuture<'_, Record> {
        Box::pin(async move {
            match self.next_reply(StoreCall::Create(draft)) {
                Some(MockReply::Record(record)) => Ok(record),
                other => Err(unexpected(StoreAction::Create, other)),
            }
        })
    }

    fn update(&self, id: RecordId, draft: Draft) -> StoreFuture<'_, Record> {
        Box::pin(async move {
            match self.next_reply(StoreCall::Update(id, draft)) {
                Some(MockReply::Record(record)) => Ok(record),
                other => Err(unexpected(StoreAction::Update, other)),
            }
        })
    }

    fn delete(&self, id: RecordId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            match self.next_reply(StoreCall::Delete(id)) {
                Some(MockReply::Deleted) => Ok(()),
                other => Err(unexpected(StoreAction::Delete, other)),
            }
        })
    }
}

#[cfg(test)]
pub(crate) fn run_future<T>(future: impl Future<Output = T>) -> T {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");
    runtime.block_on(future)
}
