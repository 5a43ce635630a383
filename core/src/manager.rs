//! Local cache of the remote collection plus the form state that edits it.
//!
//! Every operation is split in two: a `start`/`submit` half that decides what
//! to ask the store for, and a `finish_*` half that applies the store's answer
//! in one step. The caller runs the request in between, so the manager never
//! holds state across an await point.

use std::fmt;

use tracing::{debug, info, warn};

use crate::model::{Draft, Record, RecordId};
use crate::schema::Schema;
use crate::{targets, Error};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditCursor {
    #[default]
    Create,
    Edit(RecordId),
}

impl EditCursor {
    pub fn editing(&self) -> Option<&RecordId> {
        match self {
            EditCursor::Create => None,
            EditCursor::Edit(id) => Some(id),
        }
    }
}

/// Issued by [`RecordManager::start_load`]; identifies one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    mutation_epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    Stale,
}

/// What the form's submit button should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(Draft),
    Update { id: RecordId, draft: Draft },
}

#[derive(Debug, Clone)]
pub struct RecordManager {
    schema: Schema,
    records: Vec<Record>,
    loading: bool,
    draft: Draft,
    cursor: EditCursor,
    load_generation: u64,
    mutation_epoch: u64,
}

impl RecordManager {
    pub fn new(schema: Schema) -> Self {
        let draft = Draft::empty(&schema);
        Self {
            schema,
            records: Vec::new(),
            loading: false,
            draft,
            cursor: EditCursor::Create,
            load_generation: 0,
            mutation_epoch: 0,
        }
    }

    pub fn with_records(schema: Schema, records: Vec<Record>) -> Self {
        let mut manager = Self::new(schema);
        manager.records = records;
        manager
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn cursor(&self) -> &EditCursor {
        &self.cursor
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.cursor, EditCursor::Edit(_))
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        if !self.draft.set(name, value) {
            debug!(target: targets::RECORDS, field = name, "Ignoring unknown draft field");
        }
    }

    pub fn start_load(&mut self) -> LoadTicket {
        self.load_generation = self.load_generation.wrapping_add(1);
        self.loading = true;
        debug!(target: targets::RECORDS, generation = self.load_generation, "Load started");
        LoadTicket {
            generation: self.load_generation,
            mutation_epoch: self.mutation_epoch,
        }
    }

    /// Applies a refresh. A snapshot taken before a newer refresh was issued,
    /// or before a create/update/delete was applied, is dropped.
    pub fn finish_load<E: fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Record>, E>,
    ) -> Result<LoadOutcome, E> {
        let latest = ticket.generation == self.load_generation;
        if latest {
            self.loading = false;
        }

        let records = match result {
            Ok(records) => records,
            Err(error) => {
                warn!(target: targets::RECORDS, error = %error, "Load failed");
                return Err(error);
            }
        };

        if !latest || ticket.mutation_epoch != self.mutation_epoch {
            warn!(
                target: targets::RECORDS,
                generation = ticket.generation,
                latest = self.load_generation,
                "Discarding stale snapshot"
            );
            return Ok(LoadOutcome::Stale);
        }

        let count = records.len();
        self.records = records;
        info!(target: targets::RECORDS, count, "Records loaded");
        Ok(LoadOutcome::Applied { count })
    }

    /// Validates the draft and returns the request the current mode calls for.
    pub fn submit(&self) -> Result<Submission, Error> {
        self.schema.validate(&self.draft)?;
        let draft = self.draft.clone();
        Ok(match &self.cursor {
            EditCursor::Create => Submission::Create(draft),
            EditCursor::Edit(id) => Submission::Update {
                id: id.clone(),
                draft,
            },
        })
    }

    pub fn finish_create<E: fmt::Display>(&mut self, result: Result<Record, E>) -> Result<(), E> {
        let record = result.inspect_err(|error| {
            warn!(target: targets::RECORDS, error = %error, "Create failed");
        })?;

        info!(target: targets::RECORDS, id = %record.id, "Record created");
        self.records.push(record);
        self.draft.clear();
        self.mutated();
        Ok(())
    }

    pub fn finish_update<E: fmt::Display>(
        &mut self,
        id: &RecordId,
        result: Result<Record, E>,
    ) -> Result<(), E> {
        let record = result.inspect_err(|error| {
            warn!(target: targets::RECORDS, id = %id, error = %error, "Update failed");
        })?;

        match self.records.iter_mut().find(|existing| &existing.id == id) {
            Some(existing) => {
                *existing = record;
                info!(target: targets::RECORDS, id = %id, "Record updated");
            }
            None => {
                warn!(target: targets::RECORDS, id = %id, "Updated record is not cached locally");
            }
        }
        self.cursor = EditCursor::Create;
        self.draft.clear();
        self.mutated();
        Ok(())
    }

    pub fn finish_delete<E: fmt::Display>(
        &mut self,
        id: &RecordId,
        result: Result<(), E>,
    ) -> Result<(), E> {
        result.inspect_err(|error| {
            warn!(target: targets::RECORDS, id = %id, error = %error, "Delete failed");
        })?;

        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        info!(
            target: targets::RECORDS,
            id = %id,
            removed = before - self.records.len(),
            "Record deleted"
        );
        self.mutated();
        Ok(())
    }

    pub fn begin_edit(&mut self, record: &Record) {
        self.draft = Draft::from_record(&self.schema, record);
        self.cursor = EditCursor::Edit(record.id.clone());
        debug!(target: targets::RECORDS, id = %record.id, "Edit started");
    }

    /// Returns false when no cached record has `id`.
    pub fn begin_edit_by_id(&mut self, id: &RecordId) -> bool {
        let Some(record) = self.record(id).cloned() else {
            warn!(target: targets::RECORDS, id = %id, "Edit requested for unknown record");
            return false;
        };
        self.begin_edit(&record);
        true
    }

    pub fn cancel_edit(&mut self) {
        self.draft.clear();
        self.cursor = EditCursor::Create;
    }

    fn mutated(&mut self) {
        self.mutation_epoch = self.mutation_epoch.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreAction;
    use crate::schema::Revision;

    fn student(id: i64, name: &str, phone: &str) -> Record {
        Record::new(RecordId::Number(id))
            .with_field("Name", name)
            .with_field("Phone", phone)
    }

    fn failure(action: StoreAction) -> Error {
        Error::Store {
            action,
            details: "connection refused".to_string(),
        }
    }

    fn manager(records: Vec<Record>) -> RecordManager {
        RecordManager::with_records(Revision::Contact.schema(), records)
    }

    #[test]
    fn load_replaces_records_in_server_order() {
        let mut manager = manager(vec![student(9, "Old", "000")]);
        let ticket = manager.start_load();
        assert!(manager.is_loading());

        let server = vec![student(3, "C", "333"), student(1, "A", "111")];
        let outcome = manager.finish_load::<Error>(ticket, Ok(server.clone()));

        assert!(matches!(outcome, Ok(LoadOutcome::Applied { count: 2 })));
        assert_eq!(manager.records(), server.as_slice());
        assert!(!manager.is_loading());
    }

    #[test]
    fn failed_load_keeps_records_and_clears_loading() {
        let existing = vec![student(1, "A", "111")];
        let mut manager = manager(existing.clone());
        let ticket = manager.start_load();

        let result = manager.finish_load(ticket, Err(failure(StoreAction::List)));

        assert!(result.is_err());
        assert_eq!(manager.records(), existing.as_slice());
        assert!(!manager.is_loading());
    }

    #[test]
    fn snapshot_older_than_a_delete_is_discarded() {
        let mut manager = manager(vec![student(1, "A", "111"), student(2, "B", "222")]);
        let ticket = manager.start_load();

        manager
            .finish_delete::<Error>(&RecordId::Number(1), Ok(()))
            .expect("delete");
        let outcome = manager
            .finish_load::<Error>(ticket, Ok(vec![student(1, "A", "111"), student(2, "B", "222")]))
            .expect("load");

        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(manager.records(), &[student(2, "B", "222")]);
        assert!(!manager.is_loading());
    }

    #[test]
    fn superseded_load_leaves_loading_to_the_newest() {
        let mut manager = manager(Vec::new());
        let first = manager.start_load();
        let second = manager.start_load();

        let outcome = manager
            .finish_load::<Error>(first, Ok(vec![student(1, "A", "111")]))
            .expect("first");
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(manager.is_loading());
        assert!(manager.records().is_empty());

        manager
            .finish_load::<Error>(second, Ok(vec![student(2, "B", "222")]))
            .expect("second");
        assert!(!manager.is_loading());
        assert_eq!(manager.records(), &[student(2, "B", "222")]);
    }

    #[test]
    fn submit_without_required_field_is_rejected() {
        let mut manager = manager(Vec::new());
        manager.set_field("Phone", "222");

        let error = manager.submit().expect_err("validation");
        assert!(matches!(error, Error::Validation { .. }));
        assert_eq!(error.user_summary(), "Vui lòng nhập tên");
    }

    #[test]
    fn create_appends_server_record_and_clears_draft() {
        let mut manager = manager(vec![student(1, "A", "111")]);
        manager.set_field("Name", "B");
        manager.set_field("Phone", "222");

        let submission = manager.submit().expect("submit");
        let Submission::Create(draft) = submission else {
            panic!("expected create submission");
        };
        assert_eq!(draft.get("Name"), "B");

        manager
            .finish_create::<Error>(Ok(student(2, "B", "222")))
            .expect("create");

        assert_eq!(
            manager.records(),
            &[student(1, "A", "111"), student(2, "B", "222")]
        );
        assert!(manager.draft().is_blank());
    }

    #[test]
    fn failed_create_keeps_draft() {
        let mut manager = manager(Vec::new());
        manager.set_field("Name", "B");

        let result = manager.finish_create(Err(failure(StoreAction::Create)));

        assert!(result.is_err());
        assert!(manager.records().is_empty());
        assert_eq!(manager.draft().get("Name"), "B");
    }

    #[test]
    fn update_replaces_only_the_edited_record() {
        let mut manager = manager(vec![
            student(1, "A", "111"),
            student(2, "B", "222"),
            student(3, "C", "333"),
        ]);
        assert!(manager.begin_edit_by_id(&RecordId::Number(2)));
        manager.set_field("Phone", "999");

        let Submission::Update { id, draft } = manager.submit().expect("submit") else {
            panic!("expected update submission");
        };
        assert_eq!(id, RecordId::Number(2));
        assert_eq!(draft.get("Name"), "B");
        assert_eq!(draft.get("Phone"), "999");

        manager
            .finish_update::<Error>(&id, Ok(student(2, "B", "999")))
            .expect("update");

        assert_eq!(
            manager.records(),
            &[
                student(1, "A", "111"),
                student(2, "B", "999"),
                student(3, "C", "333"),
            ]
        );
        assert_eq!(manager.cursor(), &EditCursor::Create);
        assert!(manager.draft().is_blank());
    }

    #[test]
    fn failed_update_stays_in_edit_mode() {
        let mut manager = manager(vec![student(1, "A", "111")]);
        manager.begin_edit_by_id(&RecordId::Number(1));
        manager.set_field("Name", "Z");

        let id = RecordId::Number(1);
        let result = manager.finish_update(&id, Err(failure(StoreAction::Update)));

        assert!(result.is_err());
        assert_eq!(manager.records(), &[student(1, "A", "111")]);
        assert_eq!(manager.cursor(), &EditCursor::Edit(id));
        assert_eq!(manager.draft().get("Name"), "Z");
    }

    #[test]
    fn delete_removes_matching_record() {
        let mut manager = manager(vec![student(1, "A", "111"), student(2, "B", "222")]);

        manager
            .finish_delete::<Error>(&RecordId::Number(1), Ok(()))
            .expect("delete");

        assert_eq!(manager.records(), &[student(2, "B", "222")]);
    }

    #[test]
    fn failed_delete_keeps_record() {
        let mut manager = manager(vec![student(1, "A", "111")]);

        let result = manager.finish_delete(&RecordId::Number(1), Err(failure(StoreAction::Delete)));

        assert!(result.is_err());
        assert_eq!(manager.records().len(), 1);
    }

    #[test]
    fn begin_then_cancel_edit_restores_create_mode() {
        let records = vec![Record::new(RecordId::text("1")).with_field("Name", "A")];
        let mut manager = manager(records.clone());

        manager.begin_edit(&records[0]);
        assert!(manager.is_editing());
        assert_eq!(manager.draft().get("Name"), "A");
        assert_eq!(manager.draft().get("Avatar"), "");

        manager.cancel_edit();
        assert_eq!(manager.records(), records.as_slice());
        assert_eq!(manager.cursor(), &EditCursor::Create);
        assert!(manager.draft().is_blank());
    }

    #[test]
    fn unknown_fields_do_not_enter_the_draft() {
        let mut manager = manager(Vec::new());
        manager.set_field("mssv", "123");
        assert_eq!(manager.draft().field_names().count(), 3);
        assert!(manager.draft().is_blank());
    }
}
