use tracing::{debug, info};

use crate::manager::{LoadOutcome, RecordManager, Submission};
use crate::model::RecordId;
use crate::store::RecordStore;
use crate::{targets, Error};

pub const CONFIRM_DELETE: &str = "Bạn có chắc muốn xóa mục này không?";

/// User-facing notification and confirmation, supplied by the front end.
pub trait Prompter {
    fn notify(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

/// Runs each operation end to end and notifies once on failure.
pub struct Controller<S, P> {
    store: S,
    prompter: P,
    manager: RecordManager,
}

impl<S: RecordStore, P: Prompter> Controller<S, P> {
    pub fn new(store: S, prompter: P, manager: RecordManager) -> Self {
        Self {
            store,
            prompter,
            manager,
        }
    }

    pub fn manager(&self) -> &RecordManager {
        &self.manager
    }

    pub async fn load_all(&mut self) -> Option<LoadOutcome> {
        let ticket = self.manager.start_load();
        let result = self.store.list().await;
        let outcome = self.manager.finish_load(ticket, result);
        self.report(outcome)
    }

    /// Creates or updates depending on the edit cursor.
    pub async fn submit(&mut self) -> bool {
        let submission = match self.manager.submit() {
            Ok(submission) => submission,
            Err(error) => {
                debug!(target: targets::RECORDS, error = %error, "Submit rejected");
                self.prompter.notify(&error.user_summary());
                return false;
            }
        };

        match submission {
            Submission::Create(draft) => {
                let result = self.store.create(draft).await;
                let applied = self.manager.finish_create(result);
                self.report(applied).is_some()
            }
            Submission::Update { id, draft } => {
                let result = self.store.update(id.clone(), draft).await;
                let applied = self.manager.finish_update(&id, result);
                self.report(applied).is_some()
            }
        }
    }

    pub async fn delete(&mut self, id: &RecordId) -> bool {
        if !self.prompter.confirm(CONFIRM_DELETE) {
            info!(target: targets::RECORDS, id = %id, "Delete declined");
            return false;
        }

        let result = self.store.delete(id.clone()).await;
        let applied = self.manager.finish_delete(id, result);
        self.report(applied).is_some()
    }

    pub fn begin_edit(&mut self, id: &RecordId) -> bool {
        self.manager.begin_edit_by_id(id)
    }

    pub fn cancel_edit(&mut self) {
        self.manager.cancel_edit();
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.manager.set_field(name, value);
    }

    fn report<T>(&self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.prompter.notify(&error.user_summary());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::StoreAction;
    use crate::model::Record;
    use crate::schema::Revision;
    use crate::store::{run_future, MockRecordStore, StoreCall};

    #[derive(Default)]
    struct RecordingPrompter {
        answer: bool,
        notices: RefCell<Vec<String>>,
        questions: RefCell<Vec<String>>,
    }

    impl RecordingPrompter {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Self::default()
            }
        }
    }

    impl Prompter for &RecordingPrompter {
        fn notify(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }

        fn confirm(&self, message: &str) -> bool {
            self.questions.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    fn student(id: i64, name: &str, phone: &str) -> Record {
        Record::new(RecordId::Number(id))
            .with_field("Name", name)
            .with_field("Phone", phone)
    }

    fn controller<'a>(
        store: &MockRecordStore,
        prompter: &'a RecordingPrompter,
        records: Vec<Record>,
    ) -> Controller<MockRecordStore, &'a RecordingPrompter> {
        let manager = RecordManager::with_records(Revision::Contact.schema(), records);
        Controller::new(store.clone(), prompter, manager)
    }

    #[test]
    fn create_scenario_appends_server_record() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let mut controller = controller(&store, &prompter, vec![student(1, "A", "111")]);

        store.push_record(student(2, "B", "222"));
        controller.set_field("Name", "B");
        controller.set_field("Phone", "222");

        assert!(run_future(controller.submit()));
        assert_eq!(
            controller.manager().records(),
            &[student(1, "A", "111"), student(2, "B", "222")]
        );
        assert!(controller.manager().draft().is_blank());
        assert!(prompter.notices.borrow().is_empty());
    }

    #[test]
    fn missing_required_field_makes_no_call() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let existing = vec![student(1, "A", "111")];
        let mut controller = controller(&store, &prompter, existing.clone());

        controller.set_field("Phone", "222");
        assert!(!run_future(controller.submit()));

        assert!(store.calls().is_empty());
        assert_eq!(controller.manager().records(), existing.as_slice());
        assert_eq!(prompter.notices.borrow().as_slice(), ["Vui lòng nhập tên"]);
    }

    #[test]
    fn missing_required_field_in_edit_mode_makes_no_call() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let mut controller = controller(&store, &prompter, vec![student(1, "A", "111")]);

        assert!(controller.begin_edit(&RecordId::Number(1)));
        controller.set_field("Name", "");
        assert!(!run_future(controller.submit()));

        assert!(store.calls().is_empty());
        assert!(controller.manager().is_editing());
    }

    #[test]
    fn confirmed_delete_scenario_removes_record() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let mut controller = controller(
            &store,
            &prompter,
            vec![student(1, "A", "111"), student(2, "B", "222")],
        );

        store.push_deleted();
        assert!(run_future(controller.delete(&RecordId::Number(1))));

        assert_eq!(controller.manager().records(), &[student(2, "B", "222")]);
        assert_eq!(prompter.questions.borrow().as_slice(), [CONFIRM_DELETE]);
        assert_eq!(store.calls(), vec![StoreCall::Delete(RecordId::Number(1))]);
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(false);
        let existing = vec![student(1, "A", "111")];
        let mut controller = controller(&store, &prompter, existing.clone());
        controller.begin_edit(&RecordId::Number(1));
        let cursor = controller.manager().cursor().clone();

        assert!(!run_future(controller.delete(&RecordId::Number(1))));

        assert!(store.calls().is_empty());
        assert_eq!(controller.manager().records(), existing.as_slice());
        assert_eq!(controller.manager().cursor(), &cursor);
    }

    #[test]
    fn update_goes_to_the_edited_record() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let mut controller = controller(
            &store,
            &prompter,
            vec![student(1, "A", "111"), student(2, "B", "222")],
        );

        assert!(controller.begin_edit(&RecordId::Number(1)));
        controller.set_field("Name", "Anh");
        store.push_record(student(1, "Anh", "111"));
        assert!(run_future(controller.submit()));

        match store.calls().as_slice() {
            [StoreCall::Update(id, draft)] => {
                assert_eq!(id, &RecordId::Number(1));
                assert_eq!(draft.get("Name"), "Anh");
            }
            other => panic!("unexpected calls: {other:?}"),
        }
        assert_eq!(
            controller.manager().records(),
            &[student(1, "Anh", "111"), student(2, "B", "222")]
        );
        assert!(!controller.manager().is_editing());
    }

    #[test]
    fn store_failure_notifies_once_and_keeps_state() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let existing = vec![student(1, "A", "111")];
        let mut controller = controller(&store, &prompter, existing.clone());

        store.push_error(Error::Store {
            action: StoreAction::List,
            details: "timeout".to_string(),
        });
        assert_eq!(run_future(controller.load_all()), None);

        assert_eq!(controller.manager().records(), existing.as_slice());
        assert!(!controller.manager().is_loading());
        assert_eq!(prompter.notices.borrow().as_slice(), ["Lỗi khi tải dữ liệu"]);
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }

    #[test]
    fn load_all_replaces_records() {
        let store = MockRecordStore::new();
        let prompter = RecordingPrompter::answering(true);
        let mut controller = controller(&store, &prompter, Vec::new());

        let server = vec![student(5, "E", "555"), student(4, "D", "444")];
        store.push_records(server.clone());

        assert_eq!(
            run_future(controller.load_all()),
            Some(LoadOutcome::Applied { count: 2 })
        );
        assert_eq!(controller.manager().records(), server.as_slice());
    }
}
