//! List/form view: the student table plus the "add student" form.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::render;
use super::request_failure;
use crate::api::{paths, ApiRequest, RequestExecutor, RequestState, Transport};
use crate::error::ViewError;
use crate::router::Route;
use crate::store::AppStore;
use crate::student::{Field, Student, StudentDraft};

/// The home view mounted at `/`.
#[derive(Debug)]
pub struct ListView<T> {
    store: AppStore,
    exec: RequestExecutor<T>,
    draft: StudentDraft,
}

impl<T: Transport> ListView<T> {
    /// Create the view. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(transport: Arc<T>, store: AppStore, cancel: CancellationToken) -> Self {
        Self {
            store,
            exec: RequestExecutor::new(transport, cancel),
            draft: StudentDraft::default(),
        }
    }

    /// Fetch every student and replace the shared list.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> Result<usize, ViewError> {
        let students: Vec<Student> = self
            .exec
            .send_as(ApiRequest::get(paths::GET_ALL))
            .await
            .ok_or_else(|| request_failure(&self.exec))?;

        let count = students.len();
        self.store.replace_students(students).await;
        info!(count, "Student list loaded");
        Ok(count)
    }

    /// Current draft input.
    pub fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    /// Update one draft field.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Validate the draft and create the student.
    ///
    /// On success the created record is appended to the shared list and the
    /// draft is cleared. A draft that fails validation is never sent.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<Student, ViewError> {
        let payload = self.draft.validate()?;
        let request = ApiRequest::post(paths::ADD, &payload)
            .map_err(|e| ViewError::Request(e.to_string()))?;

        let created: Student = self
            .exec
            .send_as(request)
            .await
            .ok_or_else(|| request_failure(&self.exec))?;

        self.store.append_student(created.clone()).await;
        self.draft.clear();
        info!(id = created.id, "Student created");
        Ok(created)
    }

    /// Delete a student by id.
    ///
    /// Any successful response, empty bodies included, removes the matching
    /// record. Returns whether a record was removed from the shared list.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, ViewError> {
        self.exec
            .send(ApiRequest::delete(paths::delete(id)))
            .await
            .ok_or_else(|| request_failure(&self.exec))?;

        let removed = self.store.remove_student(id).await;
        info!(id, removed, "Student deleted");
        Ok(removed)
    }

    /// Put a student in the edit slot and return the route to navigate to.
    pub async fn begin_edit(&self, id: i64) -> Result<Route, ViewError> {
        let student = self
            .store
            .find_student(id)
            .await
            .ok_or(ViewError::StudentNotFound(id))?;
        self.store.set_edit(student).await;
        Ok(Route::Update(id))
    }

    /// Request state of this view's executor.
    pub fn request_state(&self) -> RequestState {
        self.exec.state()
    }

    /// True while a request is in flight.
    pub fn loading(&self) -> bool {
        self.exec.loading()
    }

    /// Last stored error message.
    pub fn error(&self) -> Option<String> {
        self.exec.error()
    }

    /// Drop any in-flight request.
    pub fn unmount(&self) {
        self.exec.cancel_token().cancel();
    }

    /// Render the error panel and the student table.
    pub async fn render(&self) -> String {
        let students = self.store.students().await;
        let mut out = String::new();
        if let Some(error) = self.exec.error() {
            out.push_str(&render::error_panel(&error));
            out.push('\n');
        }
        out.push_str(&render::student_table(&students));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use crate::error::{ApiError, ValidationError};
    use crate::student::Course;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn view(mock: &MockTransport, store: &AppStore) -> ListView<MockTransport> {
        ListView::new(Arc::new(mock.clone()), store.clone(), CancellationToken::new())
    }

    fn ada_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Ada",
            "age": 20,
            "email": "a@x.com",
            "course": "Data Science",
            "accountNo": 5
        })
    }

    fn fill_ada(view: &mut ListView<MockTransport>) {
        view.set_field(Field::Name, "Ada");
        view.set_field(Field::Email, "a@x.com");
        view.set_field(Field::Age, "20");
        view.set_field(Field::Course, "Data Science");
        view.set_field(Field::AccountNo, "5");
    }

    #[tokio::test]
    async fn mount_populates_the_shared_list() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(1), ada_json(2)])));
        let store = AppStore::new();

        let count = view(&mock, &store).mount().await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn mount_failure_leaves_list_and_reports_message() {
        let mock = MockTransport::new();
        mock.respond("getAll", Err(ApiError::Transport("connection refused".to_string())));
        let store = AppStore::new();
        let list = view(&mock, &store);

        let err = list.mount().await.unwrap_err();

        assert_eq!(err, ViewError::Request("connection refused".to_string()));
        assert!(store.is_empty().await);
        assert!(list.render().await.contains("connection refused"));
    }

    #[tokio::test]
    async fn submitting_ada_appends_and_resets_draft() {
        let mock = MockTransport::new();
        mock.respond("add", Ok(ada_json(1)));
        let store = AppStore::new();
        let mut list = view(&mock, &store);
        fill_ada(&mut list);

        let created = list.submit().await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.course, Course::DataScience);
        assert_eq!(store.students().await, vec![created]);
        assert_eq!(list.draft(), &StudentDraft::default());

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        let body = sent[0].body.clone().unwrap();
        assert_eq!(body["age"], 20);
        assert_eq!(body["accountNo"], 5);
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn invalid_draft_is_never_sent() {
        let mock = MockTransport::new();
        let store = AppStore::new();
        let mut list = view(&mock, &store);
        fill_ada(&mut list);
        list.set_field(Field::Email, "");

        let err = list.submit().await.unwrap_err();

        assert_eq!(
            err,
            ViewError::Validation(ValidationError::MissingField(Field::Email))
        );
        assert_eq!(mock.request_count(), 0);
        assert_eq!(list.draft().name, "Ada");
    }

    #[tokio::test]
    async fn failed_create_keeps_draft() {
        let mock = MockTransport::new();
        mock.respond(
            "add",
            Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: Some("email already registered".to_string()),
            }),
        );
        let store = AppStore::new();
        let mut list = view(&mock, &store);
        fill_ada(&mut list);

        let err = list.submit().await.unwrap_err();

        assert_eq!(err, ViewError::Request("email already registered".to_string()));
        assert!(store.is_empty().await);
        assert_eq!(list.draft().name, "Ada");
        assert!(!list.loading());
    }

    #[tokio::test]
    async fn delete_with_empty_body_removes_record() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(1), ada_json(2)])));
        mock.respond("delete/1", Ok(serde_json::Value::Null));
        let store = AppStore::new();
        let list = view(&mock, &store);
        list.mount().await.unwrap();

        assert!(list.delete(1).await.unwrap());
        let ids: Vec<i64> = store.students().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn delete_of_absent_id_leaves_list_unchanged() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(1)])));
        mock.respond("delete/9", Ok(serde_json::Value::Null));
        let store = AppStore::new();
        let list = view(&mock, &store);
        list.mount().await.unwrap();
        let before = store.students().await;

        assert!(!list.delete(9).await.unwrap());
        assert_eq!(store.students().await, before);
    }

    #[tokio::test]
    async fn failed_delete_keeps_record() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(1)])));
        mock.respond("delete/1", Err(ApiError::Transport("timed out".to_string())));
        let store = AppStore::new();
        let list = view(&mock, &store);
        list.mount().await.unwrap();

        assert!(list.delete(1).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn begin_edit_fills_slot_and_returns_route() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(3)])));
        let store = AppStore::new();
        let list = view(&mock, &store);
        list.mount().await.unwrap();

        assert_eq!(list.begin_edit(3).await.unwrap(), Route::Update(3));
        assert_eq!(store.edit().await.map(|s| s.id), Some(3));
        assert_eq!(
            list.begin_edit(4).await.unwrap_err(),
            ViewError::StudentNotFound(4)
        );
    }

    #[tokio::test]
    async fn unmounted_view_never_writes_the_store() {
        let mock = MockTransport::new();
        mock.respond("getAll", Ok(json!([ada_json(1)])));
        let gate = mock.gate();
        let store = AppStore::new();
        let list = Arc::new(view(&mock, &store));

        let pending = tokio::spawn({
            let list = Arc::clone(&list);
            async move { list.mount().await }
        });
        gate.wait_for_request().await;
        list.unmount();

        assert_eq!(pending.await.unwrap(), Err(ViewError::Cancelled));
        assert!(store.is_empty().await);
        assert_eq!(store.version(), 0);
    }
}
