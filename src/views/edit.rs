//! Edit view mounted at `/update/:id`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::render;
use super::request_failure;
use crate::api::{paths, ApiRequest, RequestExecutor, RequestState, Transport};
use crate::error::ViewError;
use crate::store::AppStore;
use crate::student::{Field, Student, StudentDraft};

#[derive(Debug)]
pub struct EditView<T> {
    id: i64,
    store: AppStore,
    exec: RequestExecutor<T>,
    draft: StudentDraft,
}

impl<T: Transport> EditView<T> {
    /// Mount the view for one student.
    ///
    /// The edit slot is preferred; if it holds another record (or nothing),
    /// the shared list is searched instead.
    pub async fn mount(
        transport: Arc<T>,
        store: AppStore,
        cancel: CancellationToken,
        id: i64,
    ) -> Result<Self, ViewError> {
        let selected = match store.edit().await {
            Some(student) if student.id == id => Some(student),
            _ => {
                debug!(id, "Edit slot does not hold the target, using shared list");
                store.find_student(id).await
            }
        };
        let student = selected.ok_or(ViewError::StudentNotFound(id))?;

        Ok(Self {
            id,
            draft: StudentDraft::from_student(&student),
            store,
            exec: RequestExecutor::new(transport, cancel),
        })
    }

    /// Id of the student being edited.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Validate the draft and send the update.
    ///
    /// The returned record replaces the one in the shared list (or is
    /// appended if the list no longer holds it) and the edit slot is cleared.
    #[instrument(skip(self), fields(id = self.id))]
    pub async fn submit(&mut self) -> Result<Student, ViewError> {
        let payload = self.draft.validate()?;
        let request = ApiRequest::put(paths::update(self.id), &payload)
            .map_err(|e| ViewError::Request(e.to_string()))?;

        let updated: Student = self
            .exec
            .send_as(request)
            .await
            .ok_or_else(|| request_failure(&self.exec))?;

        if !self.store.replace_student(updated.clone()).await {
            self.store.append_student(updated.clone()).await;
        }
        self.store.take_edit().await;
        info!(id = updated.id, "Student updated");
        Ok(updated)
    }

    /// Abandon the edit: clear the slot and drop any in-flight request.
    pub async fn cancel(&self) {
        self.exec.cancel_token().cancel();
        self.store.take_edit().await;
    }

    pub fn request_state(&self) -> RequestState {
        self.exec.state()
    }

    pub fn error(&self) -> Option<String> {
        self.exec.error()
    }

    /// Render the form values and any error panel.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(error) = self.exec.error() {
            out.push_str(&render::error_panel(&error));
            out.push('\n');
        }
        out.push_str(&render::draft_form(&format!("Edit student {}", self.id), &self.draft));
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

    fn bo() -> Student {
        Student {
            id: 2,
            name: "Bo".to_string(),
            age: 31,
            email: "bo@x.com".to_string(),
            course: Course::Cybersecurity,
            account_no: 77,
        }
    }

    async fn store_with_bo() -> AppStore {
        let store = AppStore::new();
        store.replace_students(vec![bo()]).await;
        store
    }

    #[tokio::test]
    async fn mount_prefers_edit_slot() {
        let store = store_with_bo().await;
        let mut selected = bo();
        selected.name = "Bo (selected)".to_string();
        store.set_edit(selected).await;

        let view = EditView::mount(
            Arc::new(MockTransport::new()),
            store,
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();

        assert_eq!(view.draft().name, "Bo (selected)");
    }

    #[tokio::test]
    async fn mount_falls_back_to_shared_list() {
        let store = store_with_bo().await;
        let view = EditView::mount(
            Arc::new(MockTransport::new()),
            store,
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();

        assert_eq!(view.draft(), &StudentDraft::from_student(&bo()));
    }

    #[tokio::test]
    async fn mount_of_unknown_id_fails() {
        let result = EditView::mount(
            Arc::new(MockTransport::new()),
            AppStore::new(),
            CancellationToken::new(),
            5,
        )
        .await;

        assert_eq!(result.unwrap_err(), ViewError::StudentNotFound(5));
    }

    #[tokio::test]
    async fn submit_replaces_record_and_clears_slot() {
        let mock = MockTransport::new();
        let mut renamed = bo();
        renamed.name = "Bo Diddley".to_string();
        mock.respond("update/2", Ok(serde_json::to_value(&renamed).unwrap()));
        let store = store_with_bo().await;
        store.set_edit(bo()).await;

        let mut view = EditView::mount(
            Arc::new(mock.clone()),
            store.clone(),
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();
        view.set_field(Field::Name, "Bo Diddley");

        let updated = view.submit().await.unwrap();

        assert_eq!(updated, renamed);
        assert_eq!(store.students().await, vec![renamed]);
        assert_eq!(store.edit().await, None);
        let sent = mock.requests();
        assert_eq!(sent[0].method, crate::api::Method::Put);
        assert_eq!(sent[0].body.as_ref().unwrap()["name"], "Bo Diddley");
    }

    #[tokio::test]
    async fn failed_update_keeps_slot_and_list() {
        let mock = MockTransport::new();
        mock.respond("update/2", Err(ApiError::Transport("connection reset".to_string())));
        let store = store_with_bo().await;
        store.set_edit(bo()).await;

        let mut view = EditView::mount(
            Arc::new(mock),
            store.clone(),
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();
        view.set_field(Field::Age, "32");

        assert_eq!(
            view.submit().await.unwrap_err(),
            ViewError::Request("connection reset".to_string())
        );
        assert_eq!(store.students().await, vec![bo()]);
        assert_eq!(store.edit().await, Some(bo()));
        assert!(view.render().contains("connection reset"));
    }

    #[tokio::test]
    async fn invalid_edit_is_not_sent() {
        let mock = MockTransport::new();
        let store = store_with_bo().await;
        let mut view = EditView::mount(
            Arc::new(mock.clone()),
            store,
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();
        view.set_field(Field::Name, "");

        assert_eq!(
            view.submit().await.unwrap_err(),
            ViewError::Validation(ValidationError::MissingField(Field::Name))
        );
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn cancel_clears_slot() {
        let store = store_with_bo().await;
        store.set_edit(bo()).await;
        let view = EditView::mount(
            Arc::new(MockTransport::new()),
            store.clone(),
            CancellationToken::new(),
            2,
        )
        .await
        .unwrap();

        view.cancel().await;
        assert_eq!(store.edit().await, None);
        assert_eq!(store.len().await, 1);
    }
}
