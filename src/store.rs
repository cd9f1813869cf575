//! Shared application store: the fetched student list and the edit slot.
//!
//! The store is passed explicitly to every view. All mutation goes through the
//! typed functions below; each one bumps a version on a watch channel so any
//! consumer can re-render. There is no merge logic: concurrent writers race and
//! the last write wins.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::student::Student;

#[derive(Debug, Default)]
struct StoreState {
    students: Vec<Student>,
    edit: Option<Student>,
}

/// Session-lifetime store shared by all views. Clones share state.
#[derive(Debug, Clone)]
pub struct AppStore {
    state: Arc<RwLock<StoreState>>,
    version: Arc<watch::Sender<u64>>,
}

impl AppStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            version: Arc::new(version),
        }
    }

    /// Receiver that changes whenever the store is mutated.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    /// Current version; starts at 0 and increases on every mutation.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }

    // === Student list ===

    /// Snapshot of the student list.
    pub async fn students(&self) -> Vec<Student> {
        self.state.read().await.students.clone()
    }

    /// Number of students in the list.
    pub async fn len(&self) -> usize {
        self.state.read().await.students.len()
    }

    /// True when the list is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.students.is_empty()
    }

    /// Look a student up by id.
    pub async fn find_student(&self, id: i64) -> Option<Student> {
        self.state
            .read()
            .await
            .students
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Replace the whole list.
    pub async fn replace_students(&self, students: Vec<Student>) {
        debug!(count = students.len(), "Replacing student list");
        self.state.write().await.students = students;
        self.bump();
    }

    /// Transform the list in place.
    pub async fn update_students<F>(&self, transform: F)
    where
        F: FnOnce(&mut Vec<Student>),
    {
        transform(&mut self.state.write().await.students);
        self.bump();
    }

    /// Append a newly created student.
    pub async fn append_student(&self, student: Student) {
        debug!(id = student.id, "Appending student");
        self.state.write().await.students.push(student);
        self.bump();
    }

    /// Remove every record with this id. Returns whether anything was removed.
    pub async fn remove_student(&self, id: i64) -> bool {
        let removed = {
            let mut state = self.state.write().await;
            let before = state.students.len();
            state.students.retain(|s| s.id != id);
            before != state.students.len()
        };
        debug!(id, removed, "Removing student");
        self.bump();
        removed
    }

    /// Replace the record sharing this student's id. Returns whether one was
    /// found.
    pub async fn replace_student(&self, student: Student) -> bool {
        let replaced = {
            let mut state = self.state.write().await;
            match state.students.iter_mut().find(|s| s.id == student.id) {
                Some(slot) => {
                    *slot = student;
                    true
                }
                None => false,
            }
        };
        self.bump();
        replaced
    }

    // === Edit slot ===

    /// Select a student for editing, replacing any previous selection.
    pub async fn set_edit(&self, student: Student) {
        self.state.write().await.edit = Some(student);
        self.bump();
    }

    /// Student currently selected for editing.
    pub async fn edit(&self) -> Option<Student> {
        self.state.read().await.edit.clone()
    }

    /// Clear the edit slot, returning what it held.
    pub async fn take_edit(&self) -> Option<Student> {
        let taken = self.state.write().await.edit.take();
        self.bump();
        taken
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
