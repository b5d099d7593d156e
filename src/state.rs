use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::models::CourseId;
use crate::services::{CourseEditor, EditorSession};

/// Open editor sessions, one per course.
///
/// Each session sits behind its own mutex which is held for a whole save,
/// so two saves on the same course never interleave.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<CourseId, Arc<Mutex<EditorSession>>>>,
}

impl SessionStore {
    pub async fn get(&self, course_id: CourseId) -> Option<Arc<Mutex<EditorSession>>> {
        self.sessions.read().await.get(&course_id).cloned()
    }

    pub async fn get_or_create(&self, course_id: CourseId) -> Arc<Mutex<EditorSession>> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(course_id)
            .or_insert_with(|| Arc::new(Mutex::new(EditorSession::new(course_id))))
            .clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub editor: Arc<CourseEditor>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(editor: CourseEditor) -> Self {
        Self {
            editor: Arc::new(editor),
            sessions: Arc::new(SessionStore::default()),
        }
    }
}
