use std::sync::Arc;

use crate::content::ContentStore;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentStore>,
}

impl AppState {
    pub fn new(content: ContentStore) -> Self {
        Self {
            content: Arc::new(content),
        }
    }
}
