use crate::db::Store;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewStudent {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCatchUp {
    pub student_id: i64,
    pub date: String,
    pub lesson_missed: String,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
