//! JSON API namespace. Placeholder payloads only; nothing here is persisted.

use axum::Json;
use residence_core::core_version;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleResponse {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: u32,
    pub title: &'static str,
    pub completed: bool,
}

const STUB_TODOS: [Todo; 3] = [
    Todo {
        id: 1,
        title: "Walk through every building",
        completed: false,
    },
    Todo {
        id: 2,
        title: "Update staff rota",
        completed: true,
    },
    Todo {
        id: 3,
        title: "Check vacant rooms",
        completed: false,
    },
];

/// `GET /api`
pub async fn example() -> Json<ExampleResponse> {
    Json(ExampleResponse {
        message: "residence api",
        version: core_version(),
    })
}

/// `GET /api/todos`
pub async fn get_todos() -> Json<Vec<Todo>> {
    Json(STUB_TODOS.to_vec())
}
