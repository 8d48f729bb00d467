//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::assembly::QuizSet;
use crate::domain::QuizItem;

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

/// Quiz payload returned by `GET /api/v1/quiz`.
#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub tag: String,
    pub count: usize,
    pub questions: Vec<QuizItem>,
    #[serde(rename = "servedFromCache")]
    pub served_from_cache: bool,
}

/// Convert the internal assembly result to the public DTO.
pub fn to_out(set: QuizSet) -> QuizOut {
    QuizOut {
        tag: set.tag,
        count: set.items.len(),
        questions: set.items,
        served_from_cache: set.served_from_cache,
    }
}

/// Structured error payload served with a non-failing transport status when
/// assembly itself faults.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl ErrorOut {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                kind: "internal".into(),
                message: message.into(),
            },
        }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct RootOut {
    pub message: &'static str,
}
