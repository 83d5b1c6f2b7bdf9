use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::PaginationConfig;
use crate::database::Student;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonObject};
use crate::state::AppState;
use crate::validation::{has_required_fields, parse_student, CREATE_REQUIRED};

#[derive(Debug, Default)]
pub struct ListQuery {
    /// 1-based page number; anything non-numeric or below 1 falls back to the default
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// Build from raw query pairs. A repeated key keeps its first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        Self {
            page: first("page"),
            limit: first("limit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    pub fn from_query(query: &ListQuery, config: &PaginationConfig) -> Self {
        let page = positive_or(query.page.as_deref(), config.default_page);
        let mut limit = positive_or(query.limit.as_deref(), config.default_limit);
        if let Some(max) = config.max_limit {
            limit = limit.min(max);
        }

        Self {
            page,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(leading_integer)
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Integer prefix of `raw` after leading whitespace and an optional sign, so
/// `"2.5"` reads as 2 and `"5abc"` as 5. `None` when no digits lead.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with('-') || s.starts_with('+'));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    /// Rows in this page, not in the table
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Serialize)]
pub struct StudentPage {
    pub meta: PageMeta,
    pub data: Vec<Student>,
    pub link: PageLinks,
}

/// GET /api/students - One page of students in storage order
pub async fn get(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<StudentPage>, ApiError> {
    let query = match query {
        Ok(Query(pairs)) => ListQuery::from_pairs(&pairs),
        Err(rejection) => {
            warn!("Ignoring unreadable query string: {}", rejection.body_text());
            ListQuery::default()
        }
    };
    let window = PageWindow::from_query(&query, state.pagination());
    let students = state.store().get_page(window.limit, window.offset).await?;

    Ok(Json(StudentPage {
        meta: PageMeta {
            page: window.page,
            limit: window.limit,
            total: students.len(),
        },
        data: students,
        link: PageLinks {
            self_link: format!("/api/students?page={}&limit={}", window.page, window.limit),
        },
    }))
}

/// POST /api/students - Create a student
pub async fn post(State(state): State<AppState>, JsonObject(body): JsonObject) -> ApiResult<Student> {
    if !has_required_fields(&body, CREATE_REQUIRED) {
        warn!("Create rejected: missing required fields");
        return Err(ApiError::missing_fields());
    }

    let student = parse_student(&body).ok_or_else(|| {
        warn!("Create rejected: invalid data types");
        ApiError::invalid_types()
    })?;

    if state.store().exists(&student.student_id).await? {
        warn!("Create rejected: student {} already exists", student.student_id);
        return Err(ApiError::duplicate_student());
    }

    state.store().insert(&student).await?;
    info!("Created student {}", student.student_id);

    Ok(ApiResponse::created(student).with_message("Student created successfully"))
}
