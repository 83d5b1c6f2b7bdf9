use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Request body flattened to an object.
///
/// JSON bodies are parsed; one that parses but is not an object yields an
/// empty map, so the handler reports missing fields rather than a parse
/// failure. URL-encoded forms become string-valued fields. Any other content
/// type is not read at all and also yields an empty map.
#[derive(Debug, Clone, Default)]
pub struct JsonObject(pub Map<String, Value>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let essence = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json")) {
        BodyKind::Json
    } else if essence == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => match Json::<Value>::from_request(req, state).await {
                Ok(Json(Value::Object(map))) => Ok(JsonObject(map)),
                Ok(Json(_)) => Ok(JsonObject(Map::new())),
                Err(rejection) => {
                    warn!("Rejected request body: {}", rejection.body_text());
                    Err(ApiError::invalid_json("Invalid JSON body"))
                }
            },
            BodyKind::Form => match Form::<Vec<(String, String)>>::from_request(req, state).await {
                Ok(Form(pairs)) => {
                    let mut map = Map::new();
                    for (key, value) in pairs {
                        map.entry(key).or_insert(Value::String(value));
                    }
                    Ok(JsonObject(map))
                }
                Err(rejection) => {
                    warn!("Rejected form body: {}", rejection.body_text());
                    Err(ApiError::invalid_json("Invalid form body"))
                }
            },
            BodyKind::Other => {
                debug!("Ignoring body without a JSON or form content type");
                Ok(JsonObject(Map::new()))
            }
        }
    }
}
