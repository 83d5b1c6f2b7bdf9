use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod validation;

pub use state::AppState;

/// Build the HTTP router over the injected collaborators
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::service::welcome))
        .route("/health", get(handlers::service::health))
        .merge(student_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Same router with permissive CORS, for deployments that enable it
pub fn app_with_cors(state: AppState) -> Router {
    app(state).layer(CorsLayer::permissive())
}

fn student_routes() -> Router<AppState> {
    use handlers::students;

    Router::new()
        // Collection-level operations
        .route(
            "/api/students",
            get(students::collection_get).post(students::collection_post),
        )
        // Record-level operations
        .route(
            "/api/students/:id",
            get(students::record_get)
                .put(students::record_put)
                .delete(students::record_delete),
        )
}
