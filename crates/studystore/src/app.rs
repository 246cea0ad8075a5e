use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        activities::{get_activity_history, get_referent_history},
        health::livez,
        oauth::get_health_codes_granting_access,
        reports::get_report_data,
        uploads::{get_study_uploads, get_uploads},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let v3_routes = Router::new()
        .route(
            "/participants/{health_code}/activities/{activity_guid}",
            get(get_activity_history),
        )
        .route("/participants/{health_code}/uploads", get(get_uploads))
        .route("/studies/{study_id}/uploads", get(get_study_uploads))
        .route(
            "/studies/{study_id}/oauth/{vendor_id}",
            get(get_health_codes_granting_access),
        );

    let v4_routes = Router::new()
        .route(
            "/participants/{health_code}/activities/{activity_type}/{referent_guid}",
            get(get_referent_history),
        )
        .route(
            "/studies/{study_id}/reports/{identifier}",
            get(get_report_data),
        );

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .nest("/v3", v3_routes)
        .nest("/v4", v4_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
