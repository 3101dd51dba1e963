// File: services/barbershop_backend/src/app.rs
use axum::Router;
use barbershop_common::{not_found_handler, routes as common_routes};
use barbershop_gcal::{handlers::GcalState, routes as gcal_routes};
use http::Method;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Assembles the full application: booking routes, shared routes, optional
/// Swagger UI, JSON 404 fallback, CORS and request tracing.
pub fn build_router(gcal_state: Arc<GcalState>) -> Router {
    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new()
        .merge(gcal_routes::routes(gcal_state))
        .merge(common_routes());

    #[cfg(feature = "openapi")]
    {
        use barbershop_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Barbershop API",
                version = "0.1.0",
                description = "Availability and bookings backed by Google Calendar",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags((name = "Barbershop", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GcalApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");

        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    app.fallback(not_found_handler).layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
