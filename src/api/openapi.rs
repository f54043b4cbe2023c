//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Seldio API",
        version = "1.0.0",
        description = "Book Lending System REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        // Books
        books::list_books,
        books::create_book,
        books::delete_book,
        books::borrow_book,
        books::return_book,
        books::rate_book,
    ),
    components(schemas(
        crate::models::Book,
        crate::models::Role,
        crate::error::ErrorResponse,
        health::HealthResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        books::CreateBookRequest,
        books::BorrowRequest,
        books::RateRequest,
        books::StatusResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "books", description = "Catalog and lending")
    )
)]
pub struct ApiDoc;

/// Create router serving the OpenAPI document and Swagger UI
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/v1/openapi.json", ApiDoc::openapi()))
}
