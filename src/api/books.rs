//! Book catalog and lending endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::Book,
    AppState,
};

/// Create book request
#[derive(Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, rename = "coverUrl")]
    pub cover_url: String,
}

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub username: String,
}

/// Rate request
#[derive(Deserialize, ToSchema)]
pub struct RateRequest {
    pub stars: i32,
}

/// Status response for lending operations
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

/// List all books in the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All catalog entries", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.lending.list_books()?;
    Ok(Json(books))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Missing title or author", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    if request.title.trim().is_empty() || request.author.trim().is_empty() {
        return Err(AppError::Validation(
            "title and author are required".to_string(),
        ));
    }

    let book = state.services.lending.add_book(
        &request.title,
        &request.author,
        &request.genre,
        &request.cover_url,
    )?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Delete a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = u32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<StatusCode> {
    state.services.lending.delete_book(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    params(
        ("id" = u32, Path, description = "Book ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book borrowed", body = StatusResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book unavailable or borrow limit reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Json<StatusResponse>> {
    state.services.lending.borrow_book(id, &request.username)?;
    Ok(Json(StatusResponse {
        status: "borrowed".to_string(),
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    params(
        ("id" = u32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = StatusResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book is not currently borrowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<StatusResponse>> {
    state.services.lending.return_book(id)?;
    Ok(Json(StatusResponse {
        status: "returned".to_string(),
    }))
}

/// Rate a book
#[utoipa::path(
    post,
    path = "/books/{id}/rate",
    tag = "books",
    params(
        ("id" = u32, Path, description = "Book ID")
    ),
    request_body = RateRequest,
    responses(
        (status = 200, description = "Rating recorded", body = StatusResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn rate_book(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<StatusResponse>> {
    state.services.lending.rate_book(id, request.stars)?;
    Ok(Json(StatusResponse {
        status: "rated".to_string(),
    }))
}
