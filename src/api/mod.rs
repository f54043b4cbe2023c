//! API handlers for Seldio REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
