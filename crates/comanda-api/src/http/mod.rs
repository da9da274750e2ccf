//! HTTP/REST API layer for Comanda.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format, CORS
//! support and a Server-Sent Events feed per session.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
