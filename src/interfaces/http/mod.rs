//! HTTP REST API
//!
//! - `middleware`: JWT authentication
//! - `common`: response envelopes, pagination, validated JSON extraction
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
