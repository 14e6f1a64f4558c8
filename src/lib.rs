//! # Rushhour Scheduling Service
//!
//! Appointment booking engine: users book appointments composed of one or
//! more activities; the end time is derived from the activity durations and
//! overlapping bookings contending for the same user or activity are
//! rejected.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, value logic and repository traits
//! - **application**: Services (orchestration) and the authorization guard
//! - **infrastructure**: Persistence (SeaORM) and cryptography (JWT, bcrypt)
//! - **interfaces**: REST API with Swagger documentation
//! - **config**: TOML configuration with environment overrides

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
