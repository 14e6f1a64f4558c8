//! Per-resource HTTP modules: DTOs and handlers

pub mod activities;
pub mod appointments;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod users;
