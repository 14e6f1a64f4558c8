//! SeaORM entities

pub mod activity;
pub mod activity_appointment;
pub mod appointment;
pub mod user;
