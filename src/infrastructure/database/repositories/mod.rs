//! SeaORM repository implementations

pub mod activity_repository;
pub mod appointment_repository;
pub mod user_repository;

pub use activity_repository::SeaOrmActivityRepository;
pub use appointment_repository::SeaOrmAppointmentRepository;
pub use user_repository::SeaOrmUserRepository;
