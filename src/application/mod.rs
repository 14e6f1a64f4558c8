//! Business logic and use-case orchestration

pub mod guard;
pub mod services;

pub use guard::{authorize_owner, require_admin, CallerContext};
pub use services::{
    ActivityService, AppointmentDetails, AppointmentService, AuthResult, UserService,
};
