pub mod dto;
pub mod handlers;

pub use dto::{LoginRequest, LoginResponse, RegisterRequest};
pub use handlers::{login, me, register, AuthHandlerState};
