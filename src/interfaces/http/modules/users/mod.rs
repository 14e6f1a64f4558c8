pub mod dto;
pub mod handlers;

pub use dto::{UpdateUserRequest, UserDto};
pub use handlers::{
    delete_user, get_user, list_users, update_user, SharedUserService, UserHandlerState,
};
