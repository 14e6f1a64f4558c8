pub mod dto;
pub mod handlers;

pub use dto::{ActivityDetailDto, ActivityDto, ActivityRequest};
pub use handlers::{
    create_activity, delete_activity, get_activity, list_activities, update_activity,
    ActivityHandlerState, SharedActivityService,
};
