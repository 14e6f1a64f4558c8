mod model;
mod repository;

pub use model::{Activity, ActivityDraft};
pub use repository::ActivityRepository;
