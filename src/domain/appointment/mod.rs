mod model;
mod repository;

pub use model::{
    reconcile, ActivityLink, Appointment, AppointmentSummary, LinkDelta, NewAppointment,
};
pub use repository::AppointmentRepository;
