pub mod dto;
pub mod handlers;

pub use dto::{AppointmentDto, AppointmentRequest, AppointmentSummaryDto};
pub use handlers::{
    create_appointment, delete_appointment, get_appointment, list_appointments,
    update_appointment, AppointmentHandlerState, SharedAppointmentService,
};
