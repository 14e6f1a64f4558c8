//! Appointment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AppointmentDetails;
use crate::domain::AppointmentSummary;
use crate::interfaces::http::modules::activities::ActivityDto;

/// Booking payload. The end time is never accepted from the caller; it is
/// derived from the activity durations.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AppointmentRequest {
    pub start_time: DateTime<Utc>,

    #[validate(length(min = 1, message = "Activities is required"))]
    pub activity_ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentDto {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub user_id: String,
    pub activities: Vec<ActivityDto>,
}

impl From<AppointmentDetails> for AppointmentDto {
    fn from(details: AppointmentDetails) -> Self {
        Self {
            id: details.appointment.id,
            start_time: details.appointment.slot.start,
            end_time: details.appointment.slot.end,
            user_id: details.appointment.user_id,
            activities: details.activities.into_iter().map(ActivityDto::from).collect(),
        }
    }
}

/// Appointment without its activities, used where embedding them would
/// recurse (e.g. inside an activity's detail view).
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentSummaryDto {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub user_id: String,
}

impl From<AppointmentSummary> for AppointmentSummaryDto {
    fn from(s: AppointmentSummary) -> Self {
        Self {
            id: s.id,
            start_time: s.slot.start,
            end_time: s.slot.end,
            user_id: s.user_id,
        }
    }
}
