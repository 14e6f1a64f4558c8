//! Activity DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Activity;
use crate::interfaces::http::modules::appointments::AppointmentSummaryDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityDto {
    pub id: i32,
    pub name: String,
    pub duration_minutes: i64,
    pub price: Decimal,
}

impl From<Activity> for ActivityDto {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            duration_minutes: a.duration_minutes(),
            name: a.name,
            price: a.price,
        }
    }
}

/// Activity together with the appointments it is booked in.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityDetailDto {
    pub id: i32,
    pub name: String,
    pub duration_minutes: i64,
    pub price: Decimal,
    pub appointments: Vec<AppointmentSummaryDto>,
}

impl ActivityDetailDto {
    pub fn new(activity: Activity, appointments: Vec<AppointmentSummaryDto>) -> Self {
        Self {
            id: activity.id,
            duration_minutes: activity.duration_minutes(),
            name: activity.name,
            price: activity.price,
            appointments,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ActivityRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_minutes: i64,

    /// Must be positive; checked in the service, where decimal values can
    /// be compared.
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_fails_validation() {
        let request = ActivityRequest {
            name: "Massage".into(),
            duration_minutes: 0,
            price: Decimal::new(5999, 2),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn well_formed_request_passes_validation() {
        let request = ActivityRequest {
            name: "Massage".into(),
            duration_minutes: 60,
            price: Decimal::new(5999, 2),
        };
        assert!(request.validate().is_ok());
    }
}
