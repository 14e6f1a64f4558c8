//! Activity domain entity

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Bookable service with a fixed duration and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: i32,
    /// Unique across all activities.
    pub name: String,
    pub duration: Duration,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn duration_minutes(&self) -> i64 {
        self.duration.num_minutes()
    }
}

/// Activity fields as accepted from a caller, before persistence.
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub name: String,
    pub duration: Duration,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn duration_minutes_reports_whole_minutes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let activity = Activity {
            id: 1,
            name: "Massage".into(),
            duration: Duration::minutes(90),
            price: Decimal::new(5999, 2),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(activity.duration_minutes(), 90);
    }
}
