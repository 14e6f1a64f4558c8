//! Appointment repository interface

use async_trait::async_trait;

use super::model::{Appointment, AppointmentSummary, LinkDelta, NewAppointment};
use crate::domain::page::Page;
use crate::domain::scheduling::TimeSlot;
use crate::domain::DomainResult;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Find an appointment with its activity links.
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Appointment>>;

    /// Page through all appointments, links included.
    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Appointment>>;

    /// Summaries of appointments linked to the given activity.
    async fn find_by_activity(&self, activity_id: i32) -> DomainResult<Vec<AppointmentSummary>>;

    /// All appointments whose `[start, end)` interval intersects `slot` and
    /// which share the owning user or at least one activity with the
    /// candidate, in one query. `exclude_id` removes the appointment's own
    /// prior state from the result during update re-validation.
    async fn find_overlapping(
        &self,
        slot: &TimeSlot,
        user_id: &str,
        activity_ids: &[i32],
        exclude_id: Option<i32>,
    ) -> DomainResult<Vec<AppointmentSummary>>;

    /// Insert the candidate and its links as one atomic write.
    async fn insert(&self, candidate: NewAppointment) -> DomainResult<Appointment>;

    /// Write the updated row and apply the link delta atomically: kept links
    /// are untouched, removed links deleted, added links created.
    async fn update(&self, appointment: &Appointment, delta: &LinkDelta)
        -> DomainResult<Appointment>;

    /// Delete the appointment together with all of its links.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
