//! Appointment scheduling service — application-layer orchestration
//!
//! Every mutation runs the same gate order: authorize, build the candidate
//! state in memory (resolve activities, reconcile links, derive the end
//! time), validate it against existing bookings, and only then hand the
//! result to the store. Any gate failure short-circuits before a write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::guard::{authorize_owner, CallerContext};
use crate::domain::{
    reconcile, Activity, ActivityRepository, Appointment, AppointmentRepository,
    AppointmentSummary, DomainError, DomainResult, NewAppointment, Page, TimeSlot,
};

/// An appointment together with the resolved activities behind its links,
/// in link order.
#[derive(Debug, Clone)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub activities: Vec<Activity>,
}

/// Appointment service — orchestrates booking create/update/delete.
///
/// Generic over the repository traits so it stays decoupled from the
/// concrete persistence layer.
pub struct AppointmentService<A, C>
where
    A: AppointmentRepository,
    C: ActivityRepository,
{
    appointments: Arc<A>,
    activities: Arc<C>,
}

impl<A, C> AppointmentService<A, C>
where
    A: AppointmentRepository,
    C: ActivityRepository,
{
    pub fn new(appointments: Arc<A>, activities: Arc<C>) -> Self {
        Self {
            appointments,
            activities,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get(&self, id: i32) -> DomainResult<AppointmentDetails> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", id))?;
        let activities = self
            .activities
            .find_by_ids(&appointment.activity_ids())
            .await?;
        Ok(AppointmentDetails {
            appointment,
            activities,
        })
    }

    pub async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<AppointmentDetails>> {
        let appointments = self.appointments.list(page, page_size).await?;

        // One round trip for every activity referenced on this page.
        let mut all_ids: Vec<i32> = Vec::new();
        for appointment in &appointments.items {
            for id in appointment.activity_ids() {
                if !all_ids.contains(&id) {
                    all_ids.push(id);
                }
            }
        }
        let resolved = self.activities.find_by_ids(&all_ids).await?;

        Ok(appointments.map(|appointment| {
            let activities = appointment
                .activity_ids()
                .iter()
                .filter_map(|id| resolved.iter().find(|a| a.id == *id).cloned())
                .collect();
            AppointmentDetails {
                appointment,
                activities,
            }
        }))
    }

    /// Summaries of the appointments booked for one activity.
    pub async fn list_for_activity(
        &self,
        activity_id: i32,
    ) -> DomainResult<Vec<AppointmentSummary>> {
        self.appointments.find_by_activity(activity_id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Book a new appointment for the caller.
    ///
    /// Any authenticated user may create an appointment they own, so no
    /// ownership guard applies here.
    pub async fn create(
        &self,
        start_time: DateTime<Utc>,
        activity_ids: &[i32],
        caller: &CallerContext,
    ) -> DomainResult<AppointmentDetails> {
        let activities = self.resolve_activities(activity_ids).await?;
        let ids: Vec<i32> = activities.iter().map(|a| a.id).collect();

        let slot = TimeSlot::from_start(start_time, activities.iter().map(|a| a.duration));
        self.ensure_clear(&slot, &caller.user_id, &ids, None).await?;

        let created = self
            .appointments
            .insert(NewAppointment {
                slot,
                user_id: caller.user_id.clone(),
                activity_ids: ids,
            })
            .await?;

        metrics::counter!("rushhour_appointments_created_total").increment(1);
        info!(
            appointment_id = created.id,
            user_id = %created.user_id,
            start = %created.slot.start,
            end = %created.slot.end,
            "Appointment booked"
        );

        Ok(AppointmentDetails {
            appointment: created,
            activities,
        })
    }

    /// Re-schedule an appointment and/or change its activity set.
    ///
    /// The persisted links are reconciled against the request so that link
    /// identities survive whenever their activity is re-requested, and the
    /// appointment's own prior state is excluded from the conflict check.
    pub async fn update(
        &self,
        id: i32,
        start_time: DateTime<Utc>,
        activity_ids: &[i32],
        caller: &CallerContext,
    ) -> DomainResult<AppointmentDetails> {
        let existing = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", id))?;
        authorize_owner(caller, &existing.user_id, "update")?;

        let activities = self.resolve_activities(activity_ids).await?;
        let requested: Vec<i32> = activities.iter().map(|a| a.id).collect();
        let delta = reconcile(&existing.links, &requested);

        let slot = TimeSlot::from_start(start_time, activities.iter().map(|a| a.duration));
        self.ensure_clear(&slot, &existing.user_id, &delta.activity_ids(), Some(id))
            .await?;

        let candidate = Appointment {
            slot,
            updated_at: Utc::now(),
            ..existing
        };
        let updated = self.appointments.update(&candidate, &delta).await?;

        info!(
            appointment_id = updated.id,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "Appointment updated"
        );

        Ok(AppointmentDetails {
            appointment: updated,
            activities,
        })
    }

    /// Cancel an appointment; its links are deleted with it.
    pub async fn delete(&self, id: i32, caller: &CallerContext) -> DomainResult<()> {
        let existing = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Appointment", id))?;
        authorize_owner(caller, &existing.user_id, "delete")?;

        self.appointments.delete(id).await?;
        info!(appointment_id = id, "Appointment deleted");
        Ok(())
    }

    // ── Gates ───────────────────────────────────────────────────

    /// Resolve the requested activity ids, in request order with duplicates
    /// collapsed. Fails on the first id that does not exist.
    async fn resolve_activities(&self, activity_ids: &[i32]) -> DomainResult<Vec<Activity>> {
        let mut ids: Vec<i32> = Vec::with_capacity(activity_ids.len());
        for &id in activity_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Err(DomainError::Validation(
                "An appointment must include at least one activity".into(),
            ));
        }

        let found = self.activities.find_by_ids(&ids).await?;
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let activity = found
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Activity", id))?;
            resolved.push(activity);
        }
        Ok(resolved)
    }

    /// Reject the candidate slot if any stored appointment overlaps it and
    /// shares the user or an activity.
    async fn ensure_clear(
        &self,
        slot: &TimeSlot,
        user_id: &str,
        activity_ids: &[i32],
        exclude_id: Option<i32>,
    ) -> DomainResult<()> {
        let conflicts = self
            .appointments
            .find_overlapping(slot, user_id, activity_ids, exclude_id)
            .await?;
        if conflicts.is_empty() {
            return Ok(());
        }

        metrics::counter!("rushhour_scheduling_conflicts_total").increment(1);
        warn!(
            user_id,
            slot = %slot,
            conflicts = conflicts.len(),
            "Rejected overlapping booking"
        );
        Err(DomainError::SchedulingConflict {
            start: slot.start,
            end: slot.end,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{activity, caller, InMemoryStore};
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    fn service() -> AppointmentService<InMemoryStore, InMemoryStore> {
        let store = Arc::new(InMemoryStore::default());
        AppointmentService::new(store.clone(), store)
    }

    /// The §8 scenario fixtures: A = 60 min / 59.99, B = 30 min / 20.
    fn seed_scenario(svc: &AppointmentService<InMemoryStore, InMemoryStore>) {
        svc.activities
            .seed_activity(activity(1, "Massage", 60, Decimal::new(5999, 2)));
        svc.activities
            .seed_activity(activity(2, "Sauna", 30, Decimal::new(2000, 2)));
        svc.activities
            .seed_activity(activity(3, "Yoga", 45, Decimal::new(1500, 2)));
    }

    #[tokio::test]
    async fn end_time_is_derived_from_activity_durations() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc
            .create(at(10, 0), &[1, 2], &caller("u1"))
            .await
            .unwrap();

        assert_eq!(booked.appointment.slot.start, at(10, 0));
        assert_eq!(booked.appointment.slot.end, at(11, 30));
        assert_eq!(booked.activities.len(), 2);
    }

    #[tokio::test]
    async fn same_user_overlap_is_rejected() {
        let svc = service();
        seed_scenario(&svc);

        svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();

        // 11:00–11:30 overlaps [10:00, 11:30) and shares the user.
        let err = svc.create(at(11, 0), &[2], &caller("u1")).await.unwrap_err();
        assert!(matches!(err, DomainError::SchedulingConflict { .. }));
    }

    #[tokio::test]
    async fn shared_activity_overlap_is_rejected_across_users() {
        let svc = service();
        seed_scenario(&svc);

        svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap();

        // Different user, same activity, overlapping time.
        let err = svc.create(at(10, 30), &[1], &caller("u2")).await.unwrap_err();
        assert!(matches!(err, DomainError::SchedulingConflict { .. }));
    }

    #[tokio::test]
    async fn unrelated_user_and_activity_may_overlap_in_time() {
        let svc = service();
        seed_scenario(&svc);

        svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();

        // Overlaps in time, but no shared user or activity.
        let booked = svc.create(at(10, 30), &[3], &caller("u2")).await.unwrap();
        assert_eq!(booked.appointment.user_id, "u2");
    }

    #[tokio::test]
    async fn touching_appointments_do_not_conflict() {
        let svc = service();
        seed_scenario(&svc);

        svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap(); // ends 11:00
        let booked = svc.create(at(11, 0), &[1], &caller("u1")).await.unwrap();
        assert_eq!(booked.appointment.slot.start, at(11, 0));
    }

    #[tokio::test]
    async fn update_excludes_own_prior_state_from_conflicts() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();

        // Shift by 30 minutes: still overlaps the prior [10:00, 11:30) state,
        // which must not count against itself.
        let updated = svc
            .update(booked.appointment.id, at(10, 30), &[1, 2], &caller("u1"))
            .await
            .unwrap();
        assert_eq!(updated.appointment.slot.start, at(10, 30));
        assert_eq!(updated.appointment.slot.end, at(12, 0));
    }

    #[tokio::test]
    async fn update_still_conflicts_with_other_appointments() {
        let svc = service();
        seed_scenario(&svc);

        svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap();
        let second = svc.create(at(12, 0), &[1], &caller("u1")).await.unwrap();

        // Moving the second booking onto the first must fail.
        let err = svc
            .update(second.appointment.id, at(10, 30), &[1], &caller("u1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SchedulingConflict { .. }));
    }

    #[tokio::test]
    async fn update_preserves_link_identity_for_kept_activities() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();
        let original_links = booked.appointment.links.clone();

        // Swap activity 2 for 3; the link for activity 1 must survive as-is.
        let updated = svc
            .update(booked.appointment.id, at(10, 0), &[1, 3], &caller("u1"))
            .await
            .unwrap();

        let kept = updated
            .appointment
            .links
            .iter()
            .find(|l| l.activity_id == 1)
            .unwrap();
        let original = original_links.iter().find(|l| l.activity_id == 1).unwrap();
        assert_eq!(kept.id, original.id);

        assert!(updated.appointment.links.iter().all(|l| l.activity_id != 2));
        assert!(updated.appointment.links.iter().any(|l| l.activity_id == 3));
        assert_eq!(updated.appointment.links.len(), 2);
    }

    #[tokio::test]
    async fn update_recomputes_end_time_from_new_activity_set() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();
        let updated = svc
            .update(booked.appointment.id, at(10, 0), &[2], &caller("u1"))
            .await
            .unwrap();
        assert_eq!(updated.appointment.slot.end, at(10, 30));
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap();

        let err = svc
            .update(booked.appointment.id, at(12, 0), &[1], &caller("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = svc
            .delete(booked.appointment.id, &caller("u2"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admin_may_mutate_other_users_appointments() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap();
        let admin = CallerContext {
            user_id: "boss".into(),
            email: "boss@example.com".into(),
            role: crate::domain::UserRole::Admin,
        };

        svc.update(booked.appointment.id, at(13, 0), &[1], &admin)
            .await
            .unwrap();
        svc.delete(booked.appointment.id, &admin).await.unwrap();
        assert!(matches!(
            svc.get(booked.appointment.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_activity_fails_before_any_write() {
        let svc = service();
        seed_scenario(&svc);

        let err = svc.create(at(10, 0), &[1, 99], &caller("u1")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "Activity",
                ..
            }
        ));
        assert!(svc.list(1, 10).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn empty_activity_list_is_invalid_input() {
        let svc = service();
        seed_scenario(&svc);

        let err = svc.create(at(10, 0), &[], &caller("u1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_activity_ids_collapse_to_one_link() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1, 1], &caller("u1")).await.unwrap();
        assert_eq!(booked.appointment.links.len(), 1);
        // Duration counted once: 60 minutes, not 120.
        assert_eq!(booked.appointment.slot.end, at(11, 0));
    }

    #[tokio::test]
    async fn delete_of_missing_appointment_is_not_found() {
        let svc = service();
        let err = svc.delete(404, &caller("u1")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "Appointment",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn delete_removes_links_with_the_appointment() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1, 2], &caller("u1")).await.unwrap();
        svc.delete(booked.appointment.id, &caller("u1")).await.unwrap();

        assert!(svc.list_for_activity(1).await.unwrap().is_empty());
        assert!(svc.list_for_activity(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_for_activity_reports_booked_appointments() {
        let svc = service();
        seed_scenario(&svc);

        let booked = svc.create(at(10, 0), &[1], &caller("u1")).await.unwrap();
        let summaries = svc.list_for_activity(1).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, booked.appointment.id);
    }
}
