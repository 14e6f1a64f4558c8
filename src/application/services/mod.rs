//! Application services
//!
//! HTTP handlers are thin wrappers; the business logic for each resource
//! lives in the service for that resource.

pub mod activity;
pub mod appointment;
pub mod identity;

pub use activity::ActivityService;
pub use appointment::{AppointmentDetails, AppointmentService};
pub use identity::{AuthResult, UserService};

/// In-memory repository doubles shared by the service test modules.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::application::guard::CallerContext;
    use crate::domain::{
        Activity, ActivityDraft, ActivityLink, ActivityRepository, Appointment,
        AppointmentRepository, AppointmentSummary, DomainError, DomainResult, LinkDelta,
        NewAppointment, Page, TimeSlot, User, UserRepository, UserRole,
    };

    pub fn caller(user_id: &str) -> CallerContext {
        CallerContext {
            user_id: user_id.into(),
            email: format!("{user_id}@example.com"),
            role: UserRole::Client,
        }
    }

    pub fn activity(id: i32, name: &str, minutes: i64, price: Decimal) -> Activity {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Activity {
            id,
            name: name.into(),
            duration: Duration::minutes(minutes),
            price,
            created_at: now,
            updated_at: now,
        }
    }

    /// One store implementing every repository trait, backed by plain
    /// mutex-guarded vectors.
    #[derive(Default)]
    pub struct InMemoryStore {
        activities: Mutex<Vec<Activity>>,
        appointments: Mutex<Vec<Appointment>>,
        users: Mutex<Vec<User>>,
        next_activity_id: AtomicI32,
        next_appointment_id: AtomicI32,
        next_link_id: AtomicI32,
    }

    impl InMemoryStore {
        pub fn seed_activity(&self, activity: Activity) {
            self.activities.lock().unwrap().push(activity);
        }

        fn next_id(counter: &AtomicI32) -> i32 {
            counter.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    #[async_trait]
    impl ActivityRepository for InMemoryStore {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<Activity>> {
            Ok(self
                .activities
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn find_by_name(&self, name: &str) -> DomainResult<Option<Activity>> {
            Ok(self
                .activities
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.name == name)
                .cloned())
        }

        async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Activity>> {
            Ok(self
                .activities
                .lock()
                .unwrap()
                .iter()
                .filter(|a| ids.contains(&a.id))
                .cloned()
                .collect())
        }

        async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Activity>> {
            let all = self.activities.lock().unwrap();
            let items = all
                .iter()
                .skip(((page.max(1) - 1) * page_size) as usize)
                .take(page_size as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, all.len() as u64, page, page_size))
        }

        async fn insert(&self, draft: ActivityDraft) -> DomainResult<Activity> {
            let now = Utc::now();
            let activity = Activity {
                id: Self::next_id(&self.next_activity_id),
                name: draft.name,
                duration: draft.duration,
                price: draft.price,
                created_at: now,
                updated_at: now,
            };
            self.activities.lock().unwrap().push(activity.clone());
            Ok(activity)
        }

        async fn update(&self, activity: &Activity) -> DomainResult<Activity> {
            let mut all = self.activities.lock().unwrap();
            let stored = all
                .iter_mut()
                .find(|a| a.id == activity.id)
                .ok_or_else(|| DomainError::not_found("Activity", activity.id))?;
            *stored = activity.clone();
            Ok(activity.clone())
        }

        async fn delete(&self, id: i32) -> DomainResult<()> {
            self.activities.lock().unwrap().retain(|a| a.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl AppointmentRepository for InMemoryStore {
        async fn find_by_id(&self, id: i32) -> DomainResult<Option<Appointment>> {
            Ok(self
                .appointments
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned())
        }

        async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Appointment>> {
            let all = self.appointments.lock().unwrap();
            let items = all
                .iter()
                .skip(((page.max(1) - 1) * page_size) as usize)
                .take(page_size as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, all.len() as u64, page, page_size))
        }

        async fn find_by_activity(&self, activity_id: i32) -> DomainResult<Vec<AppointmentSummary>> {
            Ok(self
                .appointments
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.links.iter().any(|l| l.activity_id == activity_id))
                .map(|a| AppointmentSummary {
                    id: a.id,
                    slot: a.slot,
                    user_id: a.user_id.clone(),
                })
                .collect())
        }

        async fn find_overlapping(
            &self,
            slot: &TimeSlot,
            user_id: &str,
            activity_ids: &[i32],
            exclude_id: Option<i32>,
        ) -> DomainResult<Vec<AppointmentSummary>> {
            Ok(self
                .appointments
                .lock()
                .unwrap()
                .iter()
                .filter(|a| Some(a.id) != exclude_id)
                .filter(|a| a.slot.overlaps(slot))
                .filter(|a| {
                    a.user_id == user_id
                        || a.links.iter().any(|l| activity_ids.contains(&l.activity_id))
                })
                .map(|a| AppointmentSummary {
                    id: a.id,
                    slot: a.slot,
                    user_id: a.user_id.clone(),
                })
                .collect())
        }

        async fn insert(&self, candidate: NewAppointment) -> DomainResult<Appointment> {
            let now = Utc::now();
            let appointment = Appointment {
                id: Self::next_id(&self.next_appointment_id),
                slot: candidate.slot,
                user_id: candidate.user_id,
                links: candidate
                    .activity_ids
                    .iter()
                    .map(|&activity_id| ActivityLink {
                        id: Self::next_id(&self.next_link_id),
                        activity_id,
                    })
                    .collect(),
                created_at: now,
                updated_at: now,
            };
            self.appointments.lock().unwrap().push(appointment.clone());
            Ok(appointment)
        }

        async fn update(
            &self,
            appointment: &Appointment,
            delta: &LinkDelta,
        ) -> DomainResult<Appointment> {
            let mut links = delta.kept.clone();
            links.extend(delta.added.iter().map(|&activity_id| ActivityLink {
                id: Self::next_id(&self.next_link_id),
                activity_id,
            }));

            let updated = Appointment {
                links,
                ..appointment.clone()
            };

            let mut all = self.appointments.lock().unwrap();
            let stored = all
                .iter_mut()
                .find(|a| a.id == appointment.id)
                .ok_or_else(|| DomainError::not_found("Appointment", appointment.id))?;
            *stored = updated.clone();
            Ok(updated)
        }

        async fn delete(&self, id: i32) -> DomainResult<()> {
            self.appointments.lock().unwrap().retain(|a| a.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryStore {
        async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<User>> {
            let all = self.users.lock().unwrap();
            let items = all
                .iter()
                .skip(((page.max(1) - 1) * page_size) as usize)
                .take(page_size as usize)
                .cloned()
                .collect();
            Ok(Page::new(items, all.len() as u64, page, page_size))
        }

        async fn insert(&self, user: User) -> DomainResult<User> {
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn update(&self, user: &User) -> DomainResult<User> {
            let mut all = self.users.lock().unwrap();
            let stored = all
                .iter_mut()
                .find(|u| u.id == user.id)
                .ok_or_else(|| DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: user.id.clone(),
                })?;
            *stored = user.clone();
            Ok(user.clone())
        }

        async fn delete(&self, id: &str) -> DomainResult<()> {
            self.users.lock().unwrap().retain(|u| u.id != id);
            Ok(())
        }
    }
}
