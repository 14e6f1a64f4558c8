//! Appointment aggregate
//!
//! An appointment owns its activity links: the links are created and removed
//! with the appointment, and an update moves the persisted link set to the
//! requested one through the minimal delta computed by [`reconcile`].

use chrono::{DateTime, Utc};

use crate::domain::scheduling::TimeSlot;

/// Persisted link between an appointment and one of its activities.
///
/// Links carry their own identity. Other subsystems may reference a link row
/// by id, so reconciliation keeps an existing link whenever its activity is
/// re-requested instead of dropping and recreating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLink {
    pub id: i32,
    pub activity_id: i32,
}

/// A scheduled booking owned by one user.
///
/// The slot end is always derived from the activity durations; it is stored
/// denormalized so the overlap query can filter on it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: i32,
    pub slot: TimeSlot,
    pub user_id: String,
    pub links: Vec<ActivityLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn activity_ids(&self) -> Vec<i32> {
        self.links.iter().map(|l| l.activity_id).collect()
    }
}

/// Candidate appointment that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub slot: TimeSlot,
    pub user_id: String,
    pub activity_ids: Vec<i32>,
}

/// Trimmed view of a conflicting appointment returned by the overlap query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentSummary {
    pub id: i32,
    pub slot: TimeSlot,
    pub user_id: String,
}

/// Minimal set of link changes moving the persisted set to the requested one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkDelta {
    /// Existing links whose activity is still requested; identity survives.
    pub kept: Vec<ActivityLink>,
    /// Requested activity ids with no existing link.
    pub added: Vec<i32>,
    /// Existing links whose activity is no longer requested.
    pub removed: Vec<ActivityLink>,
}

impl LinkDelta {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Activity ids of the link set after the delta is applied.
    pub fn activity_ids(&self) -> Vec<i32> {
        self.kept
            .iter()
            .map(|l| l.activity_id)
            .chain(self.added.iter().copied())
            .collect()
    }
}

/// Reconcile the persisted links of an appointment against a newly requested
/// activity-id set.
///
/// Each existing link is matched against the request: if its activity id is
/// requested, the request entry is consumed and the link is kept as-is;
/// otherwise the link is marked for removal. Every requested id left
/// unconsumed becomes an addition. Duplicate ids in the request collapse to
/// one link, so no activity ever ends up with more than one live link per
/// appointment.
pub fn reconcile(existing: &[ActivityLink], requested: &[i32]) -> LinkDelta {
    let mut pending: Vec<i32> = Vec::with_capacity(requested.len());
    for &id in requested {
        if !pending.contains(&id) {
            pending.push(id);
        }
    }

    let mut delta = LinkDelta::default();
    for link in existing {
        match pending.iter().position(|&id| id == link.activity_id) {
            Some(pos) => {
                pending.remove(pos);
                delta.kept.push(link.clone());
            }
            None => delta.removed.push(link.clone()),
        }
    }
    delta.added = pending;
    delta
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn links(pairs: &[(i32, i32)]) -> Vec<ActivityLink> {
        pairs
            .iter()
            .map(|&(id, activity_id)| ActivityLink { id, activity_id })
            .collect()
    }

    #[test]
    fn identical_request_is_a_noop() {
        let existing = links(&[(1, 10), (2, 20), (3, 30)]);
        let delta = reconcile(&existing, &[10, 20, 30]);

        assert!(delta.is_noop());
        assert_eq!(delta.kept, existing);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn one_added_and_one_removed_is_minimal() {
        let existing = links(&[(1, 10), (2, 20), (3, 30)]);
        let delta = reconcile(&existing, &[10, 30, 40]);

        assert_eq!(delta.added, vec![40]);
        assert_eq!(delta.removed, links(&[(2, 20)]));
        // Untouched links keep their identity.
        assert_eq!(delta.kept, links(&[(1, 10), (3, 30)]));
    }

    #[test]
    fn kept_links_preserve_identity_regardless_of_request_order() {
        let existing = links(&[(7, 10), (8, 20)]);
        let delta = reconcile(&existing, &[20, 10]);

        assert!(delta.is_noop());
        assert_eq!(delta.kept, links(&[(7, 10), (8, 20)]));
    }

    #[test]
    fn all_links_removed_when_request_is_disjoint() {
        let existing = links(&[(1, 10), (2, 20)]);
        let delta = reconcile(&existing, &[30]);

        assert_eq!(delta.kept, vec![]);
        assert_eq!(delta.added, vec![30]);
        assert_eq!(delta.removed, existing);
    }

    #[test]
    fn empty_persisted_set_adds_everything() {
        let delta = reconcile(&[], &[10, 20]);
        assert_eq!(delta.added, vec![10, 20]);
        assert!(delta.kept.is_empty());
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn duplicate_request_ids_collapse_to_one_link() {
        let existing = links(&[(1, 10)]);
        let delta = reconcile(&existing, &[10, 10, 20, 20]);

        assert_eq!(delta.kept, links(&[(1, 10)]));
        assert_eq!(delta.added, vec![20]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn applied_delta_matches_the_requested_set() {
        let existing = links(&[(1, 10), (2, 20), (3, 30)]);
        let delta = reconcile(&existing, &[20, 40, 50]);

        let mut result = delta.activity_ids();
        result.sort_unstable();
        assert_eq!(result, vec![20, 40, 50]);
    }
}
