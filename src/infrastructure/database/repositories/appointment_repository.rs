//! SeaORM implementation of AppointmentRepository
//!
//! The appointment row and its links are always written together in one
//! transaction, so a failed write never leaves orphaned links or a row whose
//! end time disagrees with its link set.

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::domain::{
    ActivityLink, Appointment, AppointmentRepository, AppointmentSummary, DomainError,
    DomainResult, LinkDelta, NewAppointment, Page, TimeSlot,
};
use crate::infrastructure::database::entities::{activity_appointment, appointment};

pub struct SeaOrmAppointmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAppointmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(
    m: appointment::Model,
    links: Vec<activity_appointment::Model>,
) -> Appointment {
    Appointment {
        id: m.id,
        slot: TimeSlot::new(m.start_time, m.end_time),
        user_id: m.user_id,
        links: links
            .into_iter()
            .map(|l| ActivityLink {
                id: l.id,
                activity_id: l.activity_id,
            })
            .collect(),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn model_to_summary(m: appointment::Model) -> AppointmentSummary {
    AppointmentSummary {
        id: m.id,
        slot: TimeSlot::new(m.start_time, m.end_time),
        user_id: m.user_id,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

async fn load_links<C: ConnectionTrait>(
    conn: &C,
    appointment_id: i32,
) -> DomainResult<Vec<activity_appointment::Model>> {
    activity_appointment::Entity::find()
        .filter(activity_appointment::Column::AppointmentId.eq(appointment_id))
        .order_by_asc(activity_appointment::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)
}

// ── AppointmentRepository impl ──────────────────────────────────

#[async_trait]
impl AppointmentRepository for SeaOrmAppointmentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Appointment>> {
        let Some(model) = appointment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        let links = load_links(&self.db, id).await?;
        Ok(Some(model_to_domain(model, links)))
    }

    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Appointment>> {
        let paginator = appointment::Entity::find()
            .order_by_asc(appointment::Column::Id)
            .paginate(&self.db, page_size.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;

        // One query for every link on this page.
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let links = if ids.is_empty() {
            Vec::new()
        } else {
            activity_appointment::Entity::find()
                .filter(activity_appointment::Column::AppointmentId.is_in(ids))
                .order_by_asc(activity_appointment::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err)?
        };

        let items = models
            .into_iter()
            .map(|m| {
                let own = links
                    .iter()
                    .filter(|l| l.appointment_id == m.id)
                    .cloned()
                    .collect();
                model_to_domain(m, own)
            })
            .collect();

        Ok(Page::new(items, total, page, page_size))
    }

    async fn find_by_activity(&self, activity_id: i32) -> DomainResult<Vec<AppointmentSummary>> {
        let sub = Query::select()
            .column(activity_appointment::Column::AppointmentId)
            .from(activity_appointment::Entity)
            .and_where(activity_appointment::Column::ActivityId.eq(activity_id))
            .to_owned();

        let models = appointment::Entity::find()
            .filter(appointment::Column::Id.in_subquery(sub))
            .order_by_asc(appointment::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_summary).collect())
    }

    async fn find_overlapping(
        &self,
        slot: &TimeSlot,
        user_id: &str,
        activity_ids: &[i32],
        exclude_id: Option<i32>,
    ) -> DomainResult<Vec<AppointmentSummary>> {
        debug!(
            "Overlap query for user {} over [{}, {})",
            user_id, slot.start, slot.end
        );

        // Same user OR shares an activity, in one query; the activity branch
        // is an IN-subquery against the link table.
        let mut shares = Condition::any().add(appointment::Column::UserId.eq(user_id));
        if !activity_ids.is_empty() {
            let sub = Query::select()
                .column(activity_appointment::Column::AppointmentId)
                .from(activity_appointment::Entity)
                .and_where(
                    activity_appointment::Column::ActivityId.is_in(activity_ids.to_vec()),
                )
                .to_owned();
            shares = shares.add(appointment::Column::Id.in_subquery(sub));
        }

        let mut query = appointment::Entity::find()
            // Half-open interval overlap: touching endpoints do not match.
            .filter(appointment::Column::StartTime.lt(slot.end))
            .filter(appointment::Column::EndTime.gt(slot.start))
            .filter(shares);

        if let Some(id) = exclude_id {
            query = query.filter(appointment::Column::Id.ne(id));
        }

        let models = query.all(&self.db).await.map_err(db_err)?;
        Ok(models.into_iter().map(model_to_summary).collect())
    }

    async fn insert(&self, candidate: NewAppointment) -> DomainResult<Appointment> {
        debug!(
            "Inserting appointment for user {} with {} activities",
            candidate.user_id,
            candidate.activity_ids.len()
        );

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = chrono::Utc::now();

        let row = appointment::ActiveModel {
            id: NotSet,
            start_time: Set(candidate.slot.start),
            end_time: Set(candidate.slot.end),
            user_id: Set(candidate.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = row.insert(&txn).await.map_err(db_err)?;

        if !candidate.activity_ids.is_empty() {
            let links = candidate.activity_ids.iter().map(|&activity_id| {
                activity_appointment::ActiveModel {
                    id: NotSet,
                    appointment_id: Set(inserted.id),
                    activity_id: Set(activity_id),
                }
            });
            activity_appointment::Entity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        let links = load_links(&txn, inserted.id).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(inserted, links))
    }

    async fn update(
        &self,
        appointment: &Appointment,
        delta: &LinkDelta,
    ) -> DomainResult<Appointment> {
        debug!(
            "Updating appointment {}: +{} / -{} links",
            appointment.id,
            delta.added.len(),
            delta.removed.len()
        );

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = appointment::Entity::find_by_id(appointment.id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Appointment", appointment.id))?;

        let mut active: appointment::ActiveModel = existing.into();
        active.start_time = Set(appointment.slot.start);
        active.end_time = Set(appointment.slot.end);
        active.updated_at = Set(appointment.updated_at);
        let updated = active.update(&txn).await.map_err(db_err)?;

        if !delta.removed.is_empty() {
            let removed_ids: Vec<i32> = delta.removed.iter().map(|l| l.id).collect();
            activity_appointment::Entity::delete_many()
                .filter(activity_appointment::Column::Id.is_in(removed_ids))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        if !delta.added.is_empty() {
            let links = delta.added.iter().map(|&activity_id| {
                activity_appointment::ActiveModel {
                    id: NotSet,
                    appointment_id: Set(appointment.id),
                    activity_id: Set(activity_id),
                }
            });
            activity_appointment::Entity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        let links = load_links(&txn, appointment.id).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(model_to_domain(updated, links))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting appointment {}", id);

        let txn = self.db.begin().await.map_err(db_err)?;

        // Links are removed explicitly rather than relying on the FK cascade,
        // keeping the aggregate write self-contained.
        activity_appointment::Entity::delete_many()
            .filter(activity_appointment::Column::AppointmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = appointment::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Appointment", id));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
