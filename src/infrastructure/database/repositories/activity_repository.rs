//! SeaORM implementation of ActivityRepository

use async_trait::async_trait;
use chrono::Duration;
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{
    Activity, ActivityDraft, ActivityRepository, DomainError, DomainResult, Page,
};
use crate::infrastructure::database::entities::activity;

pub struct SeaOrmActivityRepository {
    db: DatabaseConnection,
}

impl SeaOrmActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: activity::Model) -> Activity {
    Activity {
        id: m.id,
        name: m.name,
        duration: Duration::minutes(m.duration_minutes),
        price: Decimal::new(m.price_cents, 2),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Prices are stored as whole cents; anything finer than two decimal places
/// or too large for the column is rejected before the write.
fn price_to_cents(price: Decimal) -> DomainResult<i64> {
    let cents = price * Decimal::from(100);
    if cents != cents.trunc() {
        return Err(DomainError::Validation(
            "Price cannot have more than two decimal places".into(),
        ));
    }
    cents
        .to_i64()
        .ok_or_else(|| DomainError::Validation("Price out of range".into()))
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── ActivityRepository impl ─────────────────────────────────────

#[async_trait]
impl ActivityRepository for SeaOrmActivityRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Activity>> {
        let model = activity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Activity>> {
        let model = activity::Entity::find()
            .filter(activity::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Activity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = activity::Entity::find()
            .filter(activity::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<Activity>> {
        let paginator = activity::Entity::find()
            .order_by_asc(activity::Column::Id)
            .paginate(&self.db, page_size.max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(db_err)?;
        Ok(Page::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page,
            page_size,
        ))
    }

    async fn insert(&self, draft: ActivityDraft) -> DomainResult<Activity> {
        debug!("Inserting activity: {}", draft.name);

        let now = chrono::Utc::now();
        let model = activity::ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            duration_minutes: Set(draft.duration.num_minutes()),
            price_cents: Set(price_to_cents(draft.price)?),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, a: &Activity) -> DomainResult<Activity> {
        debug!("Updating activity: {}", a.id);

        let existing = activity::Entity::find_by_id(a.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Activity", a.id))?;

        let mut active: activity::ActiveModel = existing.into();
        active.name = Set(a.name.clone());
        active.duration_minutes = Set(a.duration.num_minutes());
        active.price_cents = Set(price_to_cents(a.price)?);
        active.updated_at = Set(a.updated_at);
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = activity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Activity", id));
        }
        Ok(())
    }
}
