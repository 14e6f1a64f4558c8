//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, Page, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_db(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Client => user::UserRole::Client,
    }
}

fn role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Client => UserRole::Client,
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        password_hash: m.password_hash,
        role: role_to_domain(m.role),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, page: u64, page_size: u64) -> DomainResult<Page<User>> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
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

    async fn insert(&self, u: User) -> DomainResult<User> {
        debug!("Inserting user: {}", u.email);

        let model = user::ActiveModel {
            id: Set(u.id),
            first_name: Set(u.first_name),
            last_name: Set(u.last_name),
            email: Set(u.email),
            password_hash: Set(u.password_hash),
            role: Set(role_to_db(u.role)),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, u: &User) -> DomainResult<User> {
        debug!("Updating user: {}", u.id);

        let existing = user::Entity::find_by_id(&u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: u.id.clone(),
            })?;

        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(u.first_name.clone());
        active.last_name = Set(u.last_name.clone());
        active.email = Set(u.email.clone());
        active.password_hash = Set(u.password_hash.clone());
        active.role = Set(role_to_db(u.role));
        active.updated_at = Set(u.updated_at);
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
