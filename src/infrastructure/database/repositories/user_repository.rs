use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use super::db_err;
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, User, UserRepositoryInterface,
    UserRole, UserStatus,
};
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

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Teacher => UserRole::Teacher,
        user::UserRole::Student => UserRole::Student,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Teacher => user::UserRole::Teacher,
        UserRole::Student => user::UserRole::Student,
    }
}

fn entity_status_to_domain(status: user::UserStatus) -> UserStatus {
    match status {
        user::UserStatus::Pending => UserStatus::Pending,
        user::UserStatus::Approved => UserStatus::Approved,
        user::UserStatus::Rejected => UserStatus::Rejected,
    }
}

fn domain_status_to_entity(status: UserStatus) -> user::UserStatus {
    match status {
        UserStatus::Pending => user::UserStatus::Pending,
        UserStatus::Approved => user::UserStatus::Approved,
        UserStatus::Rejected => user::UserStatus::Rejected,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        full_name: model.full_name,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        status: entity_status_to_domain(model.status),
        class_id: model.class_id,
        created_at: model.created_at,
        last_login: model.last_login,
    }
}

fn filtered(dto: &GetUserDto) -> Select<user::Entity> {
    let mut query = user::Entity::find();

    if let Some(role) = dto.role {
        query = query.filter(user::Column::Role.eq(domain_role_to_entity(role)));
    }
    if let Some(status) = dto.status {
        query = query.filter(user::Column::Status.eq(domain_status_to_entity(status)));
    }
    if let Some(ref class_id) = dto.class_id {
        query = query.filter(user::Column::ClassId.eq(class_id.as_str()));
    }

    query
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(dto.email),
            username: Set(dto.username),
            full_name: Set(dto.full_name),
            password_hash: Set(dto.password_hash),
            role: Set(domain_role_to_entity(dto.role)),
            status: Set(domain_status_to_entity(dto.status)),
            class_id: Set(dto.class_id),
            created_at: Set(Utc::now()),
            last_login: Set(None),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| match db_err(e) {
            DomainError::Conflict(_) => {
                DomainError::Conflict("Username or email already registered".to_string())
            }
            other => other,
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<Vec<User>> {
        let models = filtered(&dto)
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn count_users(&self, dto: GetUserDto) -> DomainResult<u64> {
        filtered(&dto).count(&self.db).await.map_err(db_err)
    }

    async fn transition_status(
        &self,
        id: &str,
        from: UserStatus,
        to: UserStatus,
    ) -> DomainResult<bool> {
        let result = user::Entity::update_many()
            .set(user::ActiveModel {
                status: Set(domain_status_to_entity(to)),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::Status.eq(domain_status_to_entity(from)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn update_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        user::Entity::update_many()
            .set(user::ActiveModel {
                last_login: Set(Some(at)),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<bool> {
        let result = user::Entity::update_many()
            .set(user::ActiveModel {
                password_hash: Set(password_hash.to_string()),
                ..Default::default()
            })
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::test_connection;

    fn dto(username: &str, email: &str, role: UserRole) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            username: username.to_string(),
            full_name: format!("{} Test", username),
            password_hash: "$2b$04$notarealhash".to_string(),
            role,
            status: UserStatus::Pending,
            class_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        repo.create_user(dto("alice", "a@school.test", UserRole::Admin))
            .await
            .unwrap();

        let err = repo
            .create_user(dto("alice2", "a@school.test", UserRole::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn transition_only_applies_from_expected_state() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let user = repo
            .create_user(dto("bob", "b@school.test", UserRole::Teacher))
            .await
            .unwrap();

        assert!(repo
            .transition_status(&user.id, UserStatus::Pending, UserStatus::Approved)
            .await
            .unwrap());
        // Second attempt sees the row already approved
        assert!(!repo
            .transition_status(&user.id, UserStatus::Pending, UserStatus::Rejected)
            .await
            .unwrap());

        let stored = repo.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Approved);
    }

    #[tokio::test]
    async fn password_hash_update_targets_one_account() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let user = repo
            .create_user(dto("carol", "c@school.test", UserRole::Student))
            .await
            .unwrap();

        assert!(repo.update_password_hash(&user.id, "$2b$04$newhash").await.unwrap());
        assert!(!repo.update_password_hash("missing", "$2b$04$newhash").await.unwrap());

        let stored = repo.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$2b$04$newhash");
    }

    #[tokio::test]
    async fn filters_by_role_and_status() {
        let repo = SeaOrmUserRepository::new(test_connection().await);
        let s1 = repo
            .create_user(dto("s1", "s1@school.test", UserRole::Student))
            .await
            .unwrap();
        repo.create_user(dto("s2", "s2@school.test", UserRole::Student))
            .await
            .unwrap();
        repo.create_user(dto("t1", "t1@school.test", UserRole::Teacher))
            .await
            .unwrap();
        repo.transition_status(&s1.id, UserStatus::Pending, UserStatus::Approved)
            .await
            .unwrap();

        let students = GetUserDto {
            role: Some(UserRole::Student),
            ..Default::default()
        };
        assert_eq!(repo.count_users(students).await.unwrap(), 2);

        let approved_students = GetUserDto {
            role: Some(UserRole::Student),
            status: Some(UserStatus::Approved),
            class_id: None,
        };
        let listed = repo.list_users(approved_students).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username, "s1");

        let by_either = repo
            .find_by_username_or_email("nobody", "t1@school.test")
            .await
            .unwrap();
        assert_eq!(by_either.map(|u| u.username).as_deref(), Some("t1"));
    }
}
