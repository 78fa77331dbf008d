//! Credential and token service
//!
//! Registration, login, token verification and the admin approval flow.
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Map;
use tracing::{debug, info, warn};

use crate::application::services::activity::{self, details, ActivityLog};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, GetUserDto, RepositoryProvider, User, UserRole,
    UserStatus,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const INVALID_CREDENTIALS: &str = "Incorrect username or password";
pub const INVALID_TOKEN: &str = "Could not validate credentials";
pub const ALREADY_REGISTERED: &str = "Username or email already registered";
pub const LOGIN_NOT_APPROVED: &str = "Account not approved yet";
pub const INVALID_CURRENT_PASSWORD: &str = "Invalid current password";

/// New account request. Every registration starts out pending.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub role: UserRole,
    pub class_id: Option<String>,
}

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Clone)]
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
    activity: ActivityLog,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            activity: ActivityLog::new(repos.clone()),
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        let users = self.repos.users();

        if users
            .find_by_username_or_email(&registration.username, &registration.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(ALREADY_REGISTERED.into()));
        }

        let password_hash = hash_blocking(registration.password, self.bcrypt_cost).await?;

        let user = users
            .create_user(CreateUserDto {
                email: registration.email,
                username: registration.username,
                full_name: registration.full_name,
                password_hash,
                role: registration.role,
                status: UserStatus::Pending,
                class_id: registration.class_id,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration
                DomainError::Conflict(_) => DomainError::Conflict(ALREADY_REGISTERED.into()),
                other => other,
            })?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "New user registered, awaiting approval");
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username + password and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically. Approval is
    /// only checked once the password has verified.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();

        let Some(mut user) = users.get_user_by_username(username).await? else {
            debug!(username, "Login for unknown username");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        if !user.is_approved() {
            return Err(DomainError::AccountNotApproved(LOGIN_NOT_APPROVED.into()));
        }

        let token = create_token(&user.username, &self.jwt_config).map_err(DomainError::internal)?;

        let now = Utc::now();
        users.update_last_login(&user.id, now).await?;
        user.last_login = Some(now);

        self.activity
            .record(&user.id, activity::LOGIN, Map::new())
            .await;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }

    /// Resolve a bearer token to the current account.
    ///
    /// Approval is not checked here.
    pub async fn verify_token(&self, token: &str) -> DomainResult<User> {
        let username = verify_token(token, &self.jwt_config).map_err(|e| {
            debug!("Token rejected: {}", e);
            DomainError::Unauthorized(INVALID_TOKEN.into())
        })?;

        self.repos
            .users()
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| DomainError::Unauthorized(INVALID_TOKEN.into()))
    }

    /// Replace the caller's password after checking the current one.
    ///
    /// Tokens already issued stay valid until they expire.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if !verify_blocking(current_password.to_string(), user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "Password change with wrong current password");
            return Err(DomainError::Unauthorized(INVALID_CURRENT_PASSWORD.into()));
        }

        let password_hash = hash_blocking(new_password.to_string(), self.bcrypt_cost).await?;
        if !self
            .repos
            .users()
            .update_password_hash(&user.id, &password_hash)
            .await?
        {
            return Err(DomainError::not_found("User", &user.id));
        }

        self.activity
            .record(&user.id, activity::PASSWORD_CHANGED, Map::new())
            .await;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    // ── Approval ────────────────────────────────────────────────

    pub async fn approve_user(&self, admin: &User, user_id: &str) -> DomainResult<User> {
        self.transition(admin, user_id, UserStatus::Approved).await
    }

    pub async fn reject_user(&self, admin: &User, user_id: &str) -> DomainResult<User> {
        self.transition(admin, user_id, UserStatus::Rejected).await
    }

    async fn transition(&self, admin: &User, user_id: &str, to: UserStatus) -> DomainResult<User> {
        let users = self.repos.users();

        let current = users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        if !current.status.can_transition_to(to) {
            return Err(DomainError::Conflict(format!(
                "User is already {}",
                current.status
            )));
        }

        if !users
            .transition_status(user_id, UserStatus::Pending, to)
            .await?
        {
            return Err(DomainError::Conflict("User is no longer pending".into()));
        }

        let action = match to {
            UserStatus::Approved => activity::USER_APPROVED,
            _ => activity::USER_REJECTED,
        };
        self.activity
            .record(&admin.id, action, details([("target_user_id", user_id)]))
            .await;

        info!(user_id, admin_id = %admin.id, status = %to, "User status changed");

        users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self, filter: GetUserDto) -> DomainResult<Vec<User>> {
        self.repos.users().list_users(filter).await
    }

    pub async fn pending_users(&self) -> DomainResult<Vec<User>> {
        self.list_users(GetUserDto {
            status: Some(UserStatus::Pending),
            ..Default::default()
        })
        .await
    }

    // ── Bootstrap ───────────────────────────────────────────────

    /// Create an approved admin unless one already exists.
    ///
    /// Returns the created account, or `None` when nothing was done.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        let users = self.repos.users();

        let existing = users
            .count_users(GetUserDto {
                role: Some(UserRole::Admin),
                status: Some(UserStatus::Approved),
                class_id: None,
            })
            .await?;
        if existing > 0 {
            debug!(count = existing, "Approved admin already present");
            return Ok(None);
        }

        if users
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            warn!(username, "Bootstrap admin username or email is taken by another account");
            return Ok(None);
        }

        let password_hash = hash_blocking(password.to_string(), self.bcrypt_cost).await?;
        let admin = users
            .create_user(CreateUserDto {
                email: email.to_string(),
                username: username.to_string(),
                full_name: full_name.to_string(),
                password_hash,
                role: UserRole::Admin,
                status: UserStatus::Approved,
                class_id: None,
            })
            .await?;

        info!(user_id = %admin.id, username, "Bootstrap admin created");
        Ok(Some(admin))
    }
}

// ── Helpers ─────────────────────────────────────────────────────

async fn hash_blocking(password: String, cost: u32) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(DomainError::internal)?
        .map_err(DomainError::internal)
}

/// A malformed stored hash counts as a failed verification.
async fn verify_blocking(password: String, hash: String) -> DomainResult<bool> {
    let result = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(DomainError::internal)?;

    Ok(result.unwrap_or_else(|e| {
        warn!("Stored password hash could not be verified: {}", e);
        false
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::test_support::{jwt_config, repos, seed_user, BCRYPT_COST, PASSWORD};

    async fn service() -> (UserService, Arc<dyn RepositoryProvider>) {
        let repos = repos().await;
        (
            UserService::new(repos.clone(), jwt_config(), BCRYPT_COST),
            repos,
        )
    }

    fn registration(username: &str, email: &str, role: UserRole) -> Registration {
        Registration {
            email: email.into(),
            username: username.into(),
            full_name: "Alice Doe".into(),
            password: PASSWORD.into(),
            role,
            class_id: None,
        }
    }

    #[tokio::test]
    async fn registration_is_pending_for_every_role() {
        let (svc, _) = service().await;
        for (i, role) in UserRole::ALL.into_iter().enumerate() {
            let user = svc
                .register(registration(
                    &format!("user{}", i),
                    &format!("user{}@school.test", i),
                    role,
                ))
                .await
                .unwrap();
            assert_eq!(user.status, UserStatus::Pending);
            assert_eq!(user.role, role);
            assert_ne!(user.password_hash, PASSWORD);
        }
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let (svc, _) = service().await;
        svc.register(registration("alice", "alice@school.test", UserRole::Student))
            .await
            .unwrap();

        for dup in [
            registration("alice", "other@school.test", UserRole::Student),
            registration("alice2", "alice@school.test", UserRole::Teacher),
        ] {
            let err = svc.register(dup).await.unwrap_err();
            assert!(matches!(err, DomainError::Conflict(ref m) if m == ALREADY_REGISTERED));
        }
    }

    #[tokio::test]
    async fn login_requires_approval_after_password_check() {
        let (svc, repos) = service().await;
        seed_user(&repos, "alice", UserRole::Admin, UserStatus::Pending).await;

        let err = svc.login("alice", PASSWORD).await.unwrap_err();
        assert!(matches!(err, DomainError::AccountNotApproved(_)));

        // Wrong password on a pending account still reports bad credentials
        let err = svc.login("alice", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn bad_credentials_are_uniform() {
        let (svc, repos) = service().await;
        seed_user(&repos, "bob", UserRole::Teacher, UserStatus::Approved).await;

        let wrong_password = svc.login("bob", "wrong").await.unwrap_err();
        let unknown_user = svc.login("nobody", PASSWORD).await.unwrap_err();
        assert_eq!(wrong_password.detail(), unknown_user.detail());
        assert!(matches!(wrong_password, DomainError::Unauthorized(_)));
        assert!(matches!(unknown_user, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token_and_records_activity() {
        let (svc, repos) = service().await;
        let seeded = seed_user(&repos, "carol", UserRole::Student, UserStatus::Approved).await;

        let auth = svc.login("carol", PASSWORD).await.unwrap();
        assert_eq!(auth.token_type, "bearer");
        assert_eq!(auth.expires_in, 30 * 60);
        assert!(auth.user.last_login.is_some());

        let resolved = svc.verify_token(&auth.token).await.unwrap();
        assert_eq!(resolved.id, seeded.id);
        assert!(resolved.last_login.is_some());

        let since = Utc::now() - chrono::Duration::minutes(1);
        let logins = repos
            .activities()
            .count_since(activity::LOGIN, since)
            .await
            .unwrap();
        assert_eq!(logins, 1);
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let (svc, repos) = service().await;
        let user = seed_user(&repos, "erin", UserRole::Admin, UserStatus::Approved).await;

        let err = svc
            .change_password(&user, "not-it", "a-better-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == INVALID_CURRENT_PASSWORD));
        svc.login("erin", PASSWORD).await.unwrap();

        svc.change_password(&user, PASSWORD, "a-better-secret")
            .await
            .unwrap();

        let err = svc.login("erin", PASSWORD).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        let auth = svc.login("erin", "a-better-secret").await.unwrap();
        assert_eq!(auth.user.id, user.id);
    }

    #[tokio::test]
    async fn token_for_unknown_subject_is_unauthorized() {
        let (svc, _) = service().await;
        let token = create_token("ghost", &jwt_config()).unwrap();
        let err = svc.verify_token(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(ref m) if m == INVALID_TOKEN));

        let err = svc.verify_token("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn approval_is_terminal() {
        let (svc, repos) = service().await;
        let admin = seed_user(&repos, "root", UserRole::Admin, UserStatus::Approved).await;
        let user = seed_user(&repos, "dave", UserRole::Student, UserStatus::Pending).await;

        let approved = svc.approve_user(&admin, &user.id).await.unwrap();
        assert_eq!(approved.status, UserStatus::Approved);

        let again = svc.approve_user(&admin, &user.id).await.unwrap_err();
        assert!(matches!(again, DomainError::Conflict(_)));
        let reject = svc.reject_user(&admin, &user.id).await.unwrap_err();
        assert!(matches!(reject, DomainError::Conflict(_)));

        let missing = svc.approve_user(&admin, "no-such-id").await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));

        assert!(svc.pending_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ensure_admin_runs_once() {
        let (svc, _) = service().await;
        let created = svc
            .ensure_admin("admin", "admin@school.test", "Administrator", "secret")
            .await
            .unwrap()
            .expect("admin created");
        assert_eq!(created.role, UserRole::Admin);
        assert!(created.is_approved());

        let second = svc
            .ensure_admin("admin2", "admin2@school.test", "Administrator", "secret")
            .await
            .unwrap();
        assert!(second.is_none());

        assert!(svc.login("admin", "secret").await.is_ok());
    }
}
