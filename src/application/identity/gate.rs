//! Role gate
//!
//! Authorization checks applied to an already verified account. Admins
//! pass every role check as a flat special case; there is no hierarchy
//! between teacher and student.

use crate::domain::{DomainError, DomainResult, User, UserRole};

pub const NOT_APPROVED: &str = "User account not approved";
pub const NOT_PERMITTED: &str = "Not enough permissions";

/// Fails with `AccountNotApproved` unless the account has been approved.
pub fn require_approved(user: &User) -> DomainResult<&User> {
    if user.is_approved() {
        Ok(user)
    } else {
        Err(DomainError::AccountNotApproved(NOT_APPROVED.to_string()))
    }
}

/// Approved accounts with `required` role, or any approved admin.
pub fn require_role(user: &User, required: UserRole) -> DomainResult<&User> {
    require_approved(user)?;
    if user.role == required || user.is_admin() {
        Ok(user)
    } else {
        Err(DomainError::Forbidden(NOT_PERMITTED.to_string()))
    }
}

/// Ownership check for author-scoped resources; admins always pass.
pub fn require_owner_or_admin(user: &User, owner_id: &str) -> DomainResult<()> {
    if user.id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(NOT_PERMITTED.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use chrono::Utc;

    fn account(role: UserRole, status: UserStatus) -> User {
        User {
            id: "u-1".into(),
            email: "u@school.test".into(),
            username: "u".into(),
            full_name: "U".into(),
            password_hash: String::new(),
            role,
            status,
            class_id: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn role_matrix() {
        for role in UserRole::ALL {
            for required in UserRole::ALL {
                let approved = account(role, UserStatus::Approved);
                let allowed = role == required || role == UserRole::Admin;
                match require_role(&approved, required) {
                    Ok(_) => assert!(allowed, "{role} should not pass {required}"),
                    Err(DomainError::Forbidden(_)) => {
                        assert!(!allowed, "{role} should pass {required}")
                    }
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn unapproved_accounts_never_pass() {
        for role in UserRole::ALL {
            for status in [UserStatus::Pending, UserStatus::Rejected] {
                let user = account(role, status);
                assert!(matches!(
                    require_approved(&user),
                    Err(DomainError::AccountNotApproved(_))
                ));
                for required in UserRole::ALL {
                    assert!(matches!(
                        require_role(&user, required),
                        Err(DomainError::AccountNotApproved(_))
                    ));
                }
            }
        }
    }

    #[test]
    fn teacher_does_not_pass_student_gate() {
        let teacher = account(UserRole::Teacher, UserStatus::Approved);
        assert!(require_role(&teacher, UserRole::Student).is_err());
    }

    #[test]
    fn ownership() {
        let teacher = account(UserRole::Teacher, UserStatus::Approved);
        assert!(require_owner_or_admin(&teacher, "u-1").is_ok());
        assert!(require_owner_or_admin(&teacher, "u-2").is_err());

        let admin = account(UserRole::Admin, UserStatus::Approved);
        assert!(require_owner_or_admin(&admin, "u-2").is_ok());
    }
}
