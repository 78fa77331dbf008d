//! Class management

use std::sync::Arc;

use tracing::info;

use super::activity::{self, details, ActivityLog};
use crate::domain::{
    Class, ClassInput, DomainError, DomainResult, GetUserDto, RepositoryProvider, User, UserRole,
    UserStatus,
};

#[derive(Clone)]
pub struct ClassService {
    repos: Arc<dyn RepositoryProvider>,
    activity: ActivityLog,
}

impl ClassService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            activity: ActivityLog::new(repos.clone()),
            repos,
        }
    }

    /// Ordered by grade, then name.
    pub async fn list(&self) -> DomainResult<Vec<Class>> {
        self.repos.classes().list_classes().await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Class> {
        self.repos
            .classes()
            .get_class(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Class", id))
    }

    pub async fn create(&self, actor: &User, input: ClassInput) -> DomainResult<Class> {
        self.check_teacher(input.teacher_id.as_deref()).await?;

        let class = self.repos.classes().create_class(input).await?;
        self.activity
            .record(
                &actor.id,
                activity::CLASS_CREATED,
                details([("class_id", class.id.as_str()), ("name", class.name.as_str())]),
            )
            .await;

        info!(class_id = %class.id, name = %class.name, grade = class.grade, "Class created");
        Ok(class)
    }

    pub async fn update(&self, id: &str, input: ClassInput) -> DomainResult<Class> {
        self.check_teacher(input.teacher_id.as_deref()).await?;

        let class = self
            .repos
            .classes()
            .update_class(id, input)
            .await?
            .ok_or_else(|| DomainError::not_found("Class", id))?;

        info!(class_id = %class.id, "Class updated");
        Ok(class)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        if !self.repos.classes().delete_class(id).await? {
            return Err(DomainError::not_found("Class", id));
        }
        info!(class_id = id, "Class deleted");
        Ok(())
    }

    /// Approved students assigned to the class. Refreshes the stored
    /// `student_count` as a side effect.
    pub async fn roster(&self, id: &str) -> DomainResult<Vec<User>> {
        let class = self.get(id).await?;

        let students = self
            .repos
            .users()
            .list_users(GetUserDto {
                role: Some(UserRole::Student),
                status: Some(UserStatus::Approved),
                class_id: Some(class.id.clone()),
            })
            .await?;

        let count = i32::try_from(students.len()).unwrap_or(i32::MAX);
        if count != class.student_count {
            self.repos.classes().set_student_count(&class.id, count).await?;
        }

        Ok(students)
    }

    async fn check_teacher(&self, teacher_id: Option<&str>) -> DomainResult<()> {
        let Some(teacher_id) = teacher_id else {
            return Ok(());
        };

        match self.repos.users().get_user_by_id(teacher_id).await? {
            Some(user) if user.role == UserRole::Teacher => Ok(()),
            _ => Err(DomainError::not_found("Teacher", teacher_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateUserDto;
    use crate::test_support::{repos, seed_user};

    #[tokio::test]
    async fn roster_counts_only_approved_students() {
        let repos = repos().await;
        let svc = ClassService::new(repos.clone());
        let admin = seed_user(&repos, "root", UserRole::Admin, UserStatus::Approved).await;

        let class = svc
            .create(
                &admin,
                ClassInput {
                    name: "5A".into(),
                    grade: 5,
                    teacher_id: None,
                },
            )
            .await
            .unwrap();

        for (name, status) in [
            ("s1", UserStatus::Approved),
            ("s2", UserStatus::Approved),
            ("s3", UserStatus::Pending),
        ] {
            repos
                .users()
                .create_user(CreateUserDto {
                    email: format!("{}@school.test", name),
                    username: name.into(),
                    full_name: name.into(),
                    password_hash: "x".into(),
                    role: UserRole::Student,
                    status,
                    class_id: Some(class.id.clone()),
                })
                .await
                .unwrap();
        }

        let roster = svc.roster(&class.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(svc.get(&class.id).await.unwrap().student_count, 2);
    }

    #[tokio::test]
    async fn teacher_reference_must_be_a_teacher() {
        let repos = repos().await;
        let svc = ClassService::new(repos.clone());
        let admin = seed_user(&repos, "root", UserRole::Admin, UserStatus::Approved).await;
        let student = seed_user(&repos, "kid", UserRole::Student, UserStatus::Approved).await;
        let teacher = seed_user(&repos, "ann", UserRole::Teacher, UserStatus::Approved).await;

        let bad = svc
            .create(
                &admin,
                ClassInput {
                    name: "6B".into(),
                    grade: 6,
                    teacher_id: Some(student.id),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(bad, DomainError::NotFound { entity: "Teacher", .. }));

        let ok = svc
            .create(
                &admin,
                ClassInput {
                    name: "6B".into(),
                    grade: 6,
                    teacher_id: Some(teacher.id.clone()),
                },
            )
            .await
            .unwrap();
        assert_eq!(ok.teacher_id.as_deref(), Some(teacher.id.as_str()));

        let missing = svc.delete("nope").await.unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { .. }));
    }
}
