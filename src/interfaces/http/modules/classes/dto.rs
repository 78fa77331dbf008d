//! Class DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Class, ClassInput};

/// Body for creating or replacing a class
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClassRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 12, message = "grade must be between 1 and 12"))]
    pub grade: i32,
    /// Homeroom teacher; must reference a teacher account
    #[serde(default)]
    pub teacher_id: Option<String>,
}

impl From<ClassRequest> for ClassInput {
    fn from(req: ClassRequest) -> Self {
        Self {
            name: req.name,
            grade: req.grade,
            teacher_id: req.teacher_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassDto {
    pub id: String,
    pub name: String,
    pub grade: i32,
    pub teacher_id: Option<String>,
    pub student_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Class> for ClassDto {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            name: class.name,
            grade: class.grade,
            teacher_id: class.teacher_id,
            student_count: class.student_count,
            created_at: class.created_at,
        }
    }
}
