//! School class entity

use chrono::{DateTime, Utc};

/// A class (form) with an optional homeroom teacher.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub grade: i32,
    pub teacher_id: Option<String>,
    /// Number of approved students assigned to the class
    pub student_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Writable fields of a class, used for both create and replace.
#[derive(Debug, Clone)]
pub struct ClassInput {
    pub name: String,
    pub grade: i32,
    pub teacher_id: Option<String>,
}
