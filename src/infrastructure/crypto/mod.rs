//! Password hashing and session token signing

pub mod jwt;
pub mod password;
