//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::models::User;

/// Request to register a user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// customer | owner | admin
    #[validate(length(min = 1))]
    pub role: String,
}

/// User details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            phone: u.phone,
            name: u.name,
            role: u.role.as_str().to_string(),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}
