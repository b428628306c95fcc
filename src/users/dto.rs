use serde::Deserialize;

use crate::auth::repo::Role;

/// Superuser-created account with an explicit role.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct ApproveUserRequest {
    pub email: String,
}
