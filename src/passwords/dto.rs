use serde::Deserialize;

/// Request body for the reset-request step.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

/// Query parameter on the emailed link.
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub token: String,
}

/// Request body for redeeming a reset token.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub token: String,
    pub new_password: String,
}

/// Request body for an authenticated direct password change.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}
