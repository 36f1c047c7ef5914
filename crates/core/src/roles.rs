//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the migrations.

pub const ROLE_HR: &str = "hr";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_STAFF: &str = "staff";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_HR, ROLE_MANAGER, ROLE_STAFF];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}
