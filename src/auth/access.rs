use crate::auth::repo::User;
use crate::error::ApiError;

/// Role class a protected endpoint requires. Handlers declare one of these
/// and call [`Access::check`]; the whole authorization contract lives here.
#[derive(Debug, Clone, Copy)]
pub enum Access<'a> {
    /// Any resolved caller.
    Authenticated,
    /// Superusers only.
    SuperuserOnly,
    /// The account identified by `email`, or a superuser acting on it.
    AccountOwner { email: &'a str },
    /// The owner of the restaurant, or a superuser acting on it.
    RestaurantOwner { restaurant_id: i32 },
}

impl Access<'_> {
    pub fn check(&self, caller: &User) -> Result<(), ApiError> {
        match self {
            Access::Authenticated => Ok(()),
            Access::SuperuserOnly => {
                if caller.role.is_superuser() {
                    Ok(())
                } else {
                    Err(ApiError::Authorization(
                        "Only superusers can access this endpoint".into(),
                    ))
                }
            }
            Access::AccountOwner { email } => {
                // Superusers may act on any account; the override is a rule
                // of its own, not a side effect of ownership.
                if caller.role.is_superuser() || caller.email == *email {
                    Ok(())
                } else {
                    Err(ApiError::Authorization("Access denied".into()))
                }
            }
            Access::RestaurantOwner { restaurant_id } => {
                if caller.role.is_superuser() || caller.restaurant_id == Some(*restaurant_id) {
                    Ok(())
                } else {
                    Err(ApiError::Authorization("Access denied".into()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::Role;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(email: &str, role: Role, restaurant_id: Option<i32>) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: "hash".into(),
            role,
            approved: true,
            restaurant_id,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn superuser_passes_every_policy() {
        let root = user("root@cafe.test", Role::Superuser, None);
        assert!(Access::Authenticated.check(&root).is_ok());
        assert!(Access::SuperuserOnly.check(&root).is_ok());
        assert!(Access::AccountOwner {
            email: "someone@cafe.test"
        }
        .check(&root)
        .is_ok());
        assert!(Access::RestaurantOwner { restaurant_id: 42 }.check(&root).is_ok());
    }

    #[test]
    fn owner_is_not_a_superuser() {
        let owner = user("owner@cafe.test", Role::Owner, Some(1));
        let err = Access::SuperuserOnly.check(&owner).unwrap_err();
        assert!(matches!(err, ApiError::Authorization(_)));
    }

    #[test]
    fn owner_passes_own_account_only() {
        let owner = user("owner@cafe.test", Role::Owner, Some(1));
        assert!(Access::AccountOwner {
            email: "owner@cafe.test"
        }
        .check(&owner)
        .is_ok());
        assert!(matches!(
            Access::AccountOwner {
                email: "other@cafe.test"
            }
            .check(&owner)
            .unwrap_err(),
            ApiError::Authorization(_)
        ));
    }

    #[test]
    fn owner_passes_own_restaurant_only() {
        let owner = user("owner@cafe.test", Role::Owner, Some(1));
        assert!(Access::RestaurantOwner { restaurant_id: 1 }.check(&owner).is_ok());
        assert!(Access::RestaurantOwner { restaurant_id: 2 }
            .check(&owner)
            .is_err());
    }

    #[test]
    fn owner_without_restaurant_owns_nothing() {
        let owner = user("owner@cafe.test", Role::Owner, None);
        assert!(Access::RestaurantOwner { restaurant_id: 1 }
            .check(&owner)
            .is_err());
    }

    #[test]
    fn authenticated_accepts_any_resolved_caller() {
        let owner = user("owner@cafe.test", Role::Owner, Some(1));
        assert!(Access::Authenticated.check(&owner).is_ok());
    }
}
