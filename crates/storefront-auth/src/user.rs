//! The authenticated caller.

use crate::{AuthError, Claims};
use storefront_commerce::account::Role;
use storefront_commerce::UserId;

/// Identity of the caller, passed explicitly into every service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if !self.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(())
    }

    /// Whether the caller may see a record owned by `owner`.
    pub fn can_access(&self, owner: &UserId) -> bool {
        self.is_admin() || &self.id == owner
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_is_not_admin() {
        let user = CurrentUser::new(UserId::new("u1"), Role::Customer);
        assert_eq!(user.require_admin(), Err(AuthError::InsufficientPermissions));
        assert!(user.can_access(&UserId::new("u1")));
        assert!(!user.can_access(&UserId::new("u2")));
    }

    #[test]
    fn test_admin_can_access_anything() {
        let admin = CurrentUser::new(UserId::new("a1"), Role::Admin);
        assert!(admin.require_admin().is_ok());
        assert!(admin.can_access(&UserId::new("u2")));
    }
}
