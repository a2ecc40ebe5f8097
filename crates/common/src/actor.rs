//! Caller identity threaded explicitly through every core operation.
//!
//! The HTTP layer authenticates the request and builds an [`Actor`]; the
//! core trusts the identity but performs its own authorization checks
//! (owner vs. provider vs. admin).

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer: owns carts, orders, and bookings.
    Customer,
    /// Service provider: drives booking status for assigned bookings.
    Provider,
    /// Administrator: may act on any resource.
    Admin,
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    /// Creates a customer actor.
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    /// Creates a provider actor.
    pub fn provider(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Provider,
        }
    }

    /// Creates an admin actor.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// Returns true if this actor has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if this actor is the given user or an admin.
    pub fn owns_or_admin(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_owns_everything() {
        let admin = Actor::admin(UserId::new());
        assert!(admin.owns_or_admin(UserId::new()));
    }

    #[test]
    fn customer_owns_only_self() {
        let user = UserId::new();
        let actor = Actor::customer(user);
        assert!(actor.owns_or_admin(user));
        assert!(!actor.owns_or_admin(UserId::new()));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Provider).unwrap(), "\"provider\"");
    }
}
