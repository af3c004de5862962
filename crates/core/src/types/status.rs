//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Account role as reported by the auth service.
///
/// Anything other than `ADMIN` is treated as an ordinary customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Catalog administrator.
    Admin,
    /// Ordinary customer.
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    /// Whether this role grants access to catalog management.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::User => write!(f, "USER"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// The server creates every order as `CREATED`; other values are passed
/// through untouched so newer server states still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Created,
    Other(String),
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("CREATED") {
            Self::Created
        } else {
            Self::Other(value)
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Created => "CREATED".to_string(),
            OrderStatus::Other(value) => value,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_deserialize() {
        let admin: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert!(admin.is_admin());

        let user: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(user, Role::User);

        // Unknown roles fall back to an ordinary customer
        let other: Role = serde_json::from_str("\"STAFF\"").unwrap();
        assert_eq!(other, Role::User);
    }

    #[test]
    fn test_role_from_str_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_order_status_passthrough() {
        let created: OrderStatus = serde_json::from_str("\"CREATED\"").unwrap();
        assert_eq!(created, OrderStatus::Created);

        let shipped: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(shipped.to_string(), "SHIPPED");
        assert_eq!(serde_json::to_string(&shipped).unwrap(), "\"SHIPPED\"");
    }
}
