//! Closed vocabularies for user roles and address kinds.
//!
//! Both enums serialize as the lowercase strings the store has always used
//! (`"admin"`, `"client"`, `"shipping"`, ...).

use serde::{Deserialize, Serialize};

/// Role of a storefront user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Store administrator with access to the admin panel.
    Admin,
    /// Regular shopper.
    #[default]
    Client,
}

impl UserRole {
    /// Returns `true` for [`UserRole::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Client => write!(f, "client"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "client" => Ok(Self::Client),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// What an address may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    #[default]
    Shipping,
    Billing,
    Both,
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Billing => write!(f, "billing"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shipping" => Ok(Self::Shipping),
            "billing" => Ok(Self::Billing),
            "both" => Ok(Self::Both),
            _ => Err(format!("invalid address type: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_parse() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("client".parse::<UserRole>().unwrap(), UserRole::Client);
        assert!("Admin".parse::<UserRole>().is_err());
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"admin\""
        );
        let role: UserRole = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, UserRole::Client);
    }

    #[test]
    fn test_user_role_default_is_client() {
        assert_eq!(UserRole::default(), UserRole::Client);
        assert!(!UserRole::default().is_admin());
    }

    #[test]
    fn test_address_type_display_matches_parse() {
        for kind in [AddressType::Shipping, AddressType::Billing, AddressType::Both] {
            assert_eq!(kind.to_string().parse::<AddressType>().unwrap(), kind);
        }
        assert!("home".parse::<AddressType>().is_err());
    }
}
