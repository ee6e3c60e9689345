//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed role set; stored in Postgres as the `user_role` enum.
///
/// There is no hierarchy: role-gated endpoints compare for exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Resident,
    Manager,
    Staff,
}

impl Role {
    /// Parse a role from its lowercase wire/database form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "resident" => Some(Self::Resident),
            "manager" => Some(Self::Manager),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl Default for Role {
    /// New registrations default to the least privileged role.
    fn default() -> Self {
        Self::Resident
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_roles() {
        assert_eq!(Role::parse("resident"), Some(Role::Resident));
        assert_eq!(Role::parse("manager"), Some(Role::Manager));
        assert_eq!(Role::parse("staff"), Some(Role::Staff));
    }

    #[test]
    fn parse_rejects_unknown_roles() {
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Manager"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn default_role_is_resident() {
        assert_eq!(Role::default(), Role::Resident);
    }

    #[test]
    fn serde_uses_lowercase() {
        let value = serde_json::to_value(Role::Manager).unwrap();
        assert_eq!(value, serde_json::json!("manager"));
        let role: Role = serde_json::from_value(serde_json::json!("staff")).unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn display_round_trips_with_parse() {
        for role in [Role::Resident, Role::Manager, Role::Staff] {
            assert_eq!(Role::parse(&role.to_string()), Some(role));
        }
    }
}
