//! Account activity log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jolananas_core::{ActivityId, UserId};

/// What happened on the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Register,
    Login,
    Logout,
    ProfileUpdated,
    AddressCreated,
    AddressUpdated,
    AddressDeleted,
    CheckoutCreated,
}

impl ActivityKind {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::ProfileUpdated => "profile_updated",
            Self::AddressCreated => "address_created",
            Self::AddressUpdated => "address_updated",
            Self::AddressDeleted => "address_deleted",
            Self::CheckoutCreated => "checkout_created",
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Self::Register),
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "profile_updated" => Ok(Self::ProfileUpdated),
            "address_created" => Ok(Self::AddressCreated),
            "address_updated" => Ok(Self::AddressUpdated),
            "address_deleted" => Ok(Self::AddressDeleted),
            "checkout_created" => Ok(Self::CheckoutCreated),
            other => Err(format!("unknown activity kind: {other}")),
        }
    }
}

/// One entry of the activity log.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: ActivityId,
    pub user_id: UserId,
    pub kind: ActivityKind,
    pub detail: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip_matches_serde() {
        for kind in [
            ActivityKind::Register,
            ActivityKind::Login,
            ActivityKind::Logout,
            ActivityKind::ProfileUpdated,
            ActivityKind::AddressCreated,
            ActivityKind::AddressUpdated,
            ActivityKind::AddressDeleted,
            ActivityKind::CheckoutCreated,
        ] {
            assert_eq!(kind.as_str().parse::<ActivityKind>().unwrap(), kind);
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
        assert!("purchase".parse::<ActivityKind>().is_err());
    }
}
