//! Role model and its landing pages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff role of a console user
///
/// Serialized with the backend's role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Admin")]
    Admin,
    #[serde(rename = "Recepcionista", alias = "Receptionist")]
    Receptionist,
    #[serde(rename = "Mecánico", alias = "Mechanic", alias = "Mecanico")]
    Mechanic,
}

/// A role name the console does not know
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in backend id order
    pub const ALL: [Role; 3] = [Role::Admin, Role::Mechanic, Role::Receptionist];

    /// Backend role name, as persisted and sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Receptionist => "Recepcionista",
            Role::Mechanic => "Mecánico",
        }
    }

    /// Backend `rolUsuarioId` of the role
    pub fn backend_id(&self) -> i64 {
        match self {
            Role::Admin => 1,
            Role::Mechanic => 2,
            Role::Receptionist => 3,
        }
    }

    /// Role for a backend `rolUsuarioId`
    pub fn from_backend_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.backend_id() == id)
    }

    /// Default route a user of this role lands on
    pub fn landing_page(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Receptionist => "/reception/create-order",
            Role::Mechanic => "/mechanic/orders",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Admin" => Ok(Role::Admin),
            "Recepcionista" | "Receptionist" => Ok(Role::Receptionist),
            "Mecánico" | "Mecanico" | "Mechanic" => Ok(Role::Mechanic),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_pages() {
        assert_eq!(Role::Admin.landing_page(), "/admin/dashboard");
        assert_eq!(Role::Receptionist.landing_page(), "/reception/create-order");
        assert_eq!(Role::Mechanic.landing_page(), "/mechanic/orders");
    }

    #[test]
    fn test_parse_backend_and_english_names() {
        assert_eq!("Mecánico".parse::<Role>(), Ok(Role::Mechanic));
        assert_eq!("Mechanic".parse::<Role>(), Ok(Role::Mechanic));
        assert_eq!("Recepcionista".parse::<Role>(), Ok(Role::Receptionist));
        assert_eq!(
            "Cajero".parse::<Role>(),
            Err(UnknownRole("Cajero".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_backend_names() {
        let json = serde_json::to_string(&Role::Mechanic).unwrap();
        assert_eq!(json, "\"Mecánico\"");

        let role: Role = serde_json::from_str("\"Receptionist\"").unwrap();
        assert_eq!(role, Role::Receptionist);
    }

    #[test]
    fn test_backend_ids() {
        for role in Role::ALL {
            assert_eq!(Role::from_backend_id(role.backend_id()), Some(role));
        }
        assert_eq!(Role::from_backend_id(9), None);
    }
}
