//! User model and related functionality

use serde::{Deserialize, Serialize};

use super::Role;

/// Console user as the backend describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "rolUsuarioId")]
    pub role_id: i64,
    #[serde(rename = "rolUsuarioNombre")]
    pub role_name: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "documento", default)]
    pub document: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
}

impl User {
    /// Identity rebuilt from a token alone, before the real profile is known.
    ///
    /// Numeric ids are left at zero.
    pub fn placeholder(identity: &str, role: Role) -> Self {
        Self {
            id: 0,
            role_id: 0,
            role_name: role.as_str().to_string(),
            name: identity.to_string(),
            email: identity.to_string(),
            document: String::new(),
            phone: String::new(),
        }
    }

    /// Whether this is a placeholder identity
    pub fn is_placeholder(&self) -> bool {
        self.id == 0 && self.role_id == 0
    }

    /// Role carried by the profile, if the console knows it
    pub fn role(&self) -> Option<Role> {
        self.role_name
            .parse()
            .ok()
            .or_else(|| Role::from_backend_id(self.role_id))
    }
}

/// User login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}
