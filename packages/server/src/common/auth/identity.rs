use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::ActorId;

/// Roles known to the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "DONANTE")]
    Donor,
    #[serde(rename = "ADMINISTRADOR")]
    Administrator,
    #[serde(rename = "ORGANIZACION")]
    Organization,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Donor => write!(f, "DONANTE"),
            Role::Administrator => write!(f, "ADMINISTRADOR"),
            Role::Organization => write!(f, "ORGANIZACION"),
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DONANTE" => Ok(Role::Donor),
            "ADMINISTRADOR" => Ok(Role::Administrator),
            "ORGANIZACION" => Ok(Role::Organization),
            other => Err(anyhow::anyhow!("Invalid role: {}", other)),
        }
    }
}

/// The acting identity for a single call.
///
/// Passed explicitly into every activity; nothing in the core caches who is
/// logged in between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub actor_id: ActorId,
    pub role: Role,
}

impl Identity {
    pub fn new(actor_id: ActorId, role: Role) -> Self {
        Self { actor_id, role }
    }

    pub fn donor(actor_id: ActorId) -> Self {
        Self::new(actor_id, Role::Donor)
    }

    pub fn administrator(actor_id: ActorId) -> Self {
        Self::new(actor_id, Role::Administrator)
    }

    pub fn organization(actor_id: ActorId) -> Self {
        Self::new(actor_id, Role::Organization)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}
