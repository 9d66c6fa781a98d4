//! Members directory: the people a treasury transaction can reference.

mod import;

pub use import::{MemberImportError, MemberImporter};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Treasurer,
    Member,
}

impl MemberRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::Treasurer => "Trésorier",
            Self::Member => "Membre",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrateur" => Some(Self::Admin),
            "treasurer" | "tresorier" | "trésorier" => Some(Self::Treasurer),
            "member" | "membre" => Some(Self::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub role: MemberRole,
}

impl Member {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Read-only lookup over the externally owned member list.
pub trait MemberDirectory: Send + Sync {
    fn list(&self) -> Result<Vec<Member>, DirectoryError>;
    fn fetch(&self, id: &MemberId) -> Result<Option<Member>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("member directory unavailable: {0}")]
    Unavailable(String),
}
