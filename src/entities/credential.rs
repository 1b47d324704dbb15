// 🔑 Credential Entity - admin shell accounts ("usuarios")
//
// The credential list is a static JSON file, so this is a demo login and not
// a credential store. Hashes are unsalted SHA-256 hex digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::{require, Record};

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Holds every permission
    Admin,

    /// Any other role name, compared verbatim
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Other(name) => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Admin grants everything; other roles only themselves
    pub fn grants(&self, wanted: &str) -> bool {
        self.is_admin() || self.as_str() == wanted
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == "admin" {
            Role::Admin
        } else {
            Role::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CREDENTIAL
// ============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub nome: String,
    pub role: Role,
    #[serde(default)]
    pub ativo: bool,
}

impl Credential {
    /// Hex digest stored in `passwordHash`
    pub fn hash_password(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Username, password and active flag must all match
    pub fn accepts(&self, username: &str, password: &str) -> bool {
        self.ativo
            && self.username == username
            && self.password_hash.eq_ignore_ascii_case(&Self::hash_password(password))
    }
}

// Keep the hash out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("nome", &self.nome)
            .field("role", &self.role)
            .field("ativo", &self.ativo)
            .finish()
    }
}

impl Record for Credential {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("username", &self.username)?;
        require("passwordHash", &self.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(ativo: bool) -> Credential {
        Credential {
            id: "1".to_string(),
            username: "admin".to_string(),
            password_hash: Credential::hash_password("password"),
            nome: "Administrador".to_string(),
            role: Role::Admin,
            ativo,
        }
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            Credential::hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_accepts_requires_active_and_matching_password() {
        assert!(credential(true).accepts("admin", "password"));
        assert!(!credential(true).accepts("admin", "wrong"));
        assert!(!credential(true).accepts("other", "password"));
        assert!(!credential(false).accepts("admin", "password"));
    }

    #[test]
    fn test_role_grants() {
        let editor = Role::from("editor".to_string());
        assert!(editor.grants("editor"));
        assert!(!editor.grants("admin"));
        assert!(Role::Admin.grants("editor"));
    }

    #[test]
    fn test_debug_hides_hash() {
        let text = format!("{:?}", credential(true));
        assert!(!text.contains("5e88"));
    }
}
