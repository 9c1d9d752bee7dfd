//! Security identities (subjects) and object identities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AclError;

/// The subject of a reverse search: a user or a role.
///
/// Both variants live in the same identifier column of the security-identity
/// table, told apart by its `username` flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityIdentity {
    /// A user, identified by its principal class and username
    User { class: String, username: String },
    /// A role, identified by name
    Role(String),
}

impl SecurityIdentity {
    pub fn user(class: impl Into<String>, username: impl Into<String>) -> Self {
        SecurityIdentity::User { class: class.into(), username: username.into() }
    }

    pub fn role(name: impl Into<String>) -> Self {
        SecurityIdentity::Role(name.into())
    }

    /// Stored identifier: `<class>-<username>` for users, the role name for roles
    pub fn identifier(&self) -> String {
        match self {
            SecurityIdentity::User { class, username } => format!("{}-{}", class, username),
            SecurityIdentity::Role(role) => role.clone(),
        }
    }

    /// Value of the stored `username` discriminator
    #[inline]
    pub fn is_username(&self) -> bool {
        matches!(self, SecurityIdentity::User { .. })
    }
}

/// Parse from `user:<class>:<username>` or `role:<name>`.
///
/// The class may not contain `:`; the username may.
impl FromStr for SecurityIdentity {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("user", rest)) => match rest.split_once(':') {
                Some((class, username)) if !class.is_empty() && !username.is_empty() => {
                    Ok(SecurityIdentity::user(class, username))
                }
                _ => Err(AclError::UnsupportedIdentity(format!(
                    "'{}': must be 'user:<class>:<username>'",
                    s
                ))),
            },
            Some(("role", name)) if !name.is_empty() => Ok(SecurityIdentity::role(name)),
            _ => Err(AclError::UnsupportedIdentity(format!(
                "'{}': must be a user or role identity",
                s
            ))),
        }
    }
}

impl fmt::Display for SecurityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityIdentity::User { class, username } => write!(f, "user:{}:{}", class, username),
            SecurityIdentity::Role(role) => write!(f, "role:{}", role),
        }
    }
}

/// One securable object instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub identifier: String,
    pub class_type: String,
}

impl ObjectIdentity {
    pub fn new(identifier: impl Into<String>, class_type: impl Into<String>) -> Self {
        ObjectIdentity { identifier: identifier.into(), class_type: class_type.into() }
    }
}
