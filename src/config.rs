//! Schema configuration: the table names the ACL storage uses

use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};

/// Names of the four ACL tables queried by the reverse search.
///
/// There are no defaults; the storage engine that owns the schema decides.
/// Field names match the usual ACL provider option keys so an options map
/// deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclTables {
    pub entry_table_name: String,
    pub oid_table_name: String,
    pub class_table_name: String,
    pub sid_table_name: String,
}

impl AclTables {
    /// Build and validate a table-name set
    pub fn new(
        entry_table_name: impl Into<String>,
        oid_table_name: impl Into<String>,
        class_table_name: impl Into<String>,
        sid_table_name: impl Into<String>,
    ) -> Result<Self> {
        let tables = AclTables {
            entry_table_name: entry_table_name.into(),
            oid_table_name: oid_table_name.into(),
            class_table_name: class_table_name.into(),
            sid_table_name: sid_table_name.into(),
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Check every name is a plain SQL identifier.
    ///
    /// Table names are spliced into the query text, they cannot be bound.
    pub fn validate(&self) -> Result<()> {
        for name in [
            &self.entry_table_name,
            &self.oid_table_name,
            &self.class_table_name,
            &self.sid_table_name,
        ] {
            if !is_identifier(name) {
                return Err(AclError::InvalidTableName(name.clone()));
            }
        }
        Ok(())
    }
}

#[inline]
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}
