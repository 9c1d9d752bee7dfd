//! Shaping flat result rows into per-class access records

use std::collections::{BTreeMap, BTreeSet};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::Row;

/// What a subject may access within one class type.
///
/// Facets are independent; empty ones are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAccess {
    /// Class-wide grant, independent of object and field
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub class_access: bool,
    /// Class-wide grants scoped to a field
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub class_field_access: BTreeSet<String>,
    /// Whole-object grants, by object identifier
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub object_access: BTreeSet<String>,
    /// Object- and field-specific grants: object identifier to field names
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub object_field_access: BTreeMap<String, BTreeSet<String>>,
}

impl ClassAccess {
    pub fn is_empty(&self) -> bool {
        !self.class_access
            && self.class_field_access.is_empty()
            && self.object_access.is_empty()
            && self.object_field_access.is_empty()
    }

    /// Whether `field` of object `identifier` is reachable through any facet
    pub fn allows_field(&self, identifier: &str, field: &str) -> bool {
        self.class_access
            || self.class_field_access.contains(field)
            || self.object_access.contains(identifier)
            || self.object_field_access.get(identifier).is_some_and(|f| f.contains(field))
    }
}

/// Class type to access record
pub type AllowedEntries = BTreeMap<String, ClassAccess>;

/// Fold rows of `(object_identifier, class_type, field_name)` into records.
///
/// Order of rows does not matter and nothing is ever removed once added.
pub fn shape(rows: &[Row]) -> Result<AllowedEntries> {
    let mut result = AllowedEntries::new();
    for row in rows {
        let class_type = row.require_text("class_type")?;
        let oid = row.text("object_identifier")?;
        let field = row.text("field_name")?;
        trace!("shaping {} oid={:?} field={:?}", class_type, oid, field);

        let access = result.entry(class_type.to_string()).or_default();
        match (oid, field) {
            (Some(oid), Some(field)) => {
                access
                    .object_field_access
                    .entry(oid.to_string())
                    .or_default()
                    .insert(field.to_string());
            }
            (Some(oid), None) => {
                access.object_access.insert(oid.to_string());
            }
            (None, Some(field)) => {
                access.class_field_access.insert(field.to_string());
            }
            (None, None) => access.class_access = true,
        }
    }
    Ok(result)
}
