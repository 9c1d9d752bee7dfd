//! Optional class / field restriction for a reverse search

use serde::{Deserialize, Serialize};

/// Restricts a search to ACEs on one class, optionally one field of it.
///
/// A field restriction without a class restriction is rejected at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AceFilter {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

impl AceFilter {
    /// No restriction
    pub fn none() -> Self {
        Self::default()
    }

    pub fn class(class: impl Into<String>) -> Self {
        AceFilter { class: Some(class.into()), field: None }
    }

    pub fn class_field(class: impl Into<String>, field: impl Into<String>) -> Self {
        AceFilter { class: Some(class.into()), field: Some(field.into()) }
    }

    /// Builder-style field restriction
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Class restriction, with empty strings treated as unset
    #[inline]
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref().filter(|c| !c.is_empty())
    }

    /// Field restriction, with empty strings treated as unset
    #[inline]
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref().filter(|f| !f.is_empty())
    }
}
