//! Reverse-search ACL provider
//!
//! Answers "which objects, classes and fields may this subject access with
//! this permission?" with one set-based query instead of checking objects one
//! by one.
//!
//! Semantics differ from a forward check on purpose: denying ACEs are never
//! consulted, and a single matching granting ACE anywhere is enough.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{AclError, Result};
use crate::filter::AceFilter;
use crate::identity::{ObjectIdentity, SecurityIdentity};
use crate::permission::PermissionMap;
use crate::query::{self, Query, SearchMode};
use crate::shape::{shape, AllowedEntries};
use crate::store::Store;

/// Object identities grouped by class type
pub type ObjectIdentities = BTreeMap<String, Vec<ObjectIdentity>>;

/// Reverse-search provider over a [`Store`] and a [`PermissionMap`]
pub struct ReverseSearchAclProvider<S, P> {
    store: S,
    permissions: P,
}

impl<S: Store, P: PermissionMap> ReverseSearchAclProvider<S, P> {
    pub fn new(store: S, permissions: P) -> Result<Self> {
        store.tables().validate()?;
        Ok(ReverseSearchAclProvider { store, permissions })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn permissions(&self) -> &P {
        &self.permissions
    }

    /// Object identities on which `sid` holds `permission` through an
    /// object-level ACE (whole-object or field-scoped).
    ///
    /// `find_children` must be false; descendant search is not implemented.
    pub fn find_object_identities(
        &self,
        sid: &SecurityIdentity,
        permission: &str,
        filter: &AceFilter,
        find_children: bool,
    ) -> Result<ObjectIdentities> {
        let q = self.prepare(SearchMode::ObjectIdentities, sid, permission, filter, find_children)?;

        let mut result = ObjectIdentities::new();
        for row in self.store.fetch(&q)? {
            let class_type = row.require_text("class_type")?;
            let identifier = row.require_text("object_identifier")?;
            result
                .entry(class_type.to_string())
                .or_default()
                .push(ObjectIdentity::new(identifier, class_type));
        }
        Ok(result)
    }

    /// Class, class-field, object and object-field grants of `sid` for
    /// `permission`, grouped by class type.
    ///
    /// `find_children` must be false; descendant search is not implemented.
    pub fn find_allowed_entries(
        &self,
        sid: &SecurityIdentity,
        permission: &str,
        filter: &AceFilter,
        find_children: bool,
    ) -> Result<AllowedEntries> {
        let q = self.prepare(SearchMode::AllowedEntries, sid, permission, filter, find_children)?;
        shape(&self.store.fetch(&q)?)
    }

    fn prepare(
        &self,
        mode: SearchMode,
        sid: &SecurityIdentity,
        permission: &str,
        filter: &AceFilter,
        find_children: bool,
    ) -> Result<Query> {
        if find_children {
            warn!("descendant search requested for {}", sid);
            return Err(AclError::NotImplemented(
                "object identities children search is not implemented yet".into(),
            ));
        }
        let q = query::build(self.store.tables(), &self.permissions, mode, sid, permission, filter)?;
        debug!("{:?} search for {} / {}: {} params\n{}", mode, sid, permission, q.params.len(), q.sql);
        Ok(q)
    }
}
