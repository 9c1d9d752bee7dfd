//! Revacl - reverse search over relational ACL storage
//!
//! A forward ACL check answers "may S do P on O?". This crate answers the
//! inverse: given a subject and a permission, which classes, class fields,
//! objects and object fields does the subject hold a grant on. The answer
//! comes from a single query against the ACE tables, with the ALL / ANY /
//! EQUAL mask strategies encoded as a SQL predicate.
//!
//! ```no_run
//! use revacl::*;
//!
//! # fn main() -> revacl::Result<()> {
//! let tables = AclTables::new("acl_entries", "acl_object_identities", "acl_classes", "acl_security_identities")?;
//! let store = SqliteStore::open("acl.db", tables)?;
//! let provider = ReverseSearchAclProvider::new(store, BasicPermissionMap::new())?;
//!
//! let sid = SecurityIdentity::user("App\\User", "jimmy");
//! let entries = provider.find_allowed_entries(&sid, "VIEW", &AceFilter::none(), false)?;
//! for (class_type, access) in &entries {
//!     println!("{}: {:?}", class_type, access.object_access);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod permission;
pub mod provider;
pub mod query;
pub mod shape;
pub mod store;

pub use config::AclTables;
pub use error::{AclError, Result};
pub use filter::AceFilter;
pub use identity::{ObjectIdentity, SecurityIdentity};
pub use permission::{
    mask_names, names_to_mask, BasicPermissionMap, GrantingStrategy, Mask, PermissionMap,
    CREATE, DELETE, EDIT, MASTER, OPERATOR, OWNER, UNDELETE, VIEW,
};
pub use provider::{ObjectIdentities, ReverseSearchAclProvider};
pub use query::{Fragment, Query, SearchMode, Value};
pub use shape::{shape, AllowedEntries, ClassAccess};
pub use store::{Row, SqliteStore, Store};
