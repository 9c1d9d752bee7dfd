//! Test fixtures: ACL schema and a minimal ACE writer.
//!
//! Stands in for the mutable ACL provider that owns these tables in
//! production; the crate itself only reads them.

#![allow(dead_code)]

use revacl::*;
use rusqlite::{params, Connection, OptionalExtension};

pub fn tables() -> AclTables {
    AclTables::new(
        "acl_entries",
        "acl_object_identities",
        "acl_classes",
        "acl_security_identities",
    )
    .unwrap()
}

pub fn install_schema(conn: &Connection, t: &AclTables) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE {classes} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_type VARCHAR(200) NOT NULL UNIQUE
        );
        CREATE TABLE {sids} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier VARCHAR(200) NOT NULL,
            username BOOLEAN NOT NULL,
            UNIQUE (identifier, username)
        );
        CREATE TABLE {oids} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            parent_object_identity_id INTEGER NULL,
            class_id INTEGER NOT NULL,
            object_identifier VARCHAR(100) NOT NULL,
            entries_inheriting BOOLEAN NOT NULL DEFAULT 1,
            UNIQUE (object_identifier, class_id)
        );
        CREATE TABLE {entries} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL,
            object_identity_id INTEGER NULL,
            field_name VARCHAR(50) NULL,
            ace_order SMALLINT NOT NULL,
            security_identity_id INTEGER NOT NULL,
            mask INTEGER NOT NULL,
            granting BOOLEAN NOT NULL,
            granting_strategy VARCHAR(30) NOT NULL,
            audit_success BOOLEAN NOT NULL DEFAULT 0,
            audit_failure BOOLEAN NOT NULL DEFAULT 0
        );
        ",
        classes = t.class_table_name,
        sids = t.sid_table_name,
        oids = t.oid_table_name,
        entries = t.entry_table_name,
    ))
}

pub type Provider = ReverseSearchAclProvider<SqliteStore, BasicPermissionMap>;

/// Fresh in-memory store with the schema installed
pub fn setup() -> Provider {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SqliteStore::open_in_memory(tables()).unwrap();
    store
        .with_connection(|c| install_schema(c, &tables()).map_err(AclError::from))
        .unwrap();
    ReverseSearchAclProvider::new(store, BasicPermissionMap::new()).unwrap()
}

pub fn jimmy() -> SecurityIdentity {
    SecurityIdentity::user("Symfony\\Component\\Security\\Core\\User\\User", "jimmy")
}

/// One ACE to write
#[derive(Debug, Clone)]
pub struct Ace {
    class_type: String,
    object: Option<String>,
    field: Option<String>,
    mask: Mask,
    granting: bool,
    strategy: GrantingStrategy,
}

impl Ace {
    fn new(class_type: &str, object: Option<&str>, field: Option<&str>, mask: Mask) -> Self {
        Ace {
            class_type: class_type.into(),
            object: object.map(String::from),
            field: field.map(String::from),
            mask,
            granting: true,
            strategy: GrantingStrategy::All,
        }
    }

    pub fn object(oid: &ObjectIdentity, mask: Mask) -> Self {
        Self::new(&oid.class_type, Some(&oid.identifier), None, mask)
    }

    pub fn object_field(oid: &ObjectIdentity, field: &str, mask: Mask) -> Self {
        Self::new(&oid.class_type, Some(&oid.identifier), Some(field), mask)
    }

    pub fn class(class_type: &str, mask: Mask) -> Self {
        Self::new(class_type, None, None, mask)
    }

    pub fn class_field(class_type: &str, field: &str, mask: Mask) -> Self {
        Self::new(class_type, None, Some(field), mask)
    }

    pub fn deny(mut self) -> Self {
        self.granting = false;
        self
    }

    pub fn strategy(mut self, strategy: GrantingStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn upsert_id(conn: &Connection, select: &str, insert: &str, p: &[&dyn rusqlite::ToSql]) -> rusqlite::Result<i64> {
    if let Some(id) = conn.query_row(select, p, |r| r.get(0)).optional()? {
        return Ok(id);
    }
    conn.execute(insert, p)?;
    Ok(conn.last_insert_rowid())
}

/// Write `ace` for `sid`, creating class, object and sid rows as needed
pub fn insert(provider: &Provider, sid: &SecurityIdentity, ace: Ace) {
    let t = tables();
    provider
        .store()
        .with_connection(|conn| {
            let class_id = upsert_id(
                conn,
                &format!("SELECT id FROM {} WHERE class_type = ?1", t.class_table_name),
                &format!("INSERT INTO {} (class_type) VALUES (?1)", t.class_table_name),
                params![ace.class_type],
            )?;
            let sid_id = upsert_id(
                conn,
                &format!("SELECT id FROM {} WHERE identifier = ?1 AND username = ?2", t.sid_table_name),
                &format!("INSERT INTO {} (identifier, username) VALUES (?1, ?2)", t.sid_table_name),
                params![sid.identifier(), sid.is_username()],
            )?;
            let oid_id = match &ace.object {
                Some(identifier) => Some(upsert_id(
                    conn,
                    &format!("SELECT id FROM {} WHERE object_identifier = ?1 AND class_id = ?2", t.oid_table_name),
                    &format!("INSERT INTO {} (object_identifier, class_id) VALUES (?1, ?2)", t.oid_table_name),
                    params![identifier, class_id],
                )?),
                None => None,
            };
            let order: i64 = conn.query_row(
                &format!("SELECT COALESCE(MAX(ace_order) + 1, 0) FROM {}", t.entry_table_name),
                [],
                |r| r.get(0),
            )?;
            conn.execute(
                &format!(
                    "INSERT INTO {} (class_id, object_identity_id, field_name, ace_order, security_identity_id, mask, granting, granting_strategy)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    t.entry_table_name
                ),
                params![class_id, oid_id, ace.field, order, sid_id, ace.mask, ace.granting, ace.strategy.tag()],
            )?;
            Ok(())
        })
        .unwrap();
}

/// Count of store rows, for asserting nothing was written or read
pub fn entry_count(provider: &Provider) -> i64 {
    let t = tables();
    provider
        .store()
        .with_connection(|c| {
            Ok(c.query_row(&format!("SELECT COUNT(*) FROM {}", t.entry_table_name), [], |r| r.get(0))?)
        })
        .unwrap()
}
