//! Reverse-search query construction
//!
//! Each builder returns a [`Fragment`]: a piece of SQL plus the named
//! parameters it binds. Assembly concatenates fragments into one [`Query`].
//! Table aliases are fixed: `e` entries, `o` object identities, `c` classes,
//! `s` security identities.

use crate::config::AclTables;
use crate::error::{AclError, Result};
use crate::filter::AceFilter;
use crate::identity::SecurityIdentity;
use crate::permission::{PermissionMap, STRATEGIES};

/// Scalar bound as a query parameter or read back from a row.
///
/// The variant is the parameter's type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
    Bool(bool),
}

/// SQL text plus the parameters it references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl Fragment {
    fn new(sql: impl Into<String>) -> Self {
        Fragment { sql: sql.into(), params: Vec::new() }
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.params.push((name.to_string(), value));
    }

    /// Look up a bound parameter by name (without the leading `:`)
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A complete parametrized statement, ready for a [`crate::store::Store`]
pub type Query = Fragment;

/// What a reverse search projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Object-level ACEs only, as distinct (identifier, class type) pairs
    ObjectIdentities,
    /// Class, class-field, object and object-field ACEs
    AllowedEntries,
}

/// Predicate matching granting ACEs whose mask satisfies `permission`.
///
/// For every required mask and every granting strategy a check is emitted;
/// checks of one strategy are OR-ed and guarded by the stored strategy tag,
/// the guarded groups are OR-ed, and the whole is restricted to granting rows.
/// Denying ACEs never match.
pub fn permission_predicate<P: PermissionMap + ?Sized>(map: &P, permission: &str) -> Result<Fragment> {
    if !map.contains(permission) {
        return Err(AclError::UnknownPermission(permission.to_string()));
    }
    let masks = match map.masks(permission, None) {
        Some(m) if !m.is_empty() => m,
        _ => return Err(AclError::UnknownPermission(permission.to_string())),
    };

    let mut frag = Fragment::default();
    let names: Vec<String> = masks
        .iter()
        .enumerate()
        .map(|(i, mask)| {
            let name = format!("mask{}", i);
            frag.bind(&name, Value::Integer(i64::from(*mask)));
            name
        })
        .collect();

    let groups: Vec<String> = STRATEGIES
        .iter()
        .map(|(strategy, template)| {
            let checks: Vec<String> = names
                .iter()
                .map(|n| template.replace("{mask}", &format!(":{}", n)))
                .collect();
            format!("(e.granting_strategy = '{}' AND ({}))", strategy.tag(), checks.join(" OR "))
        })
        .collect();

    frag.sql = format!("e.granting = 1 AND ({})", groups.join(" OR "));
    Ok(frag)
}

/// Join restricting entries to the given subject's security identity
pub fn subject_predicate(tables: &AclTables, sid: &SecurityIdentity) -> Result<Fragment> {
    match sid {
        SecurityIdentity::User { class, username } if class.is_empty() || username.is_empty() => {
            return Err(AclError::UnsupportedIdentity(format!(
                "user identity needs a class and a username, got '{}'",
                sid
            )));
        }
        SecurityIdentity::Role(role) if role.is_empty() => {
            return Err(AclError::UnsupportedIdentity("role identity needs a name".into()));
        }
        _ => {}
    }

    let mut frag = Fragment::new(format!(
        "INNER JOIN {} s ON e.security_identity_id = s.id AND s.identifier = :identifier AND s.username = :username",
        tables.sid_table_name
    ));
    frag.bind("identifier", Value::Text(sid.identifier()));
    frag.bind("username", Value::Bool(sid.is_username()));
    Ok(frag)
}

/// Join to the class registry, optionally restricted to one class and field
pub fn ace_filter_predicate(tables: &AclTables, filter: &AceFilter) -> Result<Fragment> {
    if filter.field_name().is_some() && filter.class_name().is_none() {
        return Err(AclError::InvalidFilter(
            "class restriction required when filtering by field".into(),
        ));
    }

    let mut frag = Fragment::new(format!("INNER JOIN {} c ON c.id = e.class_id", tables.class_table_name));
    if let Some(class) = filter.class_name() {
        frag.sql.push_str(" AND c.class_type = :class");
        frag.bind("class", Value::Text(class.to_string()));
    }
    if let Some(field) = filter.field_name() {
        frag.sql.push_str(" AND e.field_name = :field");
        frag.bind("field", Value::Text(field.to_string()));
    }
    Ok(frag)
}

/// Assemble the full statement for `mode` from its three predicates
pub fn assemble(
    tables: &AclTables,
    mode: SearchMode,
    subject: Fragment,
    filter: Fragment,
    permission: Fragment,
) -> Query {
    let (columns, join, order) = match mode {
        SearchMode::ObjectIdentities => (
            "o.object_identifier, c.class_type",
            "INNER JOIN",
            "\nORDER BY c.class_type, o.object_identifier",
        ),
        SearchMode::AllowedEntries => ("o.object_identifier, c.class_type, e.field_name", "LEFT JOIN", ""),
    };

    let sql = format!(
        "SELECT DISTINCT {columns}\nFROM {entries} e\n{join} {oids} o ON o.id = e.object_identity_id\n{subject}\n{filter}\nWHERE {permission}{order}",
        entries = tables.entry_table_name,
        oids = tables.oid_table_name,
        subject = subject.sql,
        filter = filter.sql,
        permission = permission.sql,
    );

    let mut params = subject.params;
    params.extend(filter.params);
    params.extend(permission.params);
    Query { sql, params }
}

/// Build the reverse-search statement for one subject and permission
pub fn build<P: PermissionMap + ?Sized>(
    tables: &AclTables,
    map: &P,
    mode: SearchMode,
    sid: &SecurityIdentity,
    permission: &str,
    filter: &AceFilter,
) -> Result<Query> {
    let subject = subject_predicate(tables, sid)?;
    let filter = ace_filter_predicate(tables, filter)?;
    let permission = permission_predicate(map, permission)?;
    Ok(assemble(tables, mode, subject, filter, permission))
}
