//! Permission masks, granting strategies and the permission map

use std::collections::BTreeMap;

use crate::identity::ObjectIdentity;

/// ACE bit-mask
pub type Mask = u32;

// Standard ACL mask bits
pub const VIEW: Mask = 1;
pub const CREATE: Mask = 1 << 1;
pub const EDIT: Mask = 1 << 2;
pub const DELETE: Mask = 1 << 3;
pub const UNDELETE: Mask = 1 << 4;
pub const OPERATOR: Mask = 1 << 5;
pub const MASTER: Mask = 1 << 6;
pub const OWNER: Mask = 1 << 7;

const MASKS: &[(&str, Mask)] = &[
    ("VIEW", VIEW),
    ("CREATE", CREATE),
    ("EDIT", EDIT),
    ("DELETE", DELETE),
    ("UNDELETE", UNDELETE),
    ("OPERATOR", OPERATOR),
    ("MASTER", MASTER),
    ("OWNER", OWNER),
];

/// Convert a mask to the names of the bits it sets
pub fn mask_names(mask: Mask) -> Vec<&'static str> {
    MASKS.iter()
        .filter(|(_, b)| mask & b == *b)
        .map(|(n, _)| *n)
        .collect()
}

/// Convert bit names to a mask (unknown names are ignored)
pub fn names_to_mask(names: &[&str]) -> Mask {
    names
        .iter()
        .filter_map(|n| MASKS.iter().find(|(k, _)| k.eq_ignore_ascii_case(n)).map(|(_, v)| v))
        .fold(0, |a, b| a | b)
}

/// How an ACE's stored mask is compared against a required mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantingStrategy {
    /// Every bit of the required mask is set in the ACE mask
    All,
    /// At least one bit overlaps
    Any,
    /// ACE mask equals the required mask
    Equal,
}

/// Strategy tag as stored, paired with its SQL check template.
///
/// `{mask}` stands for a bound mask parameter; `e` is the entry table alias.
pub const STRATEGIES: &[(GrantingStrategy, &str)] = &[
    (GrantingStrategy::All, "(e.mask & {mask}) = {mask}"),
    (GrantingStrategy::Any, "(e.mask & {mask}) <> 0"),
    (GrantingStrategy::Equal, "e.mask = {mask}"),
];

impl GrantingStrategy {
    /// Tag stored in the entry table's `granting_strategy` column
    pub fn tag(self) -> &'static str {
        match self {
            GrantingStrategy::All => "all",
            GrantingStrategy::Any => "any",
            GrantingStrategy::Equal => "equal",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        STRATEGIES.iter().map(|(s, _)| *s).find(|s| s.tag() == tag)
    }

    /// Evaluate the strategy in memory, as the forward engine does
    #[inline]
    pub fn is_satisfied(self, ace_mask: Mask, required: Mask) -> bool {
        match self {
            GrantingStrategy::All => ace_mask & required == required,
            GrantingStrategy::Any => ace_mask & required != 0,
            GrantingStrategy::Equal => ace_mask == required,
        }
    }
}

/// Resolves permission names to the masks that satisfy them.
///
/// Any one of the returned masks suffices.
pub trait PermissionMap {
    fn contains(&self, permission: &str) -> bool;

    /// Masks for `permission`, or `None` if it is unknown.
    ///
    /// `object` is the target being checked; reverse searches have none.
    fn masks(&self, permission: &str, object: Option<&ObjectIdentity>) -> Option<Vec<Mask>>;
}

/// The standard permission hierarchy, where higher masks imply lower ones
#[derive(Debug, Clone)]
pub struct BasicPermissionMap {
    map: BTreeMap<&'static str, Vec<Mask>>,
}

impl BasicPermissionMap {
    pub fn new() -> Self {
        let map = BTreeMap::from([
            ("VIEW", vec![VIEW, EDIT, OPERATOR, MASTER, OWNER]),
            ("EDIT", vec![EDIT, OPERATOR, MASTER, OWNER]),
            ("CREATE", vec![CREATE, OPERATOR, MASTER, OWNER]),
            ("DELETE", vec![DELETE, OPERATOR, MASTER, OWNER]),
            ("UNDELETE", vec![UNDELETE, OPERATOR, MASTER, OWNER]),
            ("OPERATOR", vec![OPERATOR, MASTER, OWNER]),
            ("MASTER", vec![MASTER, OWNER]),
            ("OWNER", vec![OWNER]),
        ]);
        BasicPermissionMap { map }
    }
}

impl Default for BasicPermissionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionMap for BasicPermissionMap {
    fn contains(&self, permission: &str) -> bool {
        self.map.contains_key(permission)
    }

    fn masks(&self, permission: &str, _object: Option<&ObjectIdentity>) -> Option<Vec<Mask>> {
        self.map.get(permission).cloned()
    }
}
