//! Role grant conversion.

use crate::domain::{AccessEntry, AccessTable, RoleGrant};

/// Builds the access table from the form's role grant rows.
///
/// The two built-in role ids map to their fixed machine names; any other
/// role derives one from its display name.
#[must_use]
pub fn build(roles: &[RoleGrant]) -> AccessTable {
    let roles = roles
        .iter()
        .map(|grant| match grant.rid {
            1 => "anonymous".to_string(),
            2 => "authenticated".to_string(),
            _ => grant.name.to_lowercase().replace(' ', "_"),
        })
        .collect();

    AccessTable {
        create: AccessEntry {
            roles,
            users: Vec::new(),
        },
    }
}
