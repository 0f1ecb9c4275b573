use serde::{Deserialize, Serialize};

/// One role grant row from the legacy roles table, joined with the role name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleGrant {
    /// Role id. Ids 1 and 2 are the well-known built-in roles.
    pub rid: u64,

    /// Role display name.
    #[serde(default)]
    pub name: String,
}

/// The converted access table: a single `create` grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessTable {
    /// Who may create submissions.
    pub create: AccessEntry,
}

/// One access grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEntry {
    /// Role identifiers granted the operation.
    pub roles: Vec<String>,

    /// Individual users granted the operation; always empty for converted
    /// forms.
    pub users: Vec<String>,
}
