use std::collections::BTreeMap;

use super::StatusLabel;

/// Last observed label per tracked URL. Ordered so the state file is stable on disk.
pub type StateMap = BTreeMap<String, StatusLabel>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub url: String,
    pub previous: StatusLabel,
    pub current: StatusLabel,
}
