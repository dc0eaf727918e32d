use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type PurposeId = Arc<str>;

/// What a place is visited for (dining, sightseeing, shopping, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Purpose {
    pub id: PurposeId,
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl Purpose {
    /// Matches either the id or the display name, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        self.id.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}
