use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Ticket {
    pub(crate) ticket_id: String,
    pub(crate) email: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) description: String,
    pub(crate) status: String,
    pub(crate) resolution: String,
}

impl Ticket {
    /// Overwrites every mutable field with the values from `other`. The
    /// identifier is left untouched.
    pub(crate) fn apply(&mut self, other: Ticket) {
        self.email = other.email;
        self.kind = other.kind;
        self.description = other.description;
        self.status = other.status;
        self.resolution = other.resolution;
    }
}
