use serde::{Deserialize, Serialize};

/// Identity of whoever performs a write, as supplied by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Actor for writes not attributable to a person (imports, migrations)
    pub fn system() -> Self {
        Self::new("system", "System")
    }
}
