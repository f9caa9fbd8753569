use serde::{Deserialize, Serialize};
use std::fmt;

/// A class or struct together with the names of its public members
///
/// Members keep the order in which they appear in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationSummary {
    /// Declared name of the class/struct
    pub name: String,

    /// Names of the immediate members whose access is public
    pub public_members: Vec<String>,
}

impl DeclarationSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.public_members.push(member.into());
        self
    }

    pub fn push_member(&mut self, member: impl Into<String>) {
        self.public_members.push(member.into());
    }

    pub fn member_count(&self) -> usize {
        self.public_members.len()
    }
}

/// Formats as `Name: a,b,c`
impl fmt::Display for DeclarationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.public_members.join(","))
    }
}
