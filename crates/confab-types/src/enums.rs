use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Enumerated columns are stored as their snake_case literal in SQLite and
/// double-checked there with CHECK constraints. `FromStr` is the single
/// parsing point for values coming back out of the database.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownLiteral::new("connection status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Private,
    Group,
}

impl ConversationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationKind {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            other => Err(UnknownLiteral::new("conversation kind", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownLiteral::new("member role", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelistRole {
    Speaker,
    Moderator,
}

impl PanelistRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speaker => "speaker",
            Self::Moderator => "moderator",
        }
    }
}

impl fmt::Display for PanelistRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelistRole {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speaker" => Ok(Self::Speaker),
            "moderator" => Ok(Self::Moderator),
            other => Err(UnknownLiteral::new("panelist role", other)),
        }
    }
}

/// Error for a literal outside an enumerated column's declared set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLiteral {
    pub field: &'static str,
    pub value: String,
}

impl UnknownLiteral {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} literal: {:?}", self.field, self.value)
    }
}

impl std::error::Error for UnknownLiteral {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_round_trip() {
        for s in ["pending", "accepted", "rejected"] {
            assert_eq!(s.parse::<ConnectionStatus>().unwrap().as_str(), s);
        }
        for s in ["private", "group"] {
            assert_eq!(s.parse::<ConversationKind>().unwrap().as_str(), s);
        }
        for s in ["member", "admin"] {
            assert_eq!(s.parse::<MemberRole>().unwrap().as_str(), s);
        }
        for s in ["speaker", "moderator"] {
            assert_eq!(s.parse::<PanelistRole>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn unknown_literal_rejected() {
        let err = "cancelled".parse::<ConnectionStatus>().unwrap_err();
        assert_eq!(err.field, "connection status");

        // serde follows the same literal set
        assert!(serde_json::from_str::<MemberRole>("\"owner\"").is_err());
        assert!(serde_json::from_str::<MemberRole>("\"admin\"").is_ok());
    }
}
