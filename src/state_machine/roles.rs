use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Platform roles that may initiate workflow transitions.
///
/// `SuperAdmin` is the privileged role: it bypasses the per-state role check
/// but never the destination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Teacher,
    Hod,
    Principal,
    ExamCommittee,
    SchoolAdmin,
    SuperAdmin,
    Student,
}

impl ActorRole {
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => write!(f, "teacher"),
            Self::Hod => write!(f, "hod"),
            Self::Principal => write!(f, "principal"),
            Self::ExamCommittee => write!(f, "exam_committee"),
            Self::SchoolAdmin => write!(f, "school_admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Student => write!(f, "student"),
        }
    }
}

impl std::str::FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(Self::Teacher),
            "hod" => Ok(Self::Hod),
            "principal" => Ok(Self::Principal),
            "exam_committee" => Ok(Self::ExamCommittee),
            "school_admin" => Ok(Self::SchoolAdmin),
            "super_admin" => Ok(Self::SuperAdmin),
            "student" => Ok(Self::Student),
            _ => Err(format!("Invalid actor role: {s}")),
        }
    }
}

/// The already-resolved caller identity handed in by the platform's auth
/// layer. The core trusts these values as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Uuid, role: ActorRole) -> Self {
        Self { id, role }
    }
}

/// All roles, for exhaustive transition-table tests.
pub const ALL_ROLES: [ActorRole; 7] = [
    ActorRole::Teacher,
    ActorRole::Hod,
    ActorRole::Principal,
    ActorRole::ExamCommittee,
    ActorRole::SchoolAdmin,
    ActorRole::SuperAdmin,
    ActorRole::Student,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in ALL_ROLES {
            let parsed: ActorRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_only_super_admin_is_privileged() {
        for role in ALL_ROLES {
            assert_eq!(role.is_privileged(), role == ActorRole::SuperAdmin);
        }
    }
}
