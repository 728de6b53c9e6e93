use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The role a person holds during an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Role {
    Competitor,
    Runner,
    Scrambler,
    Judge,
}

struct RoleInfo {
    role: Role,
    code: &'static str,
    abbreviation: &'static str,
    label: &'static str,
}

static ROLE_TABLE: [RoleInfo; 4] = [
    RoleInfo { role: Role::Competitor, code: "competitor", abbreviation: "C", label: "Competitor" },
    RoleInfo { role: Role::Runner, code: "staff-runner", abbreviation: "R", label: "Runner" },
    RoleInfo { role: Role::Scrambler, code: "staff-scrambler", abbreviation: "S", label: "Scrambler" },
    RoleInfo { role: Role::Judge, code: "staff-judge", abbreviation: "J", label: "Judge" },
];

impl Role {
    pub const ALL: [Role; 4] = [Role::Competitor, Role::Runner, Role::Scrambler, Role::Judge];

    fn info(self) -> &'static RoleInfo {
        // Table rows are in declaration order.
        &ROLE_TABLE[self as usize]
    }

    /// Looks up an assignment code such as `staff-judge`.
    pub fn from_code(code: &str) -> Option<Role> {
        ROLE_TABLE.iter().find(|r| r.code == code).map(|r| r.role)
    }

    pub fn code(self) -> &'static str {
        self.info().code
    }

    /// One-letter abbreviation printed in the agenda.
    pub fn abbreviation(self) -> &'static str {
        self.info().abbreviation
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Badge legend entry, e.g. `"J : Judge"`.
    pub fn legend(self) -> String {
        format!("{} : {}", self.abbreviation(), self.label())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Role::from_code(code).ok_or_else(|| code.to_string())
    }
}
