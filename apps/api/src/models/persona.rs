use serde::{Deserialize, Serialize};

/// Broad role category of a career entry. The model may only pick one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleCategory {
    Business,
    Engineer,
    Manager,
    Other,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 4] = [
        RoleCategory::Business,
        RoleCategory::Engineer,
        RoleCategory::Manager,
        RoleCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Business => "Business",
            RoleCategory::Engineer => "Engineer",
            RoleCategory::Manager => "Manager",
            RoleCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Years of experience with the skill.
    pub experience: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    /// "YYYY-MM"
    pub start_month: String,
    /// `None` for the current position.
    #[serde(default)]
    pub end_month: Option<String>,
    pub company: String,
    pub position: String,
    pub role: RoleCategory,
    #[serde(default)]
    pub description: Option<String>,
}

/// Skills and career history synthesized from an employee's reviews.
/// Never persisted; lives for the request that generated it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub skills: Vec<Skill>,
    pub career: Vec<Career>,
}

impl Persona {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.career.is_empty()
    }
}
