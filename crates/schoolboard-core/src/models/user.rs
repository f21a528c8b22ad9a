use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    #[default]
    Student,
    Parent,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Teacher => write!(f, "Teacher"),
            Role::Student => write!(f, "Student"),
            Role::Parent => write!(f, "Parent"),
            Role::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(alias = "fullName", alias = "name", default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    // Accounts created through self sign-up wait for an admin before they can log in
    #[serde(alias = "isApproved", alias = "is_approved", default)]
    pub approved: bool,
    #[serde(alias = "className", default)]
    pub class_name: Option<String>,
    #[serde(alias = "phoneNumber", default)]
    pub phone: Option<String>,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_pending(&self) -> bool {
        !self.approved
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}
