use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-organization permission level of the requesting user.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    /// VIEWER is read-only; EDITOR and ADMIN may create and edit URLs.
    pub fn can_edit_urls(&self) -> bool {
        matches!(self, Role::Admin | Role::Editor)
    }

    /// Membership and namespace management is ADMIN-only.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Viewer => "VIEWER",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Role of the requesting user; `None` means "not a member" and only
    /// appears in responses the server should not normally produce.
    pub user_role: Option<Role>,
    /// Present on detail responses, omitted from lists.
    #[serde(default)]
    pub members: Option<Vec<OrganizationMember>>,
}

impl Organization {
    pub fn can_edit_urls(&self) -> bool {
        self.user_role.map(|r| r.can_edit_urls()).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.user_role.map(|r| r.is_admin()).unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrganizationMember {
    pub id: i64,
    /// User id of the member.
    pub user: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

/// Answer of `GET /invitations/{token}/validate/`.
#[derive(Debug, Deserialize, Clone)]
pub struct InvitationInfo {
    pub email: String,
    pub organization_name: String,
    pub role: Role,
}

/// Answer of `POST /invitations/{token}/accept/`.
#[derive(Debug, Deserialize, Clone)]
pub struct AcceptedInvitation {
    pub organization_id: i64,
    pub organization_name: String,
    pub role: Role,
}
