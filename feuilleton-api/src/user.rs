use crate::STUB_UUID;

use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Reader,
    Author,
    Moderator,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Reader => "Reader",
            Role::Author => "Author",
            Role::Moderator => "Moderator",
            Role::Admin => "Administrator",
        }
    }
}

/// Opaque avatar key, resolved into an image by whoever renders it
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Avatar(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
}

impl UserRef {
    pub fn new(id: UserId, name: String, role: Role) -> UserRef {
        UserRef {
            id,
            name,
            role,
            avatar: None,
        }
    }

    pub fn as_reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// The user a reply was written in response to
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ReplyTarget {
    pub id: UserId,
    pub name: String,
}
