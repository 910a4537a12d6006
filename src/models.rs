use serde::{Deserialize, Serialize};

/// A single user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

/// A single resource record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub color: String,
    pub pantone_value: String,
}

/// The support block attached to every read response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub url: String,
    pub text: String,
}

/// A paginated list of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<User>,
    pub support: Support,
}

/// A paginated list of resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesPage {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<Resource>,
    pub support: Support,
}

/// A single user, as wrapped by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub data: User,
    pub support: Support,
}

/// A single resource, as wrapped by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEnvelope {
    pub data: Resource,
    pub support: Support,
}

/// What an update call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReceipt {
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Request body for creating or updating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub job: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// What a create call echoes back: the posted fields plus server-assigned
/// `id` and `createdAt`. The id comes back as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub name: String,
    pub job: String,
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Request body for register and login calls. Both fields serialize as
/// `null` when unset, which is what makes the service complain about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    pub fn without_password(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: None,
        }
    }
}

/// Successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterOk {
    pub id: i64,
    pub token: String,
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginOk {
    pub token: String,
}

/// Error body for rejected register and login calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}
