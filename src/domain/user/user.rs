use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::UserError;
use super::value_objects::{Department, Email, Name, Phone};

/// Opaque identifier of a user record
///
/// Parsing rejects anything that is not a UUID with [`UserError::MalformedId`].
///
/// # Example
/// ```
/// use user_management_api::domain::user::UserId;
///
/// assert!("not-an-id".parse::<UserId>().is_err());
/// let id = UserId::new();
/// assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for UserId {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| UserError::MalformedId(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated fields for a user that does not exist yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Name,
    pub email: Email,
    pub phone: Phone,
    pub department: Department,
    pub is_active: Option<bool>,
}

/// Validated partial replacement for an existing user
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<Name>,
    pub email: Option<Email>,
    pub phone: Option<Phone>,
    pub department: Option<Department>,
    pub is_active: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.is_active.is_none()
    }
}

/// User record
///
/// # Invariants
/// - `id` and `created_at` never change after creation
/// - `updated_at >= created_at`, and every update moves `updated_at` strictly forward
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: Name,
    email: Email,
    phone: Phone,
    department: Department,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a fresh record with a generated id
    ///
    /// `created_at` and `updated_at` share the same instant and `is_active`
    /// defaults to `true`.
    pub fn create(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: new_user.name,
            email: new_user.email,
            phone: new_user.phone,
            department: new_user.department,
            is_active: new_user.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a user from storage without generating anything
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: UserId,
        name: Name,
        email: Email,
        phone: Phone,
        department: Department,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            department,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// Applies the present fields of `changes` and refreshes `updated_at`
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(department) = changes.department {
            self.department = department;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.touch();
    }

    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            // Clock did not advance (or went backwards)
            self.updated_at + Duration::microseconds(1)
        };
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn department(&self) -> &Department {
        &self.department
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
