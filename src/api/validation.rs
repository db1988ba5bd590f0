//! Request schemas and the field rules applied to them.
//!
//! Each write operation has a strict schema: unknown keys and mistyped
//! values are rejected while decoding. Field rules then run in a fixed order
//! (name, email, phone, department) and every violation is reported.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::user::value_objects::{Department, Email, Name, Phone};
use crate::domain::user::{NewUser, UserChanges};

/// Turns a decoded request into validated domain input
pub trait Validate {
    type Output;

    /// Returns the normalized input, or one message per violated rule
    fn validate(self) -> Result<Self::Output, Vec<String>>;
}

/// Request body for creating a user
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    /// 2 to 50 characters after trimming
    #[schema(example = "Jane Doe", min_length = 2, max_length = 50)]
    pub name: Option<String>,
    /// Unique, stored lowercased
    #[schema(example = "jane.doe@example.com", format = "email")]
    pub email: Option<String>,
    /// Digits only, at least 10
    #[schema(example = "081234567890", pattern = "^[0-9]{10,}$")]
    pub phone: Option<String>,
    /// 2 to 50 characters after trimming
    #[schema(example = "Engineering", min_length = 2, max_length = 50)]
    pub department: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Request body for updating a user; every field is optional
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[schema(example = "Jane Doe", min_length = 2, max_length = 50)]
    pub name: Option<String>,
    #[schema(example = "jane.doe@example.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "081234567890", pattern = "^[0-9]{10,}$")]
    pub phone: Option<String>,
    #[schema(example = "Engineering", min_length = 2, max_length = 50)]
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

/// Collects rule violations while validating fields in order
#[derive(Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check<T>(&mut self, result: Result<T, String>) -> Option<T> {
        result.map_err(|message| self.0.push(message)).ok()
    }

    fn check_optional<T>(
        &mut self,
        value: Option<String>,
        rule: impl FnOnce(String) -> Result<T, String>,
    ) -> Option<T> {
        value.and_then(|v| self.check(rule(v)))
    }

    fn finish<T>(self, output: impl FnOnce() -> Option<T>) -> Result<T, Vec<String>> {
        if !self.0.is_empty() {
            return Err(self.0);
        }
        output().ok_or_else(Vec::new)
    }
}

impl Validate for CreateUserRequest {
    type Output = NewUser;

    fn validate(self) -> Result<NewUser, Vec<String>> {
        let mut violations = Violations::default();

        // A missing field fails its own rule
        let name = violations.check(Name::new(self.name.unwrap_or_default()));
        let email = violations.check(Email::new(self.email.unwrap_or_default()));
        let phone = violations.check(Phone::new(self.phone.unwrap_or_default()));
        let department = violations.check(Department::new(self.department.unwrap_or_default()));
        let is_active = self.is_active;

        violations.finish(|| {
            Some(NewUser {
                name: name?,
                email: email?,
                phone: phone?,
                department: department?,
                is_active,
            })
        })
    }
}

impl Validate for UpdateUserRequest {
    type Output = UserChanges;

    fn validate(self) -> Result<UserChanges, Vec<String>> {
        let mut violations = Violations::default();

        let name = violations.check_optional(self.name, Name::new);
        let email = violations.check_optional(self.email, Email::new);
        let phone = violations.check_optional(self.phone, Phone::new);
        let department = violations.check_optional(self.department, Department::new);
        let is_active = self.is_active;

        violations.finish(|| {
            Some(UserChanges {
                name,
                email,
                phone,
                department,
                is_active,
            })
        })
    }
}
