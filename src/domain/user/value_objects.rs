use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub const NAME_RULE: &str = "Name must be between 2 and 50 characters";
pub const EMAIL_RULE: &str = "Invalid email format";
pub const PHONE_RULE: &str = "Phone must contain only digits and be at least 10 characters";
pub const DEPARTMENT_RULE: &str = "Department must be between 2 and 50 characters";

const TEXT_MIN_CHARS: usize = 2;
const TEXT_MAX_CHARS: usize = 50;

// Word characters are ASCII only
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,}$").expect("phone pattern compiles"));

/// Trims `raw` and checks its length in characters (not bytes)
fn bounded_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let chars = trimmed.chars().count();
    (TEXT_MIN_CHARS..=TEXT_MAX_CHARS)
        .contains(&chars)
        .then(|| trimmed.to_string())
}

/// Email value object representing a valid, lowercased email address
///
/// # Invariants
/// - Has no surrounding whitespace
/// - Is lowercase
/// - Matches `local@domain.tld` where the TLD has 2 or 3 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object, trimming and lowercasing the input
    ///
    /// # Example
    /// ```
    /// use user_management_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Jane.Doe@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_str(), "jane.doe@example.com");
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, String> {
        let normalized = email.as_ref().trim().to_lowercase();
        if Self::is_valid(&normalized) {
            Ok(Email(normalized))
        } else {
            Err(EMAIL_RULE.to_string())
        }
    }

    fn is_valid(email: &str) -> bool {
        EMAIL_PATTERN.is_match(email)
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

/// Phone number made of at least ten ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(phone: impl AsRef<str>) -> Result<Self, String> {
        let trimmed = phone.as_ref().trim();
        if PHONE_PATTERN.is_match(trimmed) {
            Ok(Phone(trimmed.to_string()))
        } else {
            Err(PHONE_RULE.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

/// Display name of a user, trimmed, 2 to 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(name: impl AsRef<str>) -> Result<Self, String> {
        bounded_text(name.as_ref())
            .map(Name)
            .ok_or_else(|| NAME_RULE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Name {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

/// Department a user belongs to, trimmed, 2 to 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    pub fn new(department: impl AsRef<str>) -> Result<Self, String> {
        bounded_text(department.as_ref())
            .map(Department)
            .ok_or_else(|| DEPARTMENT_RULE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Department {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Department> for String {
    fn from(department: Department) -> Self {
        department.0
    }
}
