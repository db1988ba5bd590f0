use async_trait::async_trait;

use crate::domain::user::{NewUser, User, UserChanges, UserId, UserResult};

/// Criteria for listing users
///
/// All present criteria must hold. Text criteria are case-insensitive literal
/// substring matches; blank terms are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub is_active: Option<bool>,
    pub department: Option<String>,
    /// Matched against name, email, or department
    pub search: Option<String>,
}

impl UserFilter {
    pub fn department_term(&self) -> Option<&str> {
        non_blank(self.department.as_deref())
    }

    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Evaluates the filter against a single record
    pub fn matches(&self, user: &User) -> bool {
        if let Some(is_active) = self.is_active {
            if user.is_active() != is_active {
                return false;
            }
        }

        if let Some(department) = self.department_term() {
            if !contains_ignore_case(user.department().as_str(), department) {
                return false;
            }
        }

        if let Some(term) = self.search_term() {
            let hit = contains_ignore_case(user.name().as_str(), term)
                || contains_ignore_case(user.email().as_str(), term)
                || contains_ignore_case(user.department().as_str(), term);
            if !hit {
                return false;
            }
        }

        true
    }
}

fn positive(value: Option<i64>) -> Option<u32> {
    value
        .filter(|v| *v >= 1)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

fn non_blank(term: Option<&str>) -> Option<&str> {
    term.filter(|t| !t.trim().is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// One-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Builds a page request from raw query values
    ///
    /// A missing or non-positive `page` becomes 1, a missing or non-positive
    /// `limit` becomes the default, and `limit` is capped at `max_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, max_limit: u32) -> Self {
        let page = positive(page).unwrap_or(Self::DEFAULT_PAGE);
        let limit = positive(limit)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(max_limit.max(1));
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// A slice of matching users plus the total match count before slicing
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
}

/// Repository trait for user records
///
/// Implementations own the storage and are responsible for email uniqueness
/// and single-record atomicity.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user; fails with `DuplicateKey` when the email is taken
    async fn create(&self, new_user: NewUser) -> UserResult<User>;

    /// Lists matching users, newest first
    async fn find(&self, filter: &UserFilter, page: PageRequest) -> UserResult<UserPage>;

    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>>;

    /// Applies `changes` and refreshes `updated_at`; `None` when absent
    async fn update_by_id(&self, id: UserId, changes: UserChanges) -> UserResult<Option<User>>;

    /// Removes a user, returning its last state; `None` when absent
    async fn delete_by_id(&self, id: UserId) -> UserResult<Option<User>>;
}
