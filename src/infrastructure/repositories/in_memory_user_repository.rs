use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::repositories::{PageRequest, UserFilter, UserPage, UserRepository};
use crate::domain::user::{NewUser, User, UserChanges, UserError, UserId, UserResult};

/// In-process implementation of UserRepository
///
/// Records are kept in insertion order behind a single lock, so the email
/// uniqueness check and the write that follows it happen atomically.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &[User], email: &str, except: Option<UserId>) -> bool {
        users
            .iter()
            .any(|u| u.email().as_str() == email && Some(u.id()) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if Self::email_taken(&users, new_user.email.as_str(), None) {
            return Err(UserError::DuplicateKey(new_user.email.to_string()));
        }

        let user = User::create(new_user);
        users.push(user.clone());
        Ok(user)
    }

    async fn find(&self, filter: &UserFilter, page: PageRequest) -> UserResult<UserPage> {
        let users = self.users.read().await;

        // Newest insert first, so equal timestamps still list newest first
        let mut matching: Vec<&User> = users.iter().rev().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let users = matching
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok(UserPage { users, total })
    }

    async fn find_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id() == id).cloned())
    }

    async fn update_by_id(&self, id: UserId, changes: UserChanges) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        let Some(index) = users.iter().position(|u| u.id() == id) else {
            return Ok(None);
        };

        if let Some(email) = &changes.email {
            if Self::email_taken(&users, email.as_str(), Some(id)) {
                return Err(UserError::DuplicateKey(email.to_string()));
            }
        }

        let user = &mut users[index];
        user.apply(changes);
        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        let position = users.iter().position(|u| u.id() == id);
        Ok(position.map(|index| users.remove(index)))
    }
}
