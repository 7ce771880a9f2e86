use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::AppResult;

/// Remote lookup that answers whether a user identifier is registered.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn check_user(&self, user_id: &str) -> AppResult<bool>;
}

/// Directory backed by a fixed set of identifiers (from `VINOBLE_KNOWN_USERS`).
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashSet<String>,
}

impl StaticUserDirectory {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn check_user(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.users.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_directory_lookup() {
        let directory = StaticUserDirectory::new(["diana@example.com"]);
        assert!(directory.check_user("diana@example.com").await.unwrap());
        assert!(!directory.check_user("aaa").await.unwrap());
    }
}
