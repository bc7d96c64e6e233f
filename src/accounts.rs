use std::collections::HashMap;

use thiserror::Error;

const MIN_USERNAME_LEN: usize = 4;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("username must be at least 4 characters")]
    InvalidUsername,
    #[error("password must be at least 6 characters")]
    InvalidPassword,
    #[error("username '{0}' already exists")]
    UsernameTaken(String),
}

pub fn validate_username(username: &str) -> bool {
    username.chars().count() >= MIN_USERNAME_LEN
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// In-memory username/password gate for the dashboard. Credentials live only
/// as long as the registry.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<String, String>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        if !validate_username(username) {
            return Err(AccountError::InvalidUsername);
        }
        if !validate_password(password) {
            return Err(AccountError::InvalidPassword);
        }
        if self.users.contains_key(username) {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }
        self.users.insert(username.to_string(), password.to_string());
        log::info!("Registered user {username}");
        Ok(())
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_and_password_rules() {
        assert!(validate_username("user"));
        assert!(!validate_username("abc"));
        assert!(validate_password("secret"));
        assert!(!validate_password("12345"));
    }

    #[test]
    fn register_then_authenticate() {
        let mut reg = UserRegistry::new();
        reg.register("alice", "wonderland").unwrap();
        assert!(reg.authenticate("alice", "wonderland"));
        assert!(!reg.authenticate("alice", "wrong-pass"));
        assert!(!reg.authenticate("bob", "wonderland"));
    }

    #[test]
    fn duplicate_and_invalid_registrations() {
        let mut reg = UserRegistry::new();
        reg.register("alice", "wonderland").unwrap();
        assert_eq!(
            reg.register("alice", "another1"),
            Err(AccountError::UsernameTaken("alice".into()))
        );
        assert_eq!(reg.register("al", "wonderland"), Err(AccountError::InvalidUsername));
        assert_eq!(reg.register("carol", "123"), Err(AccountError::InvalidPassword));
        assert_eq!(reg.len(), 1);
    }
}
