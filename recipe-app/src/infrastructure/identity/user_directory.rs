use crate::domain::{RecipeId, User, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use recipe_errors::AppError;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory accounts. Supplies stable user ids and per-user recipe lists;
/// there is no password handling.
pub struct UserDirectory {
    users: DashMap<UserId, User>,
    usernames: DashMap<String, UserId>,
    emails: DashMap<String, UserId>,
    next_seq: AtomicU64,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            usernames: DashMap::new(),
            emails: DashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn register(&self, username: &str, email: &str) -> Result<User, AppError> {
        let username = username.trim();
        let email = email.trim().to_lowercase();
        if username.is_empty() || email.is_empty() {
            return Err(AppError::Validation("username and email are required".to_string()));
        }

        let id = UserId::new(format!("u{}", self.next_seq.fetch_add(1, Ordering::Relaxed)));

        match self.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => return Err(AppError::Conflict(format!("username {username}"))),
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(username);
                return Err(AppError::Conflict(format!("email {email}")));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let user = User::new(id.clone(), username.to_string(), email);
        self.users.insert(id, user.clone());
        tracing::info!("User registered: {} ({})", user.username, user.id);

        Ok(user)
    }

    /// Mock login: resolves a username to its account.
    pub fn login(&self, username: &str) -> Result<User, AppError> {
        self.find_by_username(username.trim())
            .ok_or_else(|| AppError::NotFound(format!("user {}", username.trim())))
    }

    pub fn find(&self, id: &UserId) -> Option<User> {
        self.users.get(id).map(|user| user.value().clone())
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let id = self.usernames.get(username)?.value().clone();
        self.find(&id)
    }

    pub fn record_submission(&self, id: &UserId, recipe_id: RecipeId) -> Result<User, AppError> {
        self.update(id, |user| user.submitted_recipes.push(recipe_id))
    }

    pub fn save_recipe(&self, id: &UserId, recipe_id: RecipeId) -> Result<User, AppError> {
        self.update(id, |user| {
            if !user.saved_recipes.contains(&recipe_id) {
                user.saved_recipes.push(recipe_id);
            }
        })
    }

    pub fn unsave_recipe(&self, id: &UserId, recipe_id: &RecipeId) -> Result<User, AppError> {
        self.update(id, |user| user.saved_recipes.retain(|saved| saved != recipe_id))
    }

    fn update(&self, id: &UserId, f: impl FnOnce(&mut User)) -> Result<User, AppError> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
        f(user.value_mut());
        Ok(user.value().clone())
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
