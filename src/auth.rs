//! In-memory credential store.
//!
//! Passwords are stored as an unsalted DJB2 digest rendered as 16 hex
//! characters, which is NOT suitable for protecting real accounts; the
//! dispatcher also never consults the store yet (see DESIGN.md).

use std::collections::HashMap;
use std::sync::Mutex;

pub struct AuthStore {
    users: Mutex<HashMap<String, String>>,
}

fn hash_password(password: &str) -> String {
    let mut hash: u64 = 5381;
    for byte in password.bytes() {
        hash = hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(byte as u64);
    }
    format!("{hash:016x}")
}

impl AuthStore {
    pub fn new() -> AuthStore {
        let store = AuthStore {
            users: Mutex::new(HashMap::new()),
        };
        store.add_user("admin", "admin123");
        store
    }

    /// Register a user; refuses to overwrite an existing one.
    pub fn add_user(&self, username: &str, password: &str) -> bool {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return false;
        }
        users.insert(username.to_owned(), hash_password(password));
        true
    }

    /// Returns whether a record existed.
    pub fn remove_user(&self, username: &str) -> bool {
        self.users.lock().unwrap().remove(username).is_some()
    }

    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        let users = self.users.lock().unwrap();
        match users.get(username) {
            Some(digest) => *digest == hash_password(password),
            None => false,
        }
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}
