use libris_db::StoredSession;
use serde::{Deserialize, Serialize};

/// A library member. `email` is unique and serves as the login key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for StoredSession {
    fn from(user: &User) -> Self {
        StoredSession {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<StoredSession> for User {
    fn from(session: StoredSession) -> Self {
        User {
            id: session.id,
            name: session.name,
            email: session.email,
        }
    }
}

pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
        },
        User {
            id: "u2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
        },
    ]
}
