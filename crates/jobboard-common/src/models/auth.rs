use serde::{Deserialize, Serialize};

/// User model (safe to keep in state and session storage -- no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Raw user directory record as served by `GET /users`.
///
/// The backend hands out the plaintext password with every record; it is only
/// ever compared during login and must be stripped before the user is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// Absent in some directory records; such a record never matches a login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserRecord {
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.as_deref() == Some(password)
    }

    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 1,
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn test_credentials_match_is_exact() {
        let r = record();
        assert!(r.credentials_match("ada@example.com", "hunter2"));
        assert!(!r.credentials_match("Ada@example.com", "hunter2"));
        assert!(!r.credentials_match("ada@example.com", "Hunter2"));
        assert!(!r.credentials_match("ada@example.com", ""));
    }

    #[test]
    fn test_into_user_drops_password() {
        let user = record().into_user();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_record_without_password_never_matches() {
        let r: UserRecord =
            serde_json::from_str(r#"{"id": 7, "email": "x@y.z", "name": "X"}"#).unwrap();
        assert_eq!(r.password, None);
        assert!(!r.credentials_match("x@y.z", ""));
    }
}
