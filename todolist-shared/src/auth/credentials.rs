//! Login form extraction.

use serde::Deserialize;

/// Raw login submission (`application/x-www-form-urlencoded`)
///
/// Missing fields deserialize to empty strings so extraction never fails.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    #[serde(rename = "_username")]
    pub username: String,

    #[serde(rename = "_password")]
    pub password: String,
}

/// Username and password of one login attempt
///
/// Lives only for the duration of the request; the password is never logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl From<LoginForm> for Credentials {
    fn from(form: LoginForm) -> Self {
        Self {
            username: form.username,
            password: form.password,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
