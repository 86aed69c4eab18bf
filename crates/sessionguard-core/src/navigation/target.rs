use std::fmt;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

/// Query flag appended to the login view after a logout
const LOGOUT_FLAG: &str = "logout";

/// A place the guard can send the user: a path plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    path: String,
    query: Vec<(String, String)>,
}

impl NavigationTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Plain login view, used when an anonymous visitor hits a protected page
    pub fn login() -> Self {
        Self::new(LOGIN_PATH)
    }

    /// Login view flagged so it can tell the user they were signed out
    pub fn login_after_logout() -> Self {
        Self::login().with_query(LOGOUT_FLAG, "true")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_logout(&self) -> bool {
        self.path == LOGIN_PATH && self.query_value(LOGOUT_FLAG) == Some("true")
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}
