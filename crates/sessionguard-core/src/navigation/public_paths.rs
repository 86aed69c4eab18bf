/// Paths reachable without a session
const DEFAULT_PUBLIC_PATHS: [&str; 3] = ["/login", "/registro", "/"];

/// Allow-list of pages that do not require authentication.
///
/// Only the path component is compared; a query string or fragment on the
/// visited path is ignored. Matching is exact, so `/login/` is not public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    paths: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        let path = strip_query(path);
        self.paths.iter().any(|p| p == path)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PATHS)
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
