//! Router seam.
//!
//! Navigation is fire-and-forget: callers hand a [`Route`] to the router and
//! never wait for the page change.

use serde::Serialize;

/// Query indicator appended on forced sign-out.
pub const ACCOUNT_ISSUE: (&str, &str) = ("error", "account_issue");

/// A navigation target (path plus query parameters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    path: String,
    query: Vec<(String, String)>,
}

impl Route {
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

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Page navigation provided by the host shell.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator for headless shells: records the decision in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "navigation requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_query_string() {
        let route = Route::new("/sign-in").with_query(ACCOUNT_ISSUE.0, ACCOUNT_ISSUE.1);
        assert_eq!(route.to_string(), "/sign-in?error=account_issue");
        assert_eq!(route.query_value("error"), Some("account_issue"));

        let plain = Route::new("/unauthorized");
        assert_eq!(plain.to_string(), "/unauthorized");
        assert!(plain.query().is_empty());
    }
}
