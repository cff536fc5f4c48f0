//! URL reversal for index pages.

/// Builds absolute URLs for the public index routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolver {
    base_url: String,
}

impl UrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns: `<base>/packages/<name>/`
    pub fn package_detail(&self, name: &str) -> String {
        format!("{}/packages/{}/", self.base_url, name)
    }
}
