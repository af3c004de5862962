//! Admin user listing query.

/// Query for `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    /// Substring match on email.
    pub q: Option<String>,
    limit: u32,
    pub offset: u32,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            q: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl UserQuery {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 200;

    /// Page size, clamped to `1..=200`.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, Self::MAX_LIMIT);
        self
    }

    #[must_use]
    pub fn with_search(mut self, q: &str) -> Self {
        let q = q.trim();
        self.q = (!q.is_empty()).then(|| q.to_owned());
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Request path with query string.
    #[must_use]
    pub fn path(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &self.q {
            serializer.append_pair("q", q);
        }
        serializer.append_pair("limit", &self.limit.to_string());
        serializer.append_pair("offset", &self.offset.to_string());
        format!("/admin/users?{}", serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        assert_eq!(UserQuery::default().path(), "/admin/users?limit=20&offset=0");
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(UserQuery::default().with_limit(0).limit(), 1);
        assert_eq!(UserQuery::default().with_limit(500).limit(), 200);
    }

    #[test]
    fn test_search_is_encoded() {
        let query = UserQuery::default().with_search(" ana maria ").with_offset(40);
        assert_eq!(query.path(), "/admin/users?q=ana+maria&limit=20&offset=40");
        assert_eq!(UserQuery::default().with_search("  ").q, None);
    }
}
