//! Route generation for table hyperlinks.

/// Builds the URL of a controller action for a row id.
pub trait LinkResolver: Send + Sync {
    /// URL of `controller`/`action` for `id`. An empty id means no route value.
    fn action_url(&self, controller: &str, action: &str, id: &str) -> String;
}

/// Conventional `/{controller}/{action}/{id}` routes under an optional base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteLinks {
    base: String,
}

impl RouteLinks {
    /// Routes under `base`, e.g. `/admin`.
    pub fn with_base(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl LinkResolver for RouteLinks {
    fn action_url(&self, controller: &str, action: &str, id: &str) -> String {
        if id.is_empty() {
            format!("{}/{controller}/{action}", self.base)
        } else {
            format!("{}/{controller}/{action}/{id}", self.base)
        }
    }
}
