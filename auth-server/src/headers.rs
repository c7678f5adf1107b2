use axum::http::HeaderValue;
use http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};

/// Cache-Control directives
#[derive(Debug, Clone, Default)]
pub struct CacheControl {
    pub no_store: bool,
}

impl CacheControl {
    /// Create a new CacheControl instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Set no-store directive
    pub fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// Convert to HeaderValue
    pub fn to_header_value(&self) -> HeaderValue {
        let mut parts = Vec::new();

        if self.no_store {
            parts.push("no-store".to_string());
        }

        HeaderValue::from_str(&parts.join(", ")).unwrap_or(HeaderValue::from_static(""))
    }
}

/// Helper struct for setting cache-related headers
#[derive(Debug, Clone, Default)]
pub struct CacheHeaders {
    cache_control: CacheControl,
    pragma_no_cache: bool,
}

impl CacheHeaders {
    /// Create a new CacheHeaders instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cache control directives
    pub fn cache_control(mut self, cache_control: CacheControl) -> Self {
        self.cache_control = cache_control;
        self
    }

    /// Also send `Pragma: no-cache` for HTTP/1.0 caches
    pub fn pragma_no_cache(mut self) -> Self {
        self.pragma_no_cache = true;
        self
    }

    /// Apply headers to a response
    pub fn apply<B>(&self, response: &mut axum::response::Response<B>) {
        let headers = response.headers_mut();

        headers.insert(CACHE_CONTROL, self.cache_control.to_header_value());

        if self.pragma_no_cache {
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        }

        if self.cache_control.no_store {
            headers.insert(EXPIRES, HeaderValue::from_static("0"));
        }
    }
}

/// Common cache control presets
pub mod presets {
    use super::*;

    /// Responses carrying credentials (RFC 6749 section 5.1)
    pub fn no_store() -> CacheHeaders {
        CacheHeaders::new()
            .cache_control(CacheControl::new().no_store())
            .pragma_no_cache()
    }
}
