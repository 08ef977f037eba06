use url::Url;

// URLs of the backend, all resolved against one API base.
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base)?;
        // Without a trailing slash `join` would drop the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn login(&self) -> String {
        self.resource("auth/login/")
    }

    pub fn token_refresh(&self) -> String {
        self.resource("auth/token/refresh/")
    }

    // Whether `url` points at the API's own scheme, host and port. Only such
    // URLs may carry the session's credentials.
    pub fn is_api_origin(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|url| url.origin() == self.base.origin())
    }

    // Relative paths resolve under the base; absolute URLs pass through.
    pub fn resource(&self, path: &str) -> String {
        match self.base.join(path.trim_start_matches('/')) {
            Ok(url) => url.into(),
            Err(_) => format!("{}{}", self.base, path.trim_start_matches('/')),
        }
    }
}
