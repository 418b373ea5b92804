use crate::http::AppConfig;
use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_base_url: Option<String>,
    pub timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            api_base_url: None,
            timeout_ms,
            username: None,
            password: None,
        }
    }

    pub fn set_credentials(&mut self, username: String, password: SecretString) {
        self.username = Some(username);
        self.password = Some(password);
    }

    /// Loaded configuration with the command line taking precedence.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::load();
        if let Some(url) = &self.api_base_url {
            config.api_base_url.clone_from(url);
        }
        config.timeout_ms = self.timeout_ms;
        config
    }
}
