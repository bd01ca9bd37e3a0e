use airtools_core::request::Credentials;

use crate::prelude::*;

pub const INSTANCE_URL_VAR: &str = "AIR_INSTANCE_URL";
pub const API_TOKEN_VAR: &str = "AIR_API_TOKEN";

/// AIR configuration from environment variables
#[derive(Clone, Default)]
pub struct AirConfig {
    pub instance_url: Option<String>,
    pub api_token: Option<String>,
}

impl AirConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing variables are only reported by [`AirConfig::credentials`], so
    /// CLI overrides can fill them in first.
    pub fn from_env() -> Self {
        Self {
            instance_url: std::env::var(INSTANCE_URL_VAR).ok(),
            api_token: std::env::var(API_TOKEN_VAR).ok(),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(
        mut self,
        instance_url: Option<String>,
        api_token: Option<String>,
    ) -> Self {
        if let Some(url) = instance_url {
            self.instance_url = Some(url);
        }
        if let Some(token) = api_token {
            self.api_token = Some(token);
        }
        self
    }

    /// Validate into credentials usable by the transport
    pub fn credentials(&self) -> std::result::Result<Credentials, Error> {
        let instance_url = self
            .instance_url
            .as_deref()
            .ok_or(Error::MissingConfig(INSTANCE_URL_VAR))?;
        let api_token = self
            .api_token
            .as_deref()
            .ok_or(Error::MissingConfig(API_TOKEN_VAR))?;

        Ok(Credentials::new(instance_url, api_token)?)
    }
}

impl std::fmt::Debug for AirConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirConfig")
            .field("instance_url", &self.instance_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
