use std::collections::HashMap;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::credentials::{self, Credentials};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub signing: SigningConfig,
}

/// Where the CSD certificate and private key live.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningConfig {
    pub certificate_file: String,
    pub private_key_file: String,
    pub passphrase: SecretString,
}

impl SigningConfig {
    /// Loads and decrypts the credentials this configuration points at.
    pub fn load_credentials(&self) -> credentials::Result<Credentials> {
        Credentials::from_pem_files(
            &self.certificate_file,
            &self.private_key_file,
            self.passphrase.expose_secret(),
        )
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigLib::builder().add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Should be in the format APP_SIGNING__PASSPHRASE
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
