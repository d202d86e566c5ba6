use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BastionAuthSettings {
    pub backend: BackendSettings,
    pub deep_link: DeepLinkSettings,
    pub logging: LoggingSettings,
}

/// Hosted auth backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the hosted backend, e.g. `https://xyz.supabase.co`
    pub base_url: String,

    // Direct value (can be overridden by environment variables)
    pub publishable_key: Option<String>,

    // Environment variable name for the override
    pub publishable_key_env: Option<String>,
}

/// Custom-scheme deep link the OS routes back into the app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinkSettings {
    pub scheme: String,
    pub callback_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            publishable_key: None,
            publishable_key_env: Some("AUTH_PUBLISHABLE_KEY".to_string()),
        }
    }
}

impl Default for DeepLinkSettings {
    fn default() -> Self {
        Self {
            scheme: "bitbastion".to_string(),
            callback_path: "auth-callback".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BastionAuthSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        // Initialize environment and logging
        Self::initialize_environment()?;

        // Load base settings from TOML or defaults
        let mut settings = Self::load_base_settings()?;

        // Apply environment variable overrides
        Self::apply_env_overrides(&mut settings);

        settings.warn_if_unconfigured();

        Ok(settings)
    }

    /// Initialize environment variables and logging
    ///
    /// # Errors
    ///
    /// Returns an error if logger initialization fails
    fn initialize_environment() -> Result<(), Box<dyn std::error::Error>> {
        Self::load_env_file();
        env_logger::try_init()?;
        Ok(())
    }

    /// Load base settings from a TOML file or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `BASTION_AUTH_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            log::info!(
                "Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(config_dir) = std::env::var("BASTION_AUTH_CONFIG_DIR") {
            let config_path = std::path::Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                let dir_toml_content = fs::read_to_string(&config_path)?;
                settings = basic_toml::from_str(&dir_toml_content)?;
                log::info!("Overriding settings from {}", config_path.display());
            } else {
                log::info!(
                    "BASTION_AUTH_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_backend_env_overrides(&mut settings.backend);
        Self::apply_deep_link_env_overrides(&mut settings.deep_link);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    /// Apply environment overrides for backend settings
    fn apply_backend_env_overrides(backend_settings: &mut BackendSettings) {
        if let Ok(base_url) = std::env::var("AUTH_BASE_URL") {
            backend_settings.base_url = base_url;
        }
        if let Ok(key) = std::env::var("AUTH_PUBLISHABLE_KEY") {
            if !key.is_empty() {
                backend_settings.publishable_key = Some(key);
            }
        }
    }

    /// Apply environment overrides for deep link settings
    fn apply_deep_link_env_overrides(deep_link_settings: &mut DeepLinkSettings) {
        if let Ok(scheme) = std::env::var("DEEP_LINK_SCHEME") {
            deep_link_settings.scheme = scheme;
        }
        if let Ok(path) = std::env::var("DEEP_LINK_CALLBACK_PATH") {
            deep_link_settings.callback_path = path;
        }
    }

    /// Apply environment overrides for logging settings
    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Warn loudly when the backend is not configured
    ///
    /// An unconfigured backend is not a load error (tests and offline tools
    /// run without one), but every auth call will fail, so make it obvious.
    fn warn_if_unconfigured(&self) {
        if self.backend.base_url.is_empty() || self.backend.get_publishable_key().is_none() {
            eprintln!("⚠️  Auth backend configuration missing");
            eprintln!("   Set AUTH_BASE_URL and AUTH_PUBLISHABLE_KEY in your .env file,");
            eprintln!("   or configure [backend] in Settings.toml");
        }
    }

    /// The deep-link redirect URI the backend sends the user back to
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}://{}",
            self.deep_link.scheme, self.deep_link.callback_path
        )
    }
}

impl BackendSettings {
    /// Get the publishable key, checking the environment variable first,
    /// then falling back to the direct value
    #[must_use]
    pub fn get_publishable_key(&self) -> Option<String> {
        if let Some(env_var) = &self.publishable_key_env {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.publishable_key.clone()
    }
}
