use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub storage: StorageSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Base URL of the vault API (e.g. http://localhost:8080). Download
    /// paths returned by the server are resolved against this origin.
    pub base_url: String,
}

#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory holding the persisted bearer token.
    #[serde(default = "default_token_dir")]
    pub token_dir: String,
}

fn default_token_dir() -> String {
    ".vault".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;

    // Check if we're already in vault-client directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("vault-client") {
        base_path.join("config")
    } else {
        base_path.join("vault-client").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
