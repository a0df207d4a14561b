mod manager;

pub use manager::{
    API_KEY_ENV, ConfigError, ConfigFile, ConfigManager, MdtlConfig, ResolveOptions,
    TranslationConfig, resolve_config, validate_config,
};
