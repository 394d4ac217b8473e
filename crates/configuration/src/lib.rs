use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, FetchConfig, OutputConfig};

/// Loads the application configuration from a TOML file at `path`.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, validates it, and returns it.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.instruments.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one instrument symbol is required".to_string(),
        ));
    }
    if config.event_dates.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one event date is required".to_string(),
        ));
    }
    if config.window_length_months == 0 {
        return Err(ConfigError::ValidationError(
            "window_length_months must be a positive number of months".to_string(),
        ));
    }
    if config.fetch.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.max_concurrent must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ReferenceRate;

    fn minimal_config() -> Config {
        Config {
            instruments: vec!["^STOXX50E".to_string()],
            event_dates: vec!["2016-11-08".parse().unwrap()],
            window_length_months: 3,
            reference: ReferenceRate::MacroSeries {
                series_id: "IR3TIB01DEM156N".to_string(),
            },
            fetch: Default::default(),
            output: Default::default(),
        }
    }

    #[test]
    fn minimal_config_validates() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn zero_window_length_is_rejected() {
        let mut config = minimal_config();
        config.window_length_months = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn empty_instrument_list_is_rejected() {
        let mut config = minimal_config();
        config.instruments.clear();
        assert!(validate(&config).is_err());
    }
}
