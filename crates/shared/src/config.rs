//! Engine configuration management.

use serde::Deserialize;

use crate::types::Precision;

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Rounding configuration.
    #[serde(default)]
    pub precision: PrecisionConfig,
    /// Place-of-supply rules.
    #[serde(default)]
    pub place_of_supply: PlaceOfSupplyConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decimal precision for computed figures.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PrecisionConfig {
    /// Precision of tax and ledger amounts.
    #[serde(default = "default_currency_precision")]
    pub currency: Precision,
    /// Precision of the per-unit adjustment added to a valuation rate.
    #[serde(default = "default_valuation_precision")]
    pub valuation_rate: Precision,
}

fn default_currency_precision() -> Precision {
    Precision::CURRENCY
}

fn default_valuation_precision() -> Precision {
    Precision::new(2)
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            currency: default_currency_precision(),
            valuation_rate: default_valuation_precision(),
        }
    }
}

/// Place-of-supply configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOfSupplyConfig {
    /// State codes never subject to the PoS restriction
    /// ("96-Other Countries", "97-Other Territory").
    #[serde(default = "default_exempt_state_codes")]
    pub exempt_state_codes: Vec<String>,
}

fn default_exempt_state_codes() -> Vec<String> {
    vec!["96".to_string(), "97".to_string()]
}

impl Default for PlaceOfSupplyConfig {
    fn default() -> Self {
        Self {
            exempt_state_codes: default_exempt_state_codes(),
        }
    }
}

impl PlaceOfSupplyConfig {
    /// Returns true if `state_code` is one of the exempt sentinel codes.
    #[must_use]
    pub fn is_exempt(&self, state_code: &str) -> bool {
        self.exempt_state_codes.iter().any(|code| code == state_code)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "itc_core=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier: `config/default`,
    /// `config/{RUN_MODE}`, then `ITC__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ITC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
