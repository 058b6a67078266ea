//! Ledger configuration

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Which authorization policy guards mutating operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationMode {
    /// Every caller may assign and transfer
    #[default]
    Disabled,
    /// Callers must sign with the administrator credential
    Signature,
}

impl std::str::FromStr for AuthorizationMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" | "none" | "off" => Ok(AuthorizationMode::Disabled),
            "signature" => Ok(AuthorizationMode::Signature),
            other => Err(LedgerError::InvalidArgument(format!(
                "unknown authorization mode '{}'",
                other
            ))),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Account seeded at bootstrap
    pub genesis_account: String,
    /// Balance of the genesis account
    pub initial_supply: i64,
    /// Authorization gate in front of assign and transfer
    pub authorization: AuthorizationMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_account: GENESIS_ACCOUNT_ID.to_string(),
            initial_supply: INITIAL_SUPPLY,
            authorization: AuthorizationMode::Disabled,
        }
    }
}

impl LedgerConfig {
    /// Set the authorization mode
    pub fn with_authorization(mut self, authorization: AuthorizationMode) -> Self {
        self.authorization = authorization;
        self
    }

    /// Set the genesis account and its initial supply
    pub fn with_genesis(mut self, account_id: impl Into<String>, initial_supply: i64) -> Self {
        self.genesis_account = account_id.into();
        self.initial_supply = initial_supply;
        self
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> LedgerResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LedgerError::InvalidArgument(format!("invalid ledger config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read `LEDGER_GENESIS_ACCOUNT`, `LEDGER_INITIAL_SUPPLY` and
    /// `LEDGER_AUTHORIZATION`, keeping defaults for unset variables
    pub fn from_env() -> LedgerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LedgerResult<Self> {
        let mut config = Self::default();

        if let Some(account) = lookup("LEDGER_GENESIS_ACCOUNT") {
            config.genesis_account = account;
        }
        if let Some(supply) = lookup("LEDGER_INITIAL_SUPPLY") {
            config.initial_supply = supply.trim().parse().map_err(|_| {
                LedgerError::InvalidArgument(format!(
                    "LEDGER_INITIAL_SUPPLY is not an integer: '{}'",
                    supply
                ))
            })?;
        }
        if let Some(mode) = lookup("LEDGER_AUTHORIZATION") {
            config.authorization = mode.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the genesis account id and reject a negative supply
    pub fn validate(&self) -> LedgerResult<()> {
        crate::utils::validation::validate_account_id(&self.genesis_account)?;
        if self.initial_supply < 0 {
            return Err(LedgerError::InvalidArgument(format!(
                "initial supply must not be negative: {}",
                self.initial_supply
            )));
        }
        Ok(())
    }
}
