//! Processor configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for [`crate::BroadcastProcessor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Smallest-unit scale of divisible assets (10^8 by default)
    pub unit: u64,
}

impl ProcessorConfig {
    /// Default divisible-asset unit
    pub const DEFAULT_UNIT: u64 = 100_000_000;

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit == 0 {
            return Err(ConfigError::ZeroUnit);
        }

        let mut rest = self.unit;
        while rest % 10 == 0 {
            rest /= 10;
        }
        if rest != 1 {
            return Err(ConfigError::UnitNotPowerOfTen(self.unit));
        }

        Ok(())
    }

    /// Number of fractional digits a divisible amount is displayed with
    pub fn unit_decimals(&self) -> u32 {
        let mut digits = 0;
        let mut rest = self.unit;
        while rest >= 10 {
            rest /= 10;
            digits += 1;
        }
        digits
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self { unit: Self::DEFAULT_UNIT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ProcessorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.unit_decimals(), 8);
    }

    #[test]
    fn zero_unit_is_rejected() {
        let config = ProcessorConfig { unit: 0 };
        assert_eq!(config.validate(), Err(ConfigError::ZeroUnit));
    }

    #[test]
    fn unit_must_be_power_of_ten() {
        let config = ProcessorConfig { unit: 250 };
        assert_eq!(config.validate(), Err(ConfigError::UnitNotPowerOfTen(250)));

        let whole = ProcessorConfig { unit: 1 };
        assert_eq!(whole.validate(), Ok(()));
        assert_eq!(whole.unit_decimals(), 0);
    }
}
