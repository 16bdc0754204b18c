//! Ratio applied to an operation count before it reaches a throttle.
//!
//! Written as `numerator:denominator`, e.g. `"5:2"` makes every two nominal
//! operations cost five.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ConfigError, Uint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScaleFactor {
    numerator: Uint,
    denominator: Uint,
}

impl ScaleFactor {
    /// The identity scaling, `1:1`.
    pub const ONE_TO_ONE: ScaleFactor = ScaleFactor {
        numerator: 1,
        denominator: 1,
    };

    /// # Errors
    ///
    /// [`ConfigError::InvalidScaleFactor`] if either term is zero.
    pub fn new(numerator: Uint, denominator: Uint) -> Result<Self, ConfigError> {
        if numerator == 0 || denominator == 0 {
            return Err(ConfigError::InvalidScaleFactor(format!("{numerator}:{denominator}")));
        }
        Ok(ScaleFactor { numerator, denominator })
    }

    /// `max(1, nominal_ops * numerator / denominator)`, saturating at [`Uint::MAX`].
    pub fn scaling(&self, nominal_ops: Uint) -> Uint {
        let scaled = u128::from(nominal_ops) * u128::from(self.numerator) / u128::from(self.denominator);
        Uint::try_from(scaled).unwrap_or(Uint::MAX).max(1)
    }

    pub fn numerator(&self) -> Uint {
        self.numerator
    }

    pub fn denominator(&self) -> Uint {
        self.denominator
    }
}

impl FromStr for ScaleFactor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidScaleFactor(s.to_string());
        let (numerator, denominator) = s.split_once(':').ok_or_else(invalid)?;
        let numerator = numerator.trim().parse().map_err(|_| invalid())?;
        let denominator = denominator.trim().parse().map_err(|_| invalid())?;
        ScaleFactor::new(numerator, denominator).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ScaleFactor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScaleFactor> for String {
    fn from(factor: ScaleFactor) -> Self {
        factor.to_string()
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}
