use serde::{Deserialize, Serialize};
use validator::Validate;

/// Annual mean of atmospheric CO2 at Mauna Loa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Co2AnnualMean {
    #[validate(range(min = 1900, max = 2200))]
    pub year: i32,

    /// Mole fraction in ppm, published as `mean`.
    #[serde(rename = "pCO2_atm")]
    #[validate(range(min = 0.0, max = 2000.0))]
    pub pco2_atm: f64,
}

impl Co2AnnualMean {
    pub fn new(year: i32, pco2_atm: f64) -> Self {
        Self { year, pco2_atm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co2_validation() {
        assert!(Co2AnnualMean::new(2015, 400.83).validate().is_ok());
        assert!(Co2AnnualMean::new(2015, -1.0).validate().is_err());
        assert!(Co2AnnualMean::new(15, 400.0).validate().is_err());
    }
}
