use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// WOCE bottle quality codes as published with the CODAP-NA compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityFlag {
    NoAnalysis,
    Good,
    Questionable,
    Bad,
    NotReported,
    Averaged,
    ManualPeak,
    IrregularPeak,
    NotSampled,
    Other(u8),
}

impl QualityFlag {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => QualityFlag::NoAnalysis,
            2 => QualityFlag::Good,
            3 => QualityFlag::Questionable,
            4 => QualityFlag::Bad,
            5 => QualityFlag::NotReported,
            6 => QualityFlag::Averaged,
            7 => QualityFlag::ManualPeak,
            8 => QualityFlag::IrregularPeak,
            9 => QualityFlag::NotSampled,
            other => QualityFlag::Other(other),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            QualityFlag::NoAnalysis => 1,
            QualityFlag::Good => 2,
            QualityFlag::Questionable => 3,
            QualityFlag::Bad => 4,
            QualityFlag::NotReported => 5,
            QualityFlag::Averaged => 6,
            QualityFlag::ManualPeak => 7,
            QualityFlag::IrregularPeak => 8,
            QualityFlag::NotSampled => 9,
            QualityFlag::Other(code) => *code,
        }
    }

    /// Parse a flag cell. Flags are stored as floats in the combined file
    /// ("2" or "2.0"); a fractional or negative value is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let number = trimmed
            .parse::<f64>()
            .map_err(|_| ProcessingError::InvalidQualityFlag(trimmed.to_string()))?;

        if number.fract() != 0.0 || !(0.0..=255.0).contains(&number) {
            return Err(ProcessingError::InvalidQualityFlag(trimmed.to_string()));
        }

        Ok(Self::from_code(number as u8))
    }

    /// Good (2) and averaged lab replicates (6) are the only codes kept.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, QualityFlag::Good | QualityFlag::Averaged)
    }
}

impl std::fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
