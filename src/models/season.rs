use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Meteorological seasons of the northern hemisphere.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_boundaries() {
        let season = |m| Season::from_date(NaiveDate::from_ymd_opt(2020, m, 15).unwrap());

        assert_eq!(season(12), Season::Winter);
        assert_eq!(season(1), Season::Winter);
        assert_eq!(season(2), Season::Winter);
        assert_eq!(season(3), Season::Spring);
        assert_eq!(season(5), Season::Spring);
        assert_eq!(season(6), Season::Summer);
        assert_eq!(season(8), Season::Summer);
        assert_eq!(season(9), Season::Fall);
        assert_eq!(season(11), Season::Fall);
        assert_eq!(Season::Fall.to_string(), "fall");
    }
}
