use crate::models::{Co2AnnualMean, EnrichedRecord, Observation};
use std::collections::HashMap;
use tracing::debug;

/// Inner join of observations with annual-mean atmospheric CO2 on the
/// calendar year of the observation date.
pub struct AtmosphericJoin {
    by_year: HashMap<i32, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub records: Vec<EnrichedRecord>,
    /// Rows without a date or whose year has no CO2 value
    pub unmatched: usize,
}

impl AtmosphericJoin {
    pub fn new(annual_means: &[Co2AnnualMean]) -> Self {
        let by_year = annual_means
            .iter()
            .map(|m| (m.year, m.pco2_atm))
            .collect();
        Self { by_year }
    }

    pub fn pco2_for_year(&self, year: i32) -> Option<f64> {
        self.by_year.get(&year).copied()
    }

    /// Join in observation order.
    pub fn join(&self, observations: Vec<Observation>) -> JoinOutcome {
        let total = observations.len();
        let records: Vec<EnrichedRecord> = observations
            .into_iter()
            .filter_map(|observation| {
                let pco2 = observation.year().and_then(|y| self.pco2_for_year(y))?;
                Some(EnrichedRecord::new(observation, pco2))
            })
            .collect();
        let unmatched = total - records.len();

        debug!(
            joined = records.len(),
            unmatched, "Joined observations with atmospheric CO2"
        );

        JoinOutcome { records, unmatched }
    }
}
