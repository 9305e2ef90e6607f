use crate::models::{Observation, TargetVariable};
use tracing::debug;

/// Keeps observations whose target, temperature and salinity flags are all
/// acceptable.
pub struct QualityFilter {
    target: TargetVariable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub kept: Vec<Observation>,
    pub dropped: usize,
}

impl QualityFilter {
    pub fn new(target: TargetVariable) -> Self {
        Self { target }
    }

    pub fn target(&self) -> TargetVariable {
        self.target
    }

    pub fn accepts(&self, observation: &Observation) -> bool {
        [
            observation.flag_for(self.target),
            observation.temperature_flag,
            observation.salinity_flag,
        ]
        .iter()
        .all(|flag| matches!(flag, Some(f) if f.is_acceptable()))
    }

    pub fn apply(&self, observations: &[Observation]) -> FilterOutcome {
        let kept: Vec<Observation> = observations
            .iter()
            .filter(|o| self.accepts(o))
            .cloned()
            .collect();
        let dropped = observations.len() - kept.len();

        debug!(
            target_variable = %self.target,
            kept = kept.len(),
            dropped,
            "Applied quality filter"
        );

        FilterOutcome { kept, dropped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(dic_flag: Option<u8>, temp_flag: u8, sal_flag: u8) -> Observation {
        Observation::builder()
            .temperature(12.0, temp_flag)
            .salinity(33.0, sal_flag)
            .dic(2000.0, dic_flag)
            .talk(2200.0, Some(2))
            .build()
    }

    #[test]
    fn test_rejected_dic_flags() {
        let observations = vec![
            observation(Some(2), 2, 2),
            observation(Some(3), 2, 2),
            observation(Some(9), 2, 2),
            observation(None, 2, 2),
            observation(Some(6), 2, 6),
        ];

        let outcome = QualityFilter::new(TargetVariable::Dic).apply(&observations);

        assert_eq!(outcome.kept.len(), 2);
        assert_eq!(outcome.dropped, 3);
        assert!(outcome
            .kept
            .iter()
            .all(|o| o.dic_flag.is_some_and(|f| f.is_acceptable())));
    }

    #[test]
    fn test_temperature_and_salinity_must_pass() {
        let observations = vec![observation(Some(2), 3, 2), observation(Some(2), 2, 4)];

        let outcome = QualityFilter::new(TargetVariable::Dic).apply(&observations);
        assert!(outcome.kept.is_empty());
    }

    #[test]
    fn test_targets_are_independent() {
        // DIC flag 9 but TALK flag 2: only the TALK dataset keeps it
        let observations = vec![observation(Some(9), 2, 2)];

        assert!(QualityFilter::new(TargetVariable::Dic).apply(&observations).kept.is_empty());
        assert_eq!(QualityFilter::new(TargetVariable::Talk).apply(&observations).kept.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let outcome = QualityFilter::new(TargetVariable::Talk).apply(&[]);
        assert_eq!(outcome, FilterOutcome { kept: Vec::new(), dropped: 0 });
    }
}
