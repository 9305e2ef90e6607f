pub mod atmospheric;
pub mod enriched;
pub mod observation;
pub mod quality;
pub mod season;

pub use atmospheric::Co2AnnualMean;
pub use enriched::{EnrichedRecord, PreparedDataset, SatelliteColumn, SatelliteFields};
pub use observation::{Observation, ObservationBuilder, TargetVariable};
pub use quality::QualityFlag;
pub use season::Season;
