pub mod atmospheric_join;
pub mod pipeline;
pub mod quality_filter;
pub mod report;
pub mod satellite_enricher;

pub use atmospheric_join::{AtmosphericJoin, JoinOutcome};
pub use pipeline::Pipeline;
pub use quality_filter::{FilterOutcome, QualityFilter};
pub use report::{DatasetReport, PipelineReport};
pub use satellite_enricher::{EnrichmentStats, ProductStats, SatelliteEnricher};
