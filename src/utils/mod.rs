pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{haversine_distance, longitude_to_180, longitude_to_360};
pub use filename::prepared_dataset_filename;
pub use progress::ProgressReporter;
