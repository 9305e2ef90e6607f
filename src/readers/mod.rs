pub mod bottle_reader;
pub mod co2_reader;

pub use bottle_reader::{BottleReader, BOTTLE_COLUMNS};
pub use co2_reader::Co2Reader;
