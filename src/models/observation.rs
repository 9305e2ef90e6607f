use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{QualityFlag, Season};

/// One bottle sample after column selection and renaming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    // Identifiers, kept verbatim
    pub accession: Option<String>,
    pub expocode: Option<String>,
    pub cruise_id: Option<String>,
    pub observation_type: Option<String>,
    pub station_id: Option<String>,
    pub cast_number: Option<String>,
    pub niskin_id: Option<String>,
    pub sample_id: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 360.0))]
    pub longitude: Option<f64>,

    pub season: Option<Season>,

    pub pressure: Option<f64>,
    pub depth: Option<f64>,
    pub temperature: Option<f64>,
    pub temperature_flag: Option<QualityFlag>,
    pub salinity: Option<f64>,
    pub salinity_flag: Option<QualityFlag>,
    pub oxygen: Option<f64>,
    pub oxygen_flag: Option<QualityFlag>,
    pub dic: Option<f64>,
    pub dic_flag: Option<QualityFlag>,
    pub talk: Option<f64>,
    pub talk_flag: Option<QualityFlag>,
}

impl Observation {
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::new()
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }

    /// Longitude and latitude, when both are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }

    pub fn flag_for(&self, target: TargetVariable) -> Option<QualityFlag> {
        match target {
            TargetVariable::Dic => self.dic_flag,
            TargetVariable::Talk => self.talk_flag,
        }
    }
}

/// Carbonate-system variable a prepared dataset is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetVariable {
    Dic,
    Talk,
}

impl TargetVariable {
    pub const ALL: [TargetVariable; 2] = [TargetVariable::Dic, TargetVariable::Talk];

    pub fn column_name(&self) -> &'static str {
        match self {
            TargetVariable::Dic => "DIC",
            TargetVariable::Talk => "TALK",
        }
    }

    /// Label used in output file names (`bottle_data_{label}_prepared`).
    pub fn file_label(&self) -> &'static str {
        match self {
            TargetVariable::Dic => "DIC",
            TargetVariable::Talk => "TA",
        }
    }
}

impl std::fmt::Display for TargetVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[derive(Debug, Default)]
pub struct ObservationBuilder {
    record: Observation,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_id(mut self, sample_id: impl Into<String>) -> Self {
        self.record.sample_id = Some(sample_id.into());
        self
    }

    pub fn cruise_id(mut self, cruise_id: impl Into<String>) -> Self {
        self.record.cruise_id = Some(cruise_id.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.record.date = Some(date);
        self.record.season = Some(Season::from_date(date));
        self
    }

    pub fn position(mut self, longitude: f64, latitude: f64) -> Self {
        self.record.longitude = Some(longitude);
        self.record.latitude = Some(latitude);
        self
    }

    pub fn depth(mut self, pressure: f64, depth: f64) -> Self {
        self.record.pressure = Some(pressure);
        self.record.depth = Some(depth);
        self
    }

    pub fn temperature(mut self, value: f64, flag: u8) -> Self {
        self.record.temperature = Some(value);
        self.record.temperature_flag = Some(QualityFlag::from_code(flag));
        self
    }

    pub fn salinity(mut self, value: f64, flag: u8) -> Self {
        self.record.salinity = Some(value);
        self.record.salinity_flag = Some(QualityFlag::from_code(flag));
        self
    }

    pub fn oxygen(mut self, value: f64, flag: u8) -> Self {
        self.record.oxygen = Some(value);
        self.record.oxygen_flag = Some(QualityFlag::from_code(flag));
        self
    }

    pub fn dic(mut self, value: f64, flag: Option<u8>) -> Self {
        self.record.dic = Some(value);
        self.record.dic_flag = flag.map(QualityFlag::from_code);
        self
    }

    pub fn talk(mut self, value: f64, flag: Option<u8>) -> Self {
        self.record.talk = Some(value);
        self.record.talk_flag = flag.map(QualityFlag::from_code);
        self
    }

    pub fn build(self) -> Observation {
        self.record
    }
}
