pub mod csv_writer;
pub mod parquet_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, QualityFlag, SatelliteColumn, TargetVariable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(ProcessingError::Config(format!(
                "Unsupported output format: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Storage type of an output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Date,
    Number,
    Flag,
}

/// One column of a prepared dataset, in written order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    Accession,
    Expocode,
    CruiseId,
    ObservationType,
    StationId,
    CastNumber,
    NiskinId,
    SampleId,
    Date,
    Latitude,
    Longitude,
    Season,
    Pressure,
    Depth,
    Temperature,
    TemperatureFlag,
    Salinity,
    SalinityFlag,
    Oxygen,
    OxygenFlag,
    Dic,
    DicFlag,
    Talk,
    TalkFlag,
    Pco2Atm,
    Satellite(SatelliteColumn),
}

/// A single cell value, borrowed from the record where possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(Option<&'a str>),
    Date(Option<chrono::NaiveDate>),
    Number(Option<f64>),
    Flag(Option<QualityFlag>),
}

const OBSERVATION_COLUMNS: [OutputColumn; 24] = [
    OutputColumn::Accession,
    OutputColumn::Expocode,
    OutputColumn::CruiseId,
    OutputColumn::ObservationType,
    OutputColumn::StationId,
    OutputColumn::CastNumber,
    OutputColumn::NiskinId,
    OutputColumn::SampleId,
    OutputColumn::Date,
    OutputColumn::Latitude,
    OutputColumn::Longitude,
    OutputColumn::Season,
    OutputColumn::Pressure,
    OutputColumn::Depth,
    OutputColumn::Temperature,
    OutputColumn::TemperatureFlag,
    OutputColumn::Salinity,
    OutputColumn::SalinityFlag,
    OutputColumn::Oxygen,
    OutputColumn::OxygenFlag,
    OutputColumn::Dic,
    OutputColumn::DicFlag,
    OutputColumn::Talk,
    OutputColumn::TalkFlag,
];

/// Columns written for a dataset filtered on `target`.
///
/// The flags the filter consumed (target, temperature, salinity) are
/// dropped; the other target's value and flag stay.
pub fn output_columns(target: TargetVariable, include_satellite: bool) -> Vec<OutputColumn> {
    let consumed_flag = match target {
        TargetVariable::Dic => OutputColumn::DicFlag,
        TargetVariable::Talk => OutputColumn::TalkFlag,
    };

    let mut columns: Vec<OutputColumn> = OBSERVATION_COLUMNS
        .iter()
        .copied()
        .filter(|c| {
            *c != consumed_flag
                && *c != OutputColumn::TemperatureFlag
                && *c != OutputColumn::SalinityFlag
        })
        .collect();

    columns.push(OutputColumn::Pco2Atm);
    if include_satellite {
        columns.extend(SatelliteColumn::ALL.iter().map(|c| OutputColumn::Satellite(*c)));
    }
    columns
}

impl OutputColumn {
    pub fn header(&self) -> &'static str {
        match self {
            OutputColumn::Accession => "Accession",
            OutputColumn::Expocode => "EXPOCODE",
            OutputColumn::CruiseId => "Cruise_ID",
            OutputColumn::ObservationType => "Observation_type",
            OutputColumn::StationId => "Station_ID",
            OutputColumn::CastNumber => "Cast_number",
            OutputColumn::NiskinId => "Niskin_ID",
            OutputColumn::SampleId => "Sample_ID",
            OutputColumn::Date => "Date",
            OutputColumn::Latitude => "Latitude",
            OutputColumn::Longitude => "Longitude",
            OutputColumn::Season => "Season",
            OutputColumn::Pressure => "Pressure",
            OutputColumn::Depth => "Depth",
            OutputColumn::Temperature => "Temperature",
            OutputColumn::TemperatureFlag => "Temperature_flag",
            OutputColumn::Salinity => "Salinity",
            OutputColumn::SalinityFlag => "Salinity_flag",
            OutputColumn::Oxygen => "Oxygen",
            OutputColumn::OxygenFlag => "Oxygen_flag",
            OutputColumn::Dic => "DIC",
            OutputColumn::DicFlag => "DIC_flag",
            OutputColumn::Talk => "TALK",
            OutputColumn::TalkFlag => "TALK_flag",
            OutputColumn::Pco2Atm => "pCO2_atm",
            OutputColumn::Satellite(column) => column.header(),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            OutputColumn::Date => ColumnKind::Date,
            OutputColumn::TemperatureFlag
            | OutputColumn::SalinityFlag
            | OutputColumn::OxygenFlag
            | OutputColumn::DicFlag
            | OutputColumn::TalkFlag => ColumnKind::Flag,
            OutputColumn::Latitude
            | OutputColumn::Longitude
            | OutputColumn::Pressure
            | OutputColumn::Depth
            | OutputColumn::Temperature
            | OutputColumn::Salinity
            | OutputColumn::Oxygen
            | OutputColumn::Dic
            | OutputColumn::Talk
            | OutputColumn::Pco2Atm
            | OutputColumn::Satellite(_) => ColumnKind::Number,
            _ => ColumnKind::Text,
        }
    }

    pub fn cell<'a>(&self, record: &'a EnrichedRecord) -> Cell<'a> {
        let obs = &record.observation;
        match self {
            OutputColumn::Accession => Cell::Text(obs.accession.as_deref()),
            OutputColumn::Expocode => Cell::Text(obs.expocode.as_deref()),
            OutputColumn::CruiseId => Cell::Text(obs.cruise_id.as_deref()),
            OutputColumn::ObservationType => Cell::Text(obs.observation_type.as_deref()),
            OutputColumn::StationId => Cell::Text(obs.station_id.as_deref()),
            OutputColumn::CastNumber => Cell::Text(obs.cast_number.as_deref()),
            OutputColumn::NiskinId => Cell::Text(obs.niskin_id.as_deref()),
            OutputColumn::SampleId => Cell::Text(obs.sample_id.as_deref()),
            OutputColumn::Date => Cell::Date(obs.date),
            OutputColumn::Latitude => Cell::Number(obs.latitude),
            OutputColumn::Longitude => Cell::Number(obs.longitude),
            OutputColumn::Season => Cell::Text(obs.season.map(|s| s.as_str())),
            OutputColumn::Pressure => Cell::Number(obs.pressure),
            OutputColumn::Depth => Cell::Number(obs.depth),
            OutputColumn::Temperature => Cell::Number(obs.temperature),
            OutputColumn::TemperatureFlag => Cell::Flag(obs.temperature_flag),
            OutputColumn::Salinity => Cell::Number(obs.salinity),
            OutputColumn::SalinityFlag => Cell::Flag(obs.salinity_flag),
            OutputColumn::Oxygen => Cell::Number(obs.oxygen),
            OutputColumn::OxygenFlag => Cell::Flag(obs.oxygen_flag),
            OutputColumn::Dic => Cell::Number(obs.dic),
            OutputColumn::DicFlag => Cell::Flag(obs.dic_flag),
            OutputColumn::Talk => Cell::Number(obs.talk),
            OutputColumn::TalkFlag => Cell::Flag(obs.talk_flag),
            OutputColumn::Pco2Atm => Cell::Number(Some(record.pco2_atm)),
            OutputColumn::Satellite(column) => Cell::Number(record.satellite.get(*column)),
        }
    }
}

impl Cell<'_> {
    /// Text form used in CSV output; missing values are empty.
    ///
    /// Numbers and flags are written as floats (`10.0`, `2.0`), the way the
    /// float-typed columns of the source table are.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(value) => value.unwrap_or_default().to_string(),
            Cell::Date(value) => value
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            Cell::Number(value) => value.map(float_field).unwrap_or_default(),
            Cell::Flag(value) => value
                .map(|f| float_field(f64::from(f.code())))
                .unwrap_or_default(),
        }
    }
}

fn float_field(value: f64) -> String {
    // Debug keeps the trailing ".0" on whole numbers
    format!("{:?}", value)
}
