use serde::{Deserialize, Serialize};

use crate::models::{Observation, TargetVariable};

/// Output columns filled from satellite grids, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SatelliteColumn {
    Adt,
    Sla,
    Sst,
    SstHires,
    Chl,
    Kd490,
}

impl SatelliteColumn {
    pub const ALL: [SatelliteColumn; 6] = [
        SatelliteColumn::Adt,
        SatelliteColumn::Sla,
        SatelliteColumn::Sst,
        SatelliteColumn::SstHires,
        SatelliteColumn::Chl,
        SatelliteColumn::Kd490,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            SatelliteColumn::Adt => "ADT",
            SatelliteColumn::Sla => "SLA",
            SatelliteColumn::Sst => "SST",
            SatelliteColumn::SstHires => "SST_hires",
            SatelliteColumn::Chl => "Chl",
            SatelliteColumn::Kd490 => "KD490",
        }
    }
}

impl std::fmt::Display for SatelliteColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SatelliteFields {
    pub adt: Option<f64>,
    pub sla: Option<f64>,
    pub sst: Option<f64>,
    pub sst_hires: Option<f64>,
    pub chl: Option<f64>,
    pub kd490: Option<f64>,
}

impl SatelliteFields {
    pub fn get(&self, column: SatelliteColumn) -> Option<f64> {
        match column {
            SatelliteColumn::Adt => self.adt,
            SatelliteColumn::Sla => self.sla,
            SatelliteColumn::Sst => self.sst,
            SatelliteColumn::SstHires => self.sst_hires,
            SatelliteColumn::Chl => self.chl,
            SatelliteColumn::Kd490 => self.kd490,
        }
    }

    pub fn set(&mut self, column: SatelliteColumn, value: Option<f64>) {
        let slot = match column {
            SatelliteColumn::Adt => &mut self.adt,
            SatelliteColumn::Sla => &mut self.sla,
            SatelliteColumn::Sst => &mut self.sst,
            SatelliteColumn::SstHires => &mut self.sst_hires,
            SatelliteColumn::Chl => &mut self.chl,
            SatelliteColumn::Kd490 => &mut self.kd490,
        };
        *slot = value;
    }

    pub fn filled_count(&self) -> usize {
        SatelliteColumn::ALL
            .iter()
            .filter(|c| self.get(**c).is_some())
            .count()
    }
}

/// Observation joined with atmospheric CO2 and, after enrichment, satellite fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub observation: Observation,
    #[serde(rename = "pCO2_atm")]
    pub pco2_atm: f64,
    pub satellite: SatelliteFields,
}

impl EnrichedRecord {
    pub fn new(observation: Observation, pco2_atm: f64) -> Self {
        Self {
            observation,
            pco2_atm,
            satellite: SatelliteFields::default(),
        }
    }
}

/// Rows prepared for one target variable.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    pub target: TargetVariable,
    pub records: Vec<EnrichedRecord>,
}

impl PreparedDataset {
    pub fn new(target: TargetVariable, records: Vec<EnrichedRecord>) -> Self {
        Self { target, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
