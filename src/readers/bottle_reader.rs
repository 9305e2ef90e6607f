use crate::error::{ProcessingError, Result};
use crate::models::{Observation, QualityFlag, Season};
use crate::utils::constants::{MISSING_NUMERIC, MISSING_TOKENS};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use validator::Validate;

/// Columns read from the combined bottle file, in output order.
pub const BOTTLE_COLUMNS: [&str; 23] = [
    "Accession",
    "EXPOCODE",
    "Cruise_ID",
    "Observation_type",
    "Station_ID",
    "Cast_number",
    "Niskin_ID",
    "Sample_ID",
    "Date",
    "Latitude",
    "Longitude",
    "CTDPRES",
    "Depth",
    "CTDTEMP_ITS90",
    "CTDTEMP_flag",
    "recommended_Salinity_PSS78",
    "recommended_Salinity_flag",
    "recommended_Oxygen",
    "recommended_Oxygen_flag",
    "DIC",
    "DIC_flag",
    "TALK",
    "TALK_flag",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Reads the combined bottle CSV into observations.
///
/// Rows with an out-of-range position are kept and logged.
pub struct BottleReader;

impl BottleReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        let bytes = std::fs::read(path)?;
        let text = decode_text(bytes);
        let observations = self.read_from_str(&text)?;

        info!(
            path = %path.display(),
            rows = observations.len(),
            "Loaded bottle observations"
        );
        Ok(observations)
    }

    pub fn read_from_str(&self, text: &str) -> Result<Vec<Observation>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let positions: HashMap<&str, usize> =
            headers.iter().enumerate().map(|(i, h)| (h, i)).collect();

        let mut index = [0usize; BOTTLE_COLUMNS.len()];
        for (slot, name) in index.iter_mut().zip(BOTTLE_COLUMNS.iter()) {
            *slot = *positions.get(name).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Bottle file is missing column '{}'", name))
            })?;
        }

        let mut observations = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let cells: Vec<&str> = index
                .iter()
                .map(|i| record.get(*i).unwrap_or(""))
                .collect();

            let observation = parse_row(row + 1, &cells);

            if let Err(e) = observation.validate() {
                warn!(row, error = %e, "Observation position out of range");
            }

            observations.push(observation);
        }

        Ok(observations)
    }
}

impl Default for BottleReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode file bytes as UTF-8, falling back to Windows-1252.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        Err(e) => {
            debug!("Input is not UTF-8, decoding as Windows-1252");
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Build one observation. Cells that cannot be parsed are logged and left
/// missing, so the quality filter drops the row where it matters.
fn parse_row(row: usize, cells: &[&str]) -> Observation {
    let date = parse_date(cells[8]);
    let number_at = |column: usize| number(row, BOTTLE_COLUMNS[column], cells[column]);
    let flag_at = |column: usize| flag(row, BOTTLE_COLUMNS[column], cells[column]);

    Observation {
        accession: text(cells[0]),
        expocode: text(cells[1]),
        cruise_id: text(cells[2]),
        observation_type: text(cells[3]),
        station_id: text(cells[4]),
        cast_number: text(cells[5]),
        niskin_id: text(cells[6]),
        sample_id: text(cells[7]),
        date,
        latitude: number_at(9),
        longitude: number_at(10),
        season: date.map(Season::from_date),
        pressure: number_at(11),
        depth: number_at(12),
        temperature: number_at(13),
        temperature_flag: flag_at(14),
        salinity: number_at(15),
        salinity_flag: flag_at(16),
        oxygen: number_at(17),
        oxygen_flag: flag_at(18),
        dic: number_at(19),
        dic_flag: flag_at(20),
        talk: number_at(21),
        talk_flag: flag_at(22),
    }
}

/// True for the missing-value sentinels, including a numeric -999.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.contains(&trimmed)
        || trimmed
            .parse::<f64>()
            .map(|v| v == MISSING_NUMERIC)
            .unwrap_or(false)
}

fn text(value: &str) -> Option<String> {
    (!is_missing(value)).then(|| value.trim().to_string())
}

fn number(row: usize, column: &str, value: &str) -> Option<f64> {
    if is_missing(value) {
        return None;
    }
    match value.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(row, column, value, "Unparseable value, treating as missing");
            None
        }
    }
}

fn flag(row: usize, column: &str, value: &str) -> Option<QualityFlag> {
    if is_missing(value) {
        return None;
    }
    match QualityFlag::parse(value) {
        Ok(flag) => Some(flag),
        Err(e) => {
            warn!(row, column, error = %e, "Unusable quality flag, treating as missing");
            None
        }
    }
}

/// Parse an observation date; unrecognised values become missing.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if is_missing(value) {
        return None;
    }

    // Drop a trailing time component ("2015-06-01 10:30:00", "2015-06-01T10:30")
    let day = value
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(day, format).ok());

    if parsed.is_none() {
        debug!(value, "Unparseable observation date");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetVariable;
    use crate::processors::QualityFilter;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Accession,EXPOCODE,Cruise_ID,Observation_type,Station_ID,Cast_number,\
Niskin_ID,Sample_ID,Date,Latitude,Longitude,CTDPRES,Depth,CTDTEMP_ITS90,CTDTEMP_flag,\
recommended_Salinity_PSS78,recommended_Salinity_flag,recommended_Oxygen,recommended_Oxygen_flag,\
DIC,DIC_flag,TALK,TALK_flag,Extra";

    fn bottle_csv(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_reads_and_renames() -> Result<()> {
        let text = bottle_csv(&[
            "0117971,33GG20150601,GU1506,Niskin,12,1,3,S-1,2015-06-01,41.25,-70.5,10.2,10.1,15.3,2,32.1,2.0,250.1,2,2045.5,2,2250.2,2,x",
        ]);
        let observations = BottleReader::new().read_from_str(&text)?;

        assert_eq!(observations.len(), 1);
        let obs = &observations[0];
        assert_eq!(obs.accession.as_deref(), Some("0117971"));
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2015, 6, 1));
        assert_eq!(obs.season, Some(Season::Summer));
        assert_eq!(obs.pressure, Some(10.2));
        assert_eq!(obs.temperature, Some(15.3));
        assert_eq!(obs.salinity_flag, Some(QualityFlag::Good));
        assert_eq!(obs.talk, Some(2250.2));
        Ok(())
    }

    #[test]
    fn test_missing_sentinels() -> Result<()> {
        let text = bottle_csv(&[
            "A1,<undefined>,,Niskin,-999,1,3,S-2,2016-01-15,41.25,-70.5,-999,10.1,NaN,9,nan,,250.1,2,-999.0,9,,,x",
        ]);
        let obs = &BottleReader::new().read_from_str(&text)?[0];

        assert_eq!(obs.expocode, None);
        assert_eq!(obs.cruise_id, None);
        assert_eq!(obs.station_id, None);
        assert_eq!(obs.pressure, None);
        assert_eq!(obs.temperature, None);
        assert_eq!(obs.temperature_flag, Some(QualityFlag::NotSampled));
        assert_eq!(obs.salinity, None);
        assert_eq!(obs.salinity_flag, None);
        assert_eq!(obs.dic, None);
        assert_eq!(obs.talk_flag, None);
        assert_eq!(obs.season, Some(Season::Winter));
        Ok(())
    }

    #[test]
    fn test_missing_column_is_named() {
        let text = "Accession,Date\nA1,2015-06-01\n";
        let err = BottleReader::new().read_from_str(text).unwrap_err();
        assert!(err.to_string().contains("EXPOCODE"));
    }

    #[test]
    fn test_unusable_cells_become_missing() -> Result<()> {
        let text = bottle_csv(&[
            "A1,E,C,N,1,1,1,S,2015-06-01,41,-70,1,1,15,2,32,2,<5,2,2000,2,2200,2,x",
            "A2,E,C,N,1,1,2,S,2015-06-01,41,-70,1,1,15,2,32,2,250,abc,2010,2.5,2210,2,x",
        ]);
        let observations = BottleReader::new().read_from_str(&text)?;

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].oxygen, None);
        assert_eq!(observations[0].dic_flag, Some(QualityFlag::Good));
        assert_eq!(observations[1].oxygen_flag, None);
        assert_eq!(observations[1].dic_flag, None);
        assert_eq!(observations[1].dic, Some(2010.0));
        Ok(())
    }

    #[test]
    fn test_fractional_flag_row_dropped_by_filter() -> Result<()> {
        let text = bottle_csv(&[
            "A1,E,C,N,1,1,1,S,2015-06-01,41,-70,1,1,15,2,32,2,250,2,2000,2,2200,2,x",
            "A2,E,C,N,1,1,2,S,2015-06-01,41,-70,1,1,15,2,32,2,250,2,2010,2.5,2210,2,x",
            "A3,E,C,N,1,1,3,S,2015-06-02,41,-70,1,1,15,2,32,2,250,2,2020,6,2220,2,x",
        ]);
        let observations = BottleReader::new().read_from_str(&text)?;

        let dic = QualityFilter::new(TargetVariable::Dic).apply(&observations);
        let kept: Vec<_> = dic.kept.iter().map(|o| o.accession.as_deref()).collect();
        assert_eq!(kept, vec![Some("A1"), Some("A3")]);
        assert_eq!(dic.dropped, 1);

        let talk = QualityFilter::new(TargetVariable::Talk).apply(&observations);
        assert_eq!(talk.kept.len(), 3);
        Ok(())
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 6, 1);
        assert_eq!(parse_date("2015-06-01"), expected);
        assert_eq!(parse_date("2015-06-01 10:30:00"), expected);
        assert_eq!(parse_date("2015-06-01T10:30"), expected);
        assert_eq!(parse_date("2015/06/01"), expected);
        assert_eq!(parse_date("06/01/2015"), expected);
        assert_eq!(parse_date("20150601"), expected);
        assert_eq!(parse_date("June 1st"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_unparseable_date_keeps_row() -> Result<()> {
        let text = bottle_csv(&[
            "A1,E,C,N,1,1,1,S,not-a-date,41,-70,1,1,15,2,32,2,250,2,2000,2,2200,2,x",
        ]);
        let observations = BottleReader::new().read_from_str(&text)?;

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].date, None);
        assert_eq!(observations[0].season, None);
        Ok(())
    }

    #[test]
    fn test_windows_1252_fallback() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"\nA1,E,C\xe9,N,1,1,1,S,2015-06-01,41,-70,1,1,15,2,32,2,250,2,2000,2,2200,2,x\n");
        temp_file.write_all(&bytes)?;

        let observations = BottleReader::new().read_observations(temp_file.path())?;
        assert_eq!(observations[0].cruise_id.as_deref(), Some("Cé"));
        Ok(())
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(""));
        assert!(is_missing(" <undefined> "));
        assert!(is_missing("-999"));
        assert!(is_missing("-999.00"));
        assert!(!is_missing("-99.9"));
        assert!(!is_missing("0"));
    }
}
