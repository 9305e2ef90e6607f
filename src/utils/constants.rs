/// Input and output locations
pub const DEFAULT_BOTTLE_FILE: &str = "data/CODAP_combined.csv";
pub const DEFAULT_CO2_FILE: &str = "data/co2_annmean_mlo.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_CONFIG_FILE: &str = "bottle-prep.toml";
pub const ENV_PREFIX: &str = "BOTTLE_PREP";

/// Satellite archive roots
pub const DEFAULT_SSH_DIR: &str = "satellite/AVISO/daily";
pub const DEFAULT_SST_DIR: &str = "satellite/SST/NOAA_OI";
pub const DEFAULT_SST_HIRES_DIR: &str = "satellite/PO.DAAC";
pub const DEFAULT_CHL_DIR: &str = "satellite/CHL";
pub const DEFAULT_KD490_DIR: &str = "satellite/KD490";

/// Satellite file name templates (relative to the product directory)
pub const SSH_TEMPLATE: &str = "{YYYY}/{MM}/dt_global_allsat_phy_l4_{YYYY}{MM}{DD}_????????.nc";
pub const SST_TEMPLATE: &str = "{YYYY}/{DOY}/{YYYY}*AVHRR_OI*.nc";
pub const SST_HIRES_TEMPLATE: &str =
    "subset_{YYYY}{MM}{DD}090000-JPL-L4_GHRSST-SSTfnd-MUR-GLOB-v02.0-fv04.1.nc";
pub const CHL_TEMPLATE: &str = "subset_{YYYY}{MM}{DD}_d-ACRI-L4-CHL-MULTI_4KM-GLO-REP.nc";
pub const KD490_TEMPLATE: &str = "subset_{YYYY}{MM}{DD}_d-ACRI-L4-KD490-MULTI_4KM-GLO-REP.nc";

/// Missing-value markers in the bottle file
pub const MISSING_TOKENS: [&str; 4] = ["", "<undefined>", "NaN", "nan"];
pub const MISSING_NUMERIC: f64 = -999.0;

/// Unit conversion
pub const KELVIN_OFFSET: f64 = 273.15;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Output compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
