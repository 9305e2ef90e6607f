use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, PreparedDataset};
use crate::utils::constants::{DEFAULT_BATCH_SIZE, DEFAULT_ROW_GROUP_SIZE};
use crate::writers::{output_columns, Cell, ColumnKind, OutputColumn};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub struct ParquetWriter {
    compression: Compression,
    batch_size: usize,
    include_satellite: bool,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            batch_size: DEFAULT_BATCH_SIZE,
            include_satellite: true,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn with_satellite_columns(mut self, include: bool) -> Self {
        self.include_satellite = include;
        self
    }

    /// Write a prepared dataset, one record batch per `batch_size` rows.
    ///
    /// An empty dataset still produces a file carrying the schema.
    pub fn write_dataset(&self, dataset: &PreparedDataset, path: &Path) -> Result<()> {
        let columns = output_columns(dataset.target, self.include_satellite);
        let schema = self.create_schema(&columns);

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in dataset.records.chunks(self.batch_size) {
            let batch = self.records_to_batch(chunk, &columns, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;

        info!(
            target_variable = %dataset.target,
            rows = dataset.len(),
            path = %path.display(),
            "Wrote Parquet dataset"
        );
        Ok(())
    }

    fn create_schema(&self, columns: &[OutputColumn]) -> Arc<Schema> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|column| {
                let data_type = match column.kind() {
                    ColumnKind::Text => DataType::Utf8,
                    ColumnKind::Date => DataType::Date32,
                    ColumnKind::Number => DataType::Float64,
                    ColumnKind::Flag => DataType::UInt8,
                };
                Field::new(column.header(), data_type, true)
            })
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        records: &[EnrichedRecord],
        columns: &[OutputColumn],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = columns
            .iter()
            .map(|column| column_array(*column, records))
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();
        let column_names = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
            column_names,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column_array(column: OutputColumn, records: &[EnrichedRecord]) -> ArrayRef {
    match column.kind() {
        ColumnKind::Text => {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|r| match column.cell(r) {
                    Cell::Text(value) => value.map(str::to_string),
                    _ => None,
                })
                .collect();
            Arc::new(StringArray::from(values))
        }
        ColumnKind::Date => {
            let values: Vec<Option<i32>> = records
                .iter()
                .map(|r| match column.cell(r) {
                    Cell::Date(value) => {
                        value.map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                    }
                    _ => None,
                })
                .collect();
            Arc::new(Date32Array::from(values))
        }
        ColumnKind::Number => {
            let values: Vec<Option<f64>> = records
                .iter()
                .map(|r| match column.cell(r) {
                    Cell::Number(value) => value,
                    _ => None,
                })
                .collect();
            Arc::new(Float64Array::from(values))
        }
        ColumnKind::Flag => {
            let values: Vec<Option<u8>> = records
                .iter()
                .map(|r| match column.cell(r) {
                    Cell::Flag(value) => value.map(|f| f.code()),
                    _ => None,
                })
                .collect();
            Arc::new(UInt8Array::from(values))
        }
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
    pub column_names: Vec<String>,
}
