use std::path::{Path, PathBuf};

use crate::models::TargetVariable;

/// Prepared dataset path with format: {dir}/bottle_data_{DIC|TA}_prepared.{ext}
pub fn prepared_dataset_filename(output_dir: &Path, target: TargetVariable, extension: &str) -> PathBuf {
    output_dir.join(format!(
        "bottle_data_{}_prepared.{}",
        target.file_label(),
        extension
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepared_dataset_filename() {
        let dic = prepared_dataset_filename(Path::new("data"), TargetVariable::Dic, "csv");
        assert_eq!(dic, PathBuf::from("data/bottle_data_DIC_prepared.csv"));

        let ta = prepared_dataset_filename(Path::new("out"), TargetVariable::Talk, "parquet");
        assert_eq!(ta, PathBuf::from("out/bottle_data_TA_prepared.parquet"));
    }
}
