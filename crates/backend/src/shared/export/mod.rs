pub mod file_sink;

use std::path::PathBuf;

use contracts::shared::export::CsvOptions;

use crate::shared::config::{get_export_dir, Config};

/// Настройки выгрузок, общие для всех запросов
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub export_dir: PathBuf,
    pub default_options: CsvOptions,
}

impl ExportSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            export_dir: get_export_dir(config),
            default_options: config.export.csv_options(),
        }
    }
}
