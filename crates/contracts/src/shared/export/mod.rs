//! Универсальный экспорт табличных данных в CSV
//!
//! Здесь только переносимое ядро без ввода-вывода. Скачивание файла
//! реализовано отдельно: во frontend через Blob, в backend через файловую систему.

pub mod csv;
pub mod dto;
pub mod error;
pub mod filename;
pub mod header;
pub mod transform;

pub use self::csv::{build_csv, build_csv_from, escape_field, serialize_row, stringify_value, CsvOptions};
pub use dto::{ColumnFormat, CsvExportRequest, CsvExportResponse, ExportColumn};
pub use error::{ExportError, FieldTransformError};
pub use filename::{csv_filename, timestamped_filename};
pub use header::HeaderMapping;
pub use transform::{Transformer, TransformerRegistry};

/// Собирает CSV из запроса: колонки задают и маппинг, и трансформеры.
/// `fallback` применяется, если в запросе нет своих `options`.
pub fn render_request(
    request: &CsvExportRequest,
    fallback: &CsvOptions,
) -> Result<String, ExportError> {
    let mapping = HeaderMapping::from_columns(&request.columns);
    let transformers = TransformerRegistry::from_columns(&request.columns);
    let options = request.options.as_ref().unwrap_or(fallback);
    build_csv(&request.rows, &mapping, &transformers, options)
}
