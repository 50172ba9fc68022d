use serde::{Deserialize, Serialize};

use super::csv::CsvOptions;

/// Декларативный формат значения колонки.
///
/// Замыкания по сети не передать, поэтому клиент описывает форматирование
/// колонки перечислением, а сервер собирает из него трансформер.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    Text,
    Money,
    MoneyComma,
    Integer,
    Date,
    DateTime,
    YesNo,
}

/// Описание колонки экспорта
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
    /// Текст вместо пустого значения (например "—")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_placeholder: Option<String>,
}

impl ExportColumn {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            format: None,
            null_placeholder: None,
        }
    }

    pub fn with_format(mut self, format: ColumnFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.null_placeholder = Some(placeholder.into());
        self
    }
}

/// DTO запроса на экспорт CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvExportRequest {
    /// Имя файла без расширения, `.csv` добавляется автоматически
    pub filename: String,
    pub columns: Vec<ExportColumn>,
    pub rows: Vec<serde_json::Value>,
    /// Если не заданы, используются настройки получателя запроса
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CsvOptions>,
}

/// Результат сохранения CSV на сервере
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExportResponse {
    pub path: String,
    pub rows: usize,
    pub bytes: usize,
}
