//! Сборка CSV документа из строк-объектов
//!
//! Экранирование по RFC 4180: значение, содержащее разделитель, кавычку или
//! перевод строки, оборачивается в кавычки, внутренние кавычки удваиваются.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ExportError, FieldTransformError};
use super::header::HeaderMapping;
use super::transform::TransformerRegistry;

const UTF8_BOM: char = '\u{FEFF}';

/// Параметры формирования CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: char,
    /// UTF-8 BOM для корректного отображения кириллицы в Excel
    pub with_bom: bool,
    /// Экранировать заголовки так же, как значения
    pub escape_headers: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            with_bom: false,
            escape_headers: true,
        }
    }
}

impl CsvOptions {
    /// Excel с русской локалью: точка с запятой и BOM
    pub fn excel() -> Self {
        Self {
            delimiter: ';',
            with_bom: true,
            escape_headers: true,
        }
    }

    /// Разделитель не может совпадать с кавычкой или переводом строки
    pub fn validate(&self) -> Result<(), ExportError> {
        match self.delimiter {
            '"' | '\n' | '\r' => Err(ExportError::InvalidInput(format!(
                "delimiter {:?} is not allowed",
                self.delimiter
            ))),
            _ => Ok(()),
        }
    }
}

/// Экранирует ячейку, если она содержит разделитель, кавычку или перевод строки
pub fn escape_field(cell: &str, delimiter: char) -> String {
    let needs_quotes = cell
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if needs_quotes {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Естественное строковое представление значения. `null` -> пустая строка.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Вложенные объекты и массивы пишем компактным JSON
        other => other.to_string(),
    }
}

/// Преобразует одну строку в строку CSV без завершающего перевода строки.
///
/// Ошибка трансформера не прерывает экспорт: поле становится пустым,
/// ошибка пишется в лог.
pub fn serialize_row(
    row: &Value,
    index: usize,
    mapping: &HeaderMapping,
    transformers: &TransformerRegistry,
    options: &CsvOptions,
) -> String {
    let delimiter = options.delimiter.to_string();
    mapping
        .keys()
        .map(|key| {
            let raw = row.get(key).unwrap_or(&Value::Null);
            let cell = match transformers.get(key) {
                Some(transform) => transform(raw).unwrap_or_else(|message| {
                    let err = FieldTransformError {
                        key: key.to_string(),
                        row: index,
                        message,
                    };
                    log::warn!("{}", err);
                    String::new()
                }),
                None => stringify_value(raw),
            };
            escape_field(&cell, options.delimiter)
        })
        .collect::<Vec<_>>()
        .join(&delimiter)
}

fn header_line(mapping: &HeaderMapping, options: &CsvOptions) -> String {
    let delimiter = options.delimiter.to_string();
    mapping
        .labels()
        .map(|label| {
            if options.escape_headers {
                escape_field(label, options.delimiter)
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&delimiter)
}

fn validate(
    rows: &[Value],
    mapping: &HeaderMapping,
    options: &CsvOptions,
) -> Result<(), ExportError> {
    options.validate()?;
    if rows.is_empty() {
        return Err(ExportError::invalid_input("Нет данных для экспорта"));
    }
    if mapping.is_empty() {
        return Err(ExportError::invalid_input("Не задано ни одной колонки"));
    }
    // Вся выгрузка отклоняется до обработки первой строки
    if let Some(index) = rows.iter().position(|row| !row.is_object()) {
        return Err(ExportError::InvalidInput(format!(
            "row {} is not an object",
            index
        )));
    }
    Ok(())
}

/// Собирает CSV документ: строка заголовков и по строке на каждую запись.
pub fn build_csv(
    rows: &[Value],
    mapping: &HeaderMapping,
    transformers: &TransformerRegistry,
    options: &CsvOptions,
) -> Result<String, ExportError> {
    validate(rows, mapping, options)?;

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_line(mapping, options));
    for (index, row) in rows.iter().enumerate() {
        lines.push(serialize_row(row, index, mapping, transformers, options));
    }

    let mut content = String::new();
    if options.with_bom {
        content.push(UTF8_BOM);
    }
    content.push_str(&lines.join("\n"));

    log::debug!(
        "CSV built: {} rows, {} columns, {} bytes",
        rows.len(),
        mapping.len(),
        content.len()
    );
    Ok(content)
}

/// Вариант `build_csv` для типизированных DTO списков
pub fn build_csv_from<T: Serialize>(
    items: &[T],
    mapping: &HeaderMapping,
    transformers: &TransformerRegistry,
    options: &CsvOptions,
) -> Result<String, ExportError> {
    let rows = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ExportError::Build(format!("Failed to serialize row: {}", e)))?;
    build_csv(&rows, mapping, transformers, options)
}
