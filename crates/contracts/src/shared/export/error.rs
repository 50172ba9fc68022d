use thiserror::Error;

/// Ошибки экспорта табличных данных
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Некорректный вход: пустой список строк, пустой набор колонок,
    /// строка не является объектом. Повторять без исправления нет смысла.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Непредвиденная ошибка при сборке документа
    #[error("CSV build error: {0}")]
    Build(String),

    /// Окружение не смогло создать временный ресурс (blob, URL, файл)
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

impl ExportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn export_failed(message: impl Into<String>) -> Self {
        Self::ExportFailed(message.into())
    }
}

/// Ошибка преобразования одного поля.
///
/// Наружу не пробрасывается: логируется, а поле становится пустой строкой.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transformer for field '{key}' failed on row {row}: {message}")]
pub struct FieldTransformError {
    pub key: String,
    pub row: usize,
    pub message: String,
}
