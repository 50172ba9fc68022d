//! Сохранение CSV на диск: временный файл + атомарное переименование

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::shared::export::{csv_filename, ExportError};
use uuid::Uuid;

fn io_err(operation: &str, path: &Path, e: std::io::Error) -> ExportError {
    ExportError::ExportFailed(format!("{} {}: {}", operation, path.display(), e))
}

/// Оставляет от имени только безопасный для файловой системы компонент
pub fn sanitize_filename(filename: &str) -> Result<String, ExportError> {
    let cleaned: String = filename
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        return Err(ExportError::invalid_input(format!(
            "Invalid export filename: '{}'",
            filename
        )));
    }
    Ok(cleaned)
}

/// Удаляет временный файл, если запись не дошла до переименования
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove temp file {}: {}", self.path.display(), e);
                }
            }
        }
    }
}

/// Записывает CSV в `<dir>/<filename>.csv` и возвращает итоговый путь.
///
/// Файловый дескриптор закрывается до переименования; при любой ошибке
/// временный файл удаляется. Параллельные выгрузки с одним именем пишут
/// в разные временные файлы, побеждает последнее переименование.
pub fn write_csv_file(csv_text: &str, dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    let name = csv_filename(&sanitize_filename(filename)?);
    let target = dir.join(&name);

    fs::create_dir_all(dir).map_err(|e| io_err("create directory", dir, e))?;

    let temp_path = dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));
    let guard = TempFileGuard::new(temp_path.clone());

    {
        let mut file = File::create(&temp_path).map_err(|e| io_err("create", &temp_path, e))?;
        file.write_all(csv_text.as_bytes())
            .map_err(|e| io_err("write", &temp_path, e))?;
        file.sync_all().map_err(|e| io_err("sync", &temp_path, e))?;
    }

    fs::rename(&temp_path, &target).map_err(|e| io_err("rename", &target, e))?;
    guard.disarm();

    tracing::info!(
        "CSV export saved to {} ({} bytes)",
        target.display(),
        csv_text.len()
    );
    Ok(target)
}
