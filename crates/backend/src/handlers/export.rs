use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::export::{
    csv_filename, render_request, CsvExportRequest, CsvExportResponse, ExportError,
};

use crate::shared::export::{file_sink, ExportSettings};

fn error_response(e: ExportError) -> (StatusCode, String) {
    let status = match e {
        ExportError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ExportError::Build(_) | ExportError::ExportFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("CSV export failed: {}", e);
    } else {
        tracing::warn!("CSV export rejected: {}", e);
    }
    (status, e.to_string())
}

/// Заголовок Content-Disposition с ASCII-именем и RFC 5987 вариантом в UTF-8
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(filename)
    )
}

/// POST /api/export/csv
///
/// Возвращает CSV как вложение для скачивания браузером.
pub async fn download_csv(
    State(settings): State<Arc<ExportSettings>>,
    Json(req): Json<CsvExportRequest>,
) -> Result<Response, (StatusCode, String)> {
    let csv = render_request(&req, &settings.default_options).map_err(error_response)?;
    let filename = csv_filename(&file_sink::sanitize_filename(&req.filename).map_err(error_response)?);

    tracing::info!("CSV export '{}': {} rows, {} bytes", filename, req.rows.len(), csv.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/export/csv/save
///
/// Сохраняет CSV в каталог выгрузок сервера.
pub async fn save_csv(
    State(settings): State<Arc<ExportSettings>>,
    Json(req): Json<CsvExportRequest>,
) -> Result<Json<CsvExportResponse>, (StatusCode, String)> {
    let csv = render_request(&req, &settings.default_options).map_err(error_response)?;
    let rows = req.rows.len();
    let bytes = csv.len();
    let dir = settings.export_dir.clone();
    let filename = req.filename;

    let path = tokio::task::spawn_blocking(move || file_sink::write_csv_file(&csv, &dir, &filename))
        .await
        .map_err(|e| error_response(ExportError::export_failed(format!("export task failed: {}", e))))?
        .map_err(error_response)?;

    Ok(Json(CsvExportResponse {
        path: path.display().to_string(),
        rows,
        bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use contracts::shared::export::CsvOptions;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn state(dir: PathBuf) -> State<Arc<ExportSettings>> {
        State(Arc::new(ExportSettings {
            export_dir: dir,
            default_options: CsvOptions::default(),
        }))
    }

    fn orders_request(rows: serde_json::Value) -> CsvExportRequest {
        serde_json::from_value(json!({
            "filename": "orders",
            "columns": [
                {"key": "number", "label": "Order"},
                {"key": "customer", "label": "Customer"},
                {"key": "total", "label": "Total", "format": "money"}
            ],
            "rows": rows
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_download_returns_csv_attachment() {
        let dir = tempdir().unwrap();
        let req = orders_request(json!([
            {"number": "A-1", "customer": "Smith, John", "total": 10},
            {"number": "A-2", "customer": null, "total": 7.5}
        ]));

        let resp = download_csv(state(dir.path().to_path_buf()), Json(req))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"orders.csv\"; filename*=UTF-8''orders.csv"
        );

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text, "Order,Customer,Total\nA-1,\"Smith, John\",10.00\nA-2,,7.50");

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let customers: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(customers, vec!["Smith, John", ""]);
    }

    #[tokio::test]
    async fn test_download_uses_server_default_options() {
        let dir = tempdir().unwrap();
        let settings = State(Arc::new(ExportSettings {
            export_dir: dir.path().to_path_buf(),
            default_options: CsvOptions::excel(),
        }));
        let req = orders_request(json!([{"number": "A-1", "customer": "X", "total": 1}]));

        let resp = download_csv(settings, Json(req)).await.unwrap();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();

        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "\u{FEFF}Order;Customer;Total\nA-1;X;1.00"
        );
    }

    #[tokio::test]
    async fn test_download_rejects_empty_rows() {
        let dir = tempdir().unwrap();
        let req = orders_request(json!([]));

        let (status, message) = download_csv(state(dir.path().to_path_buf()), Json(req))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.starts_with("Invalid input"));
    }

    #[tokio::test]
    async fn test_download_rejects_quote_delimiter() {
        let dir = tempdir().unwrap();
        let mut req = orders_request(json!([{"number": "A-1", "customer": "X", "total": 1}]));
        req.options = Some(CsvOptions {
            delimiter: '"',
            ..CsvOptions::default()
        });

        let (status, message) = download_csv(state(dir.path().to_path_buf()), Json(req))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("delimiter"));
    }

    #[tokio::test]
    async fn test_save_writes_into_export_dir() {
        let dir = tempdir().unwrap();
        let req = orders_request(json!([{"number": "A-1", "customer": "X", "total": 2}]));

        let Json(resp) = save_csv(state(dir.path().to_path_buf()), Json(req))
            .await
            .unwrap();

        let expected = dir.path().join("orders.csv");
        assert_eq!(resp.path, expected.display().to_string());
        assert_eq!(resp.rows, 1);
        let content = std::fs::read_to_string(expected).unwrap();
        assert_eq!(content, "Order,Customer,Total\nA-1,X,2.00");
        assert_eq!(resp.bytes, content.len());
    }

    #[tokio::test]
    async fn test_save_rejects_non_object_rows() {
        let dir = tempdir().unwrap();
        let req = orders_request(json!([{"number": "A-1"}, "oops"]));

        let (status, _) = save_csv(state(dir.path().to_path_buf()), Json(req))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("Заказы.csv");
        assert_eq!(
            value,
            "attachment; filename=\"______.csv\"; filename*=UTF-8''%D0%97%D0%B0%D0%BA%D0%B0%D0%B7%D1%8B.csv"
        );
    }
}
