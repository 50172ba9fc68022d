//! Универсальный модуль для экспорта списков в CSV и скачивания файла
pub mod download;

use contracts::shared::export::{
    build_csv, build_csv_from, CsvOptions, ExportError, HeaderMapping, TransformerRegistry,
};
use serde::Serialize;
use serde_json::Value;

pub use download::trigger_download;

/// Trait для типов, которые могут быть экспортированы в CSV
pub trait CsvExportable: Serialize {
    /// Колонки выгрузки в нужном порядке
    fn columns() -> HeaderMapping;

    /// Форматирование отдельных колонок
    fn transformers() -> TransformerRegistry {
        TransformerRegistry::new()
    }

    fn csv_options() -> CsvOptions {
        CsvOptions::excel()
    }
}

/// Собирает CSV и инициирует скачивание.
///
/// Ошибка сборки прерывает экспорт до создания Blob.
pub fn export_to_csv(
    rows: &[Value],
    filename: &str,
    mapping: &HeaderMapping,
    transformers: Option<&TransformerRegistry>,
    options: &CsvOptions,
) -> Result<(), ExportError> {
    let empty = TransformerRegistry::new();
    let csv = build_csv(rows, mapping, transformers.unwrap_or(&empty), options)?;
    trigger_download(&csv, filename)
}

/// Экспортирует список DTO в CSV файл и инициирует скачивание
pub fn export_list<T: CsvExportable>(items: &[T], filename: &str) -> Result<(), ExportError> {
    let csv = build_csv_from(items, &T::columns(), &T::transformers(), &T::csv_options())?;
    trigger_download(&csv, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::export::transform;

    #[derive(Serialize)]
    struct SaleRow {
        document_no: String,
        sale_date: String,
        amount: Option<f64>,
    }

    impl CsvExportable for SaleRow {
        fn columns() -> HeaderMapping {
            HeaderMapping::new()
                .column("document_no", "Документ №")
                .column("sale_date", "Дата продажи")
                .column("amount", "К выплате")
        }

        fn transformers() -> TransformerRegistry {
            TransformerRegistry::new()
                .with("sale_date", transform::date)
                .with("amount", transform::with_placeholder(transform::money_comma, "—".to_string()))
        }
    }

    #[test]
    fn test_exportable_defaults_to_excel_layout() {
        let items = vec![
            SaleRow {
                document_no: "WB-1".to_string(),
                sale_date: "2025-11-05T16:52:58Z".to_string(),
                amount: Some(1200.0),
            },
            SaleRow {
                document_no: "WB-2; возврат".to_string(),
                sale_date: "2025-11-06".to_string(),
                amount: None,
            },
        ];
        let csv = build_csv_from(
            &items,
            &SaleRow::columns(),
            &SaleRow::transformers(),
            &SaleRow::csv_options(),
        )
        .unwrap();
        assert_eq!(
            csv,
            "\u{FEFF}Документ №;Дата продажи;К выплате\nWB-1;05.11.2025;1200,00\n\"WB-2; возврат\";06.11.2025;—"
        );
    }

    // Вне браузера `trigger_download` не может отработать: Ok или паника
    // означали бы, что сборка пропустила пустой список.
    #[test]
    fn test_empty_rows_fail_before_download() {
        let mapping = HeaderMapping::from_pairs([("order_no", "Заказ")]);
        let result = export_to_csv(&[], "orders", &mapping, None, &CsvOptions::default());
        assert!(matches!(result, Err(ExportError::InvalidInput(_))));

        let result = export_list::<SaleRow>(&[], "sales");
        assert!(matches!(result, Err(ExportError::InvalidInput(_))));
    }
}
