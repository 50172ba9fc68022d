//! Кнопка "Экспорт в Excel" для страниц списков
//!
//! ```text
//! <ExportButton
//!     rows=rows_signal
//!     columns=vec![
//!         ExportColumn::new("order_no", "Заказ"),
//!         ExportColumn::new("total", "Сумма").with_format(ColumnFormat::MoneyComma),
//!     ]
//!     filename="orders"
//!     timestamped=true
//! />
//! ```

use contracts::shared::export::{
    timestamped_filename, CsvOptions, ExportColumn, HeaderMapping, TransformerRegistry,
};
use leptos::prelude::*;
use thaw::*;

use crate::shared::export::export_to_csv;

#[component]
pub fn ExportButton(
    /// Строки текущего списка
    #[prop(into)]
    rows: Signal<Vec<serde_json::Value>>,

    /// Колонки выгрузки в нужном порядке
    columns: Vec<ExportColumn>,

    /// Имя файла без расширения
    #[prop(into)]
    filename: String,

    /// По умолчанию `CsvOptions::excel()`
    #[prop(optional)]
    options: Option<CsvOptions>,

    /// Добавлять к имени файла дату и время выгрузки
    #[prop(optional)]
    timestamped: bool,

    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    let columns = StoredValue::new(columns);
    let options = options.unwrap_or_else(CsvOptions::excel);
    let label = label.unwrap_or_else(|| "📥 Экспорт в Excel".to_string());
    let (error, set_error) = signal(None::<String>);

    let on_export = move || {
        let items = rows.get_untracked();
        let name = if timestamped {
            timestamped_filename(&filename, &chrono::Local::now())
        } else {
            filename.clone()
        };

        let result = columns.with_value(|cols| {
            let mapping = HeaderMapping::from_columns(cols);
            let transformers = TransformerRegistry::from_columns(cols);
            export_to_csv(&items, &name, &mapping, Some(&transformers), &options)
        });

        match result {
            Ok(()) => set_error.set(None),
            Err(e) => {
                log::error!("Export failed: {}", e);
                set_error.set(Some(e.to_string()));
            }
        }
    };

    view! {
        <Flex vertical=false gap=FlexGap::Small>
            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Secondary
                disabled=Signal::derive(move || rows.with(|r| r.is_empty()))
                on_click=move |_| on_export()
            >
                {label}
            </Button>
            {move || error.get().map(|e| view! {
                <span class="export-error" style="color: #d13438; font-size: 0.875rem;">{e}</span>
            })}
        </Flex>
    }
}
