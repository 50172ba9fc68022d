use chrono::{DateTime, TimeZone};

/// Добавляет расширение `.csv`, если его ещё нет
pub fn csv_filename(base: &str) -> String {
    let base = base.trim();
    if base.to_lowercase().ends_with(".csv") {
        base.to_string()
    } else {
        format!("{}.csv", base)
    }
}

/// Имя файла выгрузки со штампом времени, например `wb_sales_20250105_164512`
pub fn timestamped_filename<Tz: TimeZone>(base: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}", base, now.format("%Y%m%d_%H%M%S"))
}
