use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::csv::stringify_value;
use super::dto::{ColumnFormat, ExportColumn};

/// Преобразователь значения поля в текст ячейки
pub type Transformer = Box<dyn Fn(&Value) -> Result<String, String>>;

/// Набор трансформеров по ключу поля
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: HashMap<String, Transformer>,
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.transformers.keys().collect();
        keys.sort();
        f.debug_struct("TransformerRegistry")
            .field("keys", &keys)
            .finish()
    }
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует трансформер. Повторная регистрация заменяет предыдущий.
    pub fn register<F>(&mut self, key: impl Into<String>, transformer: F)
    where
        F: Fn(&Value) -> Result<String, String> + 'static,
    {
        self.transformers.insert(key.into(), Box::new(transformer));
    }

    pub fn with<F>(mut self, key: impl Into<String>, transformer: F) -> Self
    where
        F: Fn(&Value) -> Result<String, String> + 'static,
    {
        self.register(key, transformer);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Transformer> {
        self.transformers.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Собирает трансформеры из декларативного описания колонок
    pub fn from_columns(columns: &[ExportColumn]) -> Self {
        let mut registry = Self::new();
        for column in columns {
            if column.format.is_none() && column.null_placeholder.is_none() {
                continue;
            }
            let format = column.format.unwrap_or(ColumnFormat::Text);
            match column.null_placeholder.clone() {
                Some(placeholder) => registry.register(
                    column.key.clone(),
                    with_placeholder(stock(format), placeholder),
                ),
                None => registry.register(column.key.clone(), stock(format)),
            }
        }
        registry
    }
}

/// Стандартный трансформер для формата колонки
pub fn stock(format: ColumnFormat) -> fn(&Value) -> Result<String, String> {
    match format {
        ColumnFormat::Text => text,
        ColumnFormat::Money => money,
        ColumnFormat::MoneyComma => money_comma,
        ColumnFormat::Integer => integer,
        ColumnFormat::Date => date,
        ColumnFormat::DateTime => datetime,
        ColumnFormat::YesNo => yes_no,
    }
}

/// Оборачивает трансформер: null/отсутствующее значение заменяется на `placeholder`
pub fn with_placeholder<F>(inner: F, placeholder: String) -> impl Fn(&Value) -> Result<String, String>
where
    F: Fn(&Value) -> Result<String, String>,
{
    move |value| match value {
        Value::Null => Ok(placeholder.clone()),
        other => inner(other),
    }
}

pub fn text(value: &Value) -> Result<String, String> {
    Ok(stringify_value(value))
}

fn as_number(value: &Value) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("number out of range: {}", n)),
        Value::String(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| format!("not a number '{}': {}", s, e)),
        Value::String(_) => Ok(None),
        other => Err(format!("expected number, got {}", other)),
    }
}

/// Денежная сумма с 2 знаками после точки
pub fn money(value: &Value) -> Result<String, String> {
    Ok(as_number(value)?
        .map(|n| format!("{:.2}", n))
        .unwrap_or_default())
}

/// Денежная сумма с запятой как десятичным разделителем (для Excel)
pub fn money_comma(value: &Value) -> Result<String, String> {
    Ok(money(value)?.replace('.', ","))
}

/// Целое с округлением половины от нуля (2.5 -> 3, -2.5 -> -3)
pub fn integer(value: &Value) -> Result<String, String> {
    Ok(as_number(value)?
        .map(|n| format!("{:.0}", n.round()))
        .unwrap_or_default())
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("not an ISO 8601 date '{}': {}", s, e))?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{}'", s))
}

fn as_datetime(value: &Value) -> Result<Option<NaiveDateTime>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_datetime(s.trim()).map(Some),
        other => Err(format!("expected date string, got {}", other)),
    }
}

/// ISO 8601 -> DD.MM.YYYY
pub fn date(value: &Value) -> Result<String, String> {
    Ok(as_datetime(value)?
        .map(|dt| dt.format("%d.%m.%Y").to_string())
        .unwrap_or_default())
}

/// ISO 8601 -> DD.MM.YYYY HH:MM:SS
pub fn datetime(value: &Value) -> Result<String, String> {
    Ok(as_datetime(value)?
        .map(|dt| dt.format("%d.%m.%Y %H:%M:%S").to_string())
        .unwrap_or_default())
}

pub fn yes_no(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(true) => Ok("Да".to_string()),
        Value::Bool(false) => Ok("Нет".to_string()),
        other => Err(format!("expected bool, got {}", other)),
    }
}
