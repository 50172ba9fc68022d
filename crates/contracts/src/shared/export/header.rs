use serde::{Deserialize, Serialize};

use super::dto::ExportColumn;

/// Упорядоченное соответствие "ключ поля -> заголовок колонки".
///
/// Порядок вставки задаёт порядок колонок в CSV. Поля строки, которых нет
/// в маппинге, в экспорт не попадают.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    columns: Vec<(String, String)>,
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет колонку. Повторный ключ меняет только заголовок,
    /// позиция колонки сохраняется.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = label,
            None => self.columns.push((key, label)),
        }
    }

    /// Builder-style вариант `insert`
    pub fn column(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    pub fn from_pairs<K, L, I>(pairs: I) -> Self
    where
        K: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (K, L)>,
    {
        let mut mapping = Self::new();
        for (key, label) in pairs {
            mapping.insert(key, label);
        }
        mapping
    }

    pub fn from_columns(columns: &[ExportColumn]) -> Self {
        Self::from_pairs(columns.iter().map(|c| (c.key.as_str(), c.label.as_str())))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, l)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, l)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for HeaderMapping {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_column_order() {
        let mapping = HeaderMapping::new()
            .column("sku", "Артикул")
            .column("name", "Название")
            .column("price", "Цена");
        assert_eq!(
            mapping.keys().collect::<Vec<_>>(),
            vec!["sku", "name", "price"]
        );
        assert_eq!(
            mapping.labels().collect::<Vec<_>>(),
            vec!["Артикул", "Название", "Цена"]
        );
    }

    #[test]
    fn test_duplicate_key_keeps_position() {
        let mut mapping = HeaderMapping::from_pairs([("a", "A"), ("b", "B")]);
        mapping.insert("a", "Alpha");
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(mapping.label("a"), Some("Alpha"));
    }
}
