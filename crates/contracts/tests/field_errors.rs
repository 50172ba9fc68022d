//! Ошибка трансформера попадает в лог с ключом поля и номером строки

use std::sync::Mutex;

use contracts::shared::export::{build_csv, CsvOptions, HeaderMapping, TransformerRegistry};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Value};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[test]
fn transformer_failure_is_logged_with_field_and_row() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let rows: Vec<Value> = (0..4)
        .map(|i| {
            let qty = if i == 2 { json!("broken") } else { json!(i) };
            json!({"id": i, "qty": qty})
        })
        .collect();
    let mapping = HeaderMapping::from_pairs([("id", "ID"), ("qty", "Qty")]);
    let transformers = TransformerRegistry::new().with("qty", |v| match v {
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("bad qty {}", other)),
    });

    let csv = build_csv(&rows, &mapping, &transformers, &CsvOptions::default()).unwrap();
    assert_eq!(csv, "ID,Qty\n0,0\n1,1\n2,\n3,3");

    let records = LOGGER.records.lock().unwrap();
    let warnings: Vec<&String> = records
        .iter()
        .filter(|(level, _)| *level == Level::Warn)
        .map(|(_, message)| message)
        .collect();
    assert_eq!(warnings.len(), 1, "warnings: {:?}", warnings);
    assert!(warnings[0].contains("field 'qty'"), "{}", warnings[0]);
    assert!(warnings[0].contains("row 2"), "{}", warnings[0]);
    assert!(warnings[0].contains("bad qty \"broken\""), "{}", warnings[0]);
}
