pub mod shared;

pub use shared::components::export_button::ExportButton;
pub use shared::export::{export_list, export_to_csv, trigger_download, CsvExportable};

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}
