pub mod export_button;
