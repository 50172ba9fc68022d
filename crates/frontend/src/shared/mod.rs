pub mod components;
pub mod export;
