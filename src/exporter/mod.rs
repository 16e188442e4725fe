// file: src/exporter/mod.rs
// description: run report exporters

pub mod json;
