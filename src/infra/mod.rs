pub mod fs_sink;
pub mod grafana_catalog;
