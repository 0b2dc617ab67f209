pub mod aggregator;
pub mod csv_parser;
pub mod dashboard_service;
pub mod normalizer;
pub mod pipeline;
