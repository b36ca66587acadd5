pub mod config;
pub mod gateway;
pub mod metrics;
pub mod pdf;
pub mod persistence;
pub mod storage;
