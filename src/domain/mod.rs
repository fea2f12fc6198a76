pub mod activity;
pub mod analysis;
pub mod charge_detection;
pub mod cycle_merge;
pub mod models;
