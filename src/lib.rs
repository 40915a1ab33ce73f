pub mod backtest;
pub mod calibration;
pub mod data;
pub mod feed;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod pick;
pub mod render;
pub mod signals;
pub mod sizing;
pub mod state;
