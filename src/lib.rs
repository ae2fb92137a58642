#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;

pub mod aggregate;
pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod upstream;
pub mod views;
