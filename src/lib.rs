pub mod api;
pub mod client;
pub mod config;
pub mod datastore;
pub mod metrics;
pub mod twoface;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
