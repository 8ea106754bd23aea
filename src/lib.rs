pub mod api;
pub mod common;
pub mod conf;
pub mod model;
pub mod service;
pub mod ui;
pub mod util;
