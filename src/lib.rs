// src/lib.rs

//! Flight-disruption compensation claim client.

pub mod error;
pub mod locale;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
pub mod wizard;
