//! Configuration value objects

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_KEYBOARD, DEFAULT_KEY_DELAY_MS, DEFAULT_START_DELAY_MS,
};
