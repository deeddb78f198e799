//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the level from the config is used.

use env_logger::Env;
use log::LevelFilter;

pub fn init(default_level: LevelFilter) {
    let env = Env::default().default_filter_or(default_level.as_str());
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();
}
