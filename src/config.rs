use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        search_endpoint: get_env_or_default("SEARCH_ENDPOINT", "http://localhost:5000"),
        search_timeout_ms: get_env_or_default("SEARCH_TIMEOUT_MS", "10000")
            .parse()
            .unwrap_or_else(|_| panic!("SEARCH_TIMEOUT_MS must be a number of milliseconds")),
    }
});

pub struct Config {
    pub search_endpoint: String,
    pub search_timeout_ms: u64,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
