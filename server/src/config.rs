use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

/// Resources are revalidated on every session so a dataset update is never
/// shadowed by a stale browser copy.
pub const DATA_CACHE_CONTROL: &str = "no-cache";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn data_dir() -> PathBuf {
    dir_from_env("DATA_DIR", DEFAULT_DATA_DIR)
}

pub fn static_dir() -> PathBuf {
    dir_from_env("STATIC_DIR", DEFAULT_STATIC_DIR)
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
