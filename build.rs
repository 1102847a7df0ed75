use std::env;
use std::fs;
use std::path::Path;

/// Claves que `AppConfig::from_env` lee con option_env!
const CONFIG_KEYS: [&str; 12] = [
    "API_BASE",
    "ENVIRONMENT",
    "FORCE_STRATEGY",
    "DEFAULT_STORE_CODE",
    "DEV_OPEN_ID",
    "STRATEGY_PRIORITY",
    "STORE_ROUTE_SEGMENT",
    "AUTH_POLL_INTERVAL_MS",
    "AUTH_MAX_WAIT_MS",
    "URL_CLEANUP_DELAY_MS",
    "URL_CLEANUP_VERIFY_DELAY_MS",
    "ENABLE_LOGGING",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=Unknown key '{}' in .env, ignored", key);
                        continue;
                    }
                    // El entorno del proceso manda sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value.trim().trim_matches('"'));
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found, building with default storefront settings (development, store TEST001).");
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
}
