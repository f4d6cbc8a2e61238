use std::{fs, path::Path};

use tracing::warn;

pub const SETTINGS_FILE: &str = "inventory.toml";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub show_ids: bool,
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            show_ids: false,
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `inventory.toml` in the working directory, then the
/// process environment.
pub fn load_settings() -> ClientSettings {
    load_settings_with(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_with(
    file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(table) => {
                if let Some(v) = table.get("server_url").and_then(|v| v.as_str()) {
                    settings.server_url = v.to_string();
                }
                if let Some(v) = table.get("show_ids").and_then(parse_flag) {
                    settings.show_ids = v;
                }
                if let Some(v) = table.get("log_filter").and_then(|v| v.as_str()) {
                    settings.log_filter = v.to_string();
                }
            }
            Err(err) => warn!(path = %file.display(), %err, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("INVENTORY_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SHOW_IDS").and_then(|v| parse_flag_str(&v)) {
        settings.show_ids = v;
    }
    if let Some(v) = env("RUST_LOG").filter(|v| !v.trim().is_empty()) {
        settings.log_filter = v;
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    settings
}

pub fn normalize_server_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

fn parse_flag(value: &toml::Value) -> Option<bool> {
    match value {
        toml::Value::Boolean(flag) => Some(*flag),
        toml::Value::String(text) => parse_flag_str(text),
        _ => None,
    }
}

fn parse_flag_str(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_settings_file(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("inventory_settings_test_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let settings = load_settings_with(Path::new("does/not/exist.toml"), |_| None);
        assert_eq!(settings, ClientSettings::default());
    }

    #[test]
    fn file_values_are_overridden_by_environment() {
        let path = temp_settings_file(
            "server_url = \"inventory.local:9000/\"\nshow_ids = \"yes\"\nlog_filter = \"debug\"\n",
        );
        let from_file = load_settings_with(&path, |_| None);
        assert_eq!(from_file.server_url, "http://inventory.local:9000");
        assert!(from_file.show_ids);
        assert_eq!(from_file.log_filter, "debug");

        let env_vars: HashMap<&str, &str> = HashMap::from([
            ("INVENTORY_SERVER_URL", "http://ignored:1"),
            ("APP__SERVER_URL", "https://fleet.example.com"),
            ("APP__SHOW_IDS", "off"),
        ]);
        let layered = load_settings_with(&path, |name| env_vars.get(name).map(|v| v.to_string()));
        assert_eq!(layered.server_url, "https://fleet.example.com");
        assert!(!layered.show_ids);
        assert_eq!(layered.log_filter, "debug");

        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn invalid_settings_file_falls_back_to_defaults() {
        let path = temp_settings_file("server_url = [unterminated");
        let settings = load_settings_with(&path, |_| None);
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
        fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
    }

    #[test]
    fn normalizes_server_urls() {
        assert_eq!(normalize_server_url("  "), DEFAULT_SERVER_URL);
        assert_eq!(normalize_server_url("localhost:8000"), "http://localhost:8000");
        assert_eq!(
            normalize_server_url("https://fleet.example.com/"),
            "https://fleet.example.com"
        );
    }
}
