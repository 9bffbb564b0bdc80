use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub search_debounce_ms: u64,
    pub tickets_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            tickets_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    search_debounce_ms: Option<u64>,
    tickets_path: Option<String>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("APP__SEARCH_DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.search_debounce_ms = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__TICKETS_PATH") {
        settings.tickets_path = Some(v);
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<FileSettings>(raw) {
        if let Some(v) = file_cfg.search_debounce_ms {
            settings.search_debounce_ms = v;
        }
        if let Some(v) = file_cfg.tickets_path {
            settings.tickets_path = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_product_debounce() {
        let settings = Settings::default();
        assert_eq!(settings.search_debounce_ms, 300);
        assert!(settings.tickets_path.is_none());
    }

    #[test]
    fn file_settings_override_defaults() {
        let mut settings = Settings::default();
        apply_file_settings(
            &mut settings,
            "search_debounce_ms = 50\ntickets_path = \"./tickets.json\"\n",
        );
        assert_eq!(settings.search_debounce_ms, 50);
        assert_eq!(settings.tickets_path.as_deref(), Some("./tickets.json"));
    }

    #[test]
    fn malformed_file_is_ignored() {
        let mut settings = Settings::default();
        apply_file_settings(&mut settings, "search_debounce_ms = \"not a number\"");
        assert_eq!(settings.search_debounce_ms, 300);
    }
}
