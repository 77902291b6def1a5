use web_sys::window;

pub const MODE_STORAGE_KEY: &str = "appMode";

/// Snapshot polling period for online mode.
pub const POLL_INTERVAL_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Online,
    Offline,
}

impl AppMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Online => "online",
            AppMode::Offline => "offline",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "online" => Some(AppMode::Online),
            "offline" => Some(AppMode::Offline),
            _ => None,
        }
    }
}

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            if !host.is_empty() {
                // Same origin as the page, which the backend serves
                let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
                return format!("{}//{}", protocol, host);
            }
        }
    }

    // Default to 127.0.0.1 for development
    "http://127.0.0.1:3000".to_string()
}

pub fn current_protocol() -> String {
    window()
        .and_then(|w| w.location().protocol().ok())
        .unwrap_or_default()
}

pub fn is_file_protocol() -> bool {
    current_protocol().starts_with("file")
}

/// Pages opened from disk cannot reach the backend, so they always run offline.
pub fn choose_mode(protocol: &str, stored: Option<&str>) -> AppMode {
    if protocol.starts_with("file") {
        return AppMode::Offline;
    }
    stored.and_then(AppMode::parse).unwrap_or(AppMode::Online)
}

pub fn determine_mode() -> AppMode {
    let stored = window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(MODE_STORAGE_KEY).ok().flatten());
    let mode = choose_mode(&current_protocol(), stored.as_deref());
    log::info!("Starting in {} mode", mode.as_str());
    mode
}

/// Stores the mode and reloads so the new backend starts from a clean state.
pub fn set_mode(mode: AppMode) {
    let Some(window) = window() else {
        return;
    };
    let Some(storage) = window.local_storage().ok().flatten() else {
        log::error!("localStorage unavailable, staying in the current mode");
        return;
    };
    if let Err(e) = storage.set_item(MODE_STORAGE_KEY, mode.as_str()) {
        log::error!("Failed to store mode {}: {:?}", mode.as_str(), e);
        return;
    }
    if let Err(e) = window.location().reload() {
        log::error!("Failed to reload after switching mode: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_protocol_forces_offline() {
        assert_eq!(choose_mode("file:", Some("online")), AppMode::Offline);
    }

    #[test]
    fn test_stored_mode_wins_over_default() {
        assert_eq!(choose_mode("https:", Some("offline")), AppMode::Offline);
        assert_eq!(choose_mode("https:", Some("online")), AppMode::Online);
    }

    #[test]
    fn test_defaults_to_online() {
        assert_eq!(choose_mode("http:", None), AppMode::Online);
        assert_eq!(choose_mode("http:", Some("garbage")), AppMode::Online);
    }
}
