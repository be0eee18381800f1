use serde::{Deserialize, Serialize};

/// The one piece of state that survives a page reload: whether the collider
/// overlay is shown. Stored as a bare JSON boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugSettings {
    pub debug_mode: bool,
}

impl DebugSettings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "goalbox_debug_mode";

    pub fn new(debug_mode: bool) -> Self {
        Self { debug_mode }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load from LocalStorage (WASM only). Missing or unreadable values fall
    /// back to the default.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded debug mode: {}", settings.debug_mode);
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored debug mode {:?}: {}", json, e),
                }
            }
        }
        Self::default()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Could not persist debug mode");
                    }
                }
                Err(e) => log::warn!("Could not encode debug mode: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_as_bare_bool() {
        assert_eq!(DebugSettings::new(true).to_json().unwrap(), "true");
        assert_eq!(DebugSettings::from_json("false").unwrap(), DebugSettings::new(false));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(DebugSettings::from_json("{\"on\": 1}").is_err());
        assert!(DebugSettings::from_json("").is_err());
    }

    #[test]
    fn native_load_is_default() {
        assert!(!DebugSettings::load().debug_mode);
    }
}
