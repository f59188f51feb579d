/// Conversions across the JS boundary
use crate::config::Settings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;

/// Serialize for chrome.runtime; `None` becomes `null`, maps become plain objects
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, String> {
    serde_wasm_bindgen::from_value(value).map_err(|e| format!("Failed to parse: {:?}", e))
}

/// Settings from a raw chrome.storage value (may be undefined)
pub fn settings_from_js(stored: JsValue) -> Settings {
    if stored.is_null() || stored.is_undefined() {
        return Settings::from_stored(None);
    }

    match from_js::<serde_json::Value>(stored) {
        Ok(value) => Settings::from_stored(Some(value)),
        Err(e) => {
            log::warn!("Ignoring unreadable settings: {}", e);
            Settings::default()
        }
    }
}

/// Run a listener-removal callback; a throw is only worth a debug line
pub fn detach(unsubscribe: &js_sys::Function) -> bool {
    match unsubscribe.call0(&JsValue::NULL) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("Failed to remove message listener: {:?}", e);
            false
        }
    }
}
