use disc_roulette_core::{RandomSource, Storage, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage as WebStorage;

/// `Math.random()` as a [`RandomSource`].
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// `window.localStorage` as a [`Storage`].
pub struct LocalStorage;

impl LocalStorage {
    fn backend() -> Result<WebStorage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError("no window".into()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError("localStorage is unavailable".into()))
    }
}

impl Storage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::backend()?.get_item(key).map_err(js_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::backend()?.set_item(key, value).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError(format!("{err:?}"))
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
