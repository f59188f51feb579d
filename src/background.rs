/// Background service worker: hosts the relay
use crate::interop::{from_js, to_js};
use crate::messages::Message;
use crate::relay::{Broadcast, RelayHandle};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/background.js")]
extern "C" {
    fn onRuntimeMessage(handler: &js_sys::Function);

    fn onInstalled(handler: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn broadcastMessage(message: JsValue) -> Result<JsValue, JsValue>;
}

struct RuntimeBroadcast;

impl Broadcast for RuntimeBroadcast {
    fn broadcast(&self, message: Message) {
        let message_js = match to_js(&message) {
            Ok(js) => js,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        spawn_local(async move {
            if let Err(e) = broadcastMessage(message_js).await {
                log::debug!("No popup received the update: {:?}", e);
            }
        });
    }
}

pub fn start() {
    log::info!("Background script loaded");

    let relay = RelayHandle::new(RuntimeBroadcast);

    // Install reset first so it cannot clear ids replayed from the backlog
    let on_installed = {
        let relay = relay.clone();
        Closure::<dyn FnMut()>::new(move || relay.reset())
    };
    onInstalled(on_installed.as_ref().unchecked_ref());
    on_installed.forget();

    // Replays messages that woke the worker before the wasm was ready
    let on_message =
        Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |raw: JsValue| handle_raw(&relay, raw));
    onRuntimeMessage(on_message.as_ref().unchecked_ref());
    on_message.forget();
}

/// Returns `undefined` when no reply is owed
fn handle_raw(relay: &RelayHandle<RuntimeBroadcast>, raw: JsValue) -> JsValue {
    let message: Message = match from_js(raw) {
        Ok(message) => message,
        Err(e) => {
            log::debug!("Ignoring message: {}", e);
            return JsValue::UNDEFINED;
        }
    };
    log::debug!("Received message: {:?}", message);

    match relay.handle(message) {
        Some(reply) => to_js(&reply).unwrap_or_else(|e| {
            log::error!("{}", e);
            JsValue::UNDEFINED
        }),
        None => JsValue::UNDEFINED,
    }
}
