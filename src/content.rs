/// Content script: feeds the page address into the detector
use crate::config::{SETTINGS_KEY, Settings};
use crate::detector::{Detector, MessageSink};
use crate::interop::{settings_from_js, to_js};
use crate::messages::Message;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{MutationObserver, MutationObserverInit, Window};

// Import JS bridge functions
#[wasm_bindgen(module = "/js/content.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;
}

/// Delivers notifications to the background relay
struct RuntimeSink;

impl MessageSink for RuntimeSink {
    fn send(&self, message: Message) {
        let message_js = match to_js(&message) {
            Ok(js) => js,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        spawn_local(async move {
            match sendRuntimeMessage(message_js).await {
                Ok(response) => log::debug!("Background response: {:?}", response),
                Err(e) => log::warn!("Background unreachable: {:?}", e),
            }
        });
    }
}

pub fn start() {
    log::info!("Content script loaded");

    spawn_local(async move {
        let settings = load_settings().await;
        if let Err(e) = watch_page(&settings) {
            log::error!("Failed to start video detection: {:?}", e);
        }
    });
}

async fn load_settings() -> Settings {
    match getStorage(SETTINGS_KEY).await {
        Ok(stored) => settings_from_js(stored),
        Err(e) => {
            log::warn!("Failed to read settings: {:?}", e);
            Settings::default()
        }
    }
}

fn watch_page(settings: &Settings) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let detector = Rc::new(RefCell::new(Detector::new(
        settings.watch_host.clone(),
        RuntimeSink,
    )));
    detector.borrow_mut().start(&current_url(&window));

    // Single-page navigation changes the address without reloading us
    let on_mutation = {
        let detector = detector.clone();
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            detector.borrow_mut().on_mutation(&current_url(&window));
        })
    };
    let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&document, &options)?;
    on_mutation.forget();

    // Backstop for missed mutations
    let on_tick = {
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            detector.borrow().on_tick(&current_url(&window));
        })
    };
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref(),
        settings.poll_interval_millis(),
    )?;
    on_tick.forget();

    Ok(())
}

fn current_url(window: &Window) -> String {
    window.location().href().unwrap_or_default()
}
