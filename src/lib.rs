/// YT Insight - Chrome Extension for video sentiment, blog posts and Q&A
/// Built with Rust + WASM + Yew

pub mod api;
pub mod config;
pub mod detector;
pub mod messages;
pub mod panel;
pub mod preview;
pub mod relay;
pub mod video_id;
mod background;
mod content;
mod interop;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Content script: watch the page for the current video
#[wasm_bindgen]
pub fn start_content_script() {
    content::start();
}

// Background service worker: hold and relay the current video id
#[wasm_bindgen]
pub fn start_background() {
    background::start();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
