/// Reusable UI components

use crate::panel::{ConnectionStatus, ResultArea};
use patternfly_yew::prelude::{Alert, AlertType, Spinner};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[wasm_bindgen(module = "/js/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn writeClipboard(text: &str) -> Result<(), JsValue>;
}

#[derive(Properties, PartialEq)]
pub struct StatusIndicatorProps {
    pub status: ConnectionStatus,
}

#[function_component(StatusIndicator)]
pub fn status_indicator(props: &StatusIndicatorProps) -> Html {
    let dot_class = if props.status.is_connected() { "dot connected" } else { "dot" };

    html! {
        <div class="status">
            <span class={dot_class}></span>
            <span class="status-text">{props.status.message()}</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultBoxProps {
    pub result: ResultArea,
}

#[function_component(ResultBox)]
pub fn result_box(props: &ResultBoxProps) -> Html {
    match &props.result {
        ResultArea::Empty => html! {},
        ResultArea::Hint(msg) => html! {
            <div class="result-box">{*msg}</div>
        },
        ResultArea::Pending(msg) => html! {
            <div class="result-box">
                <Spinner />
                <span class="loading-text">{*msg}</span>
            </div>
        },
        ResultArea::Image(word_cloud) => html! {
            <img class="word-cloud" src={word_cloud.data_url()} alt="Word cloud" />
        },
        ResultArea::Report(report) => html! {
            <>
                <div class="result-box">{report.sentiment.clone()}</div>
                <img class="word-cloud" src={report.word_cloud.data_url()} alt="Word cloud" />
            </>
        },
        ResultArea::Preview(previewed) => html! {
            <div class="result-box">{previewed.preview.clone()}</div>
        },
        ResultArea::Failed(msg) => html! {
            <Alert r#type={AlertType::Danger} title={msg.to_string()} inline={true}>
            </Alert>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct CopyButtonProps {
    pub text: String,
    pub feedback_ms: u32,
}

/// Copies the full text and briefly shows "Copied!"
#[function_component(CopyButton)]
pub fn copy_button(props: &CopyButtonProps) -> Html {
    let copied = use_state(|| false);

    let onclick = {
        let copied = copied.clone();
        let text = props.text.clone();
        let feedback = Duration::from_millis(props.feedback_ms as u64);

        Callback::from(move |_: MouseEvent| {
            let copied = copied.clone();
            let text = text.clone();

            spawn_local(async move {
                match writeClipboard(&text).await {
                    Ok(_) => {
                        copied.set(true);
                        yew::platform::time::sleep(feedback).await;
                        copied.set(false);
                    }
                    Err(e) => log::error!("Failed to copy text: {:?}", e),
                }
            });
        })
    };

    let class = if *copied { "copy-button copy-success" } else { "copy-button" };

    html! {
        <button {class} {onclick}>
            <span class="button-text">{if *copied { "Copied!" } else { "Copy" }}</span>
        </button>
    }
}
