/// Popup UI: status, action controls and results

use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlSelectElement, HtmlTextAreaElement};
use patternfly_yew::prelude::{Button, ButtonVariant};
use crate::api::{AnalysisClient, BlogLength, HttpTransport, Tone};
use crate::config::{SETTINGS_KEY, Settings};
use crate::interop::{detach, from_js, settings_from_js, to_js};
use crate::messages::{Message, VideoIdReply};
use crate::panel::{
    Action, PanelEvent, PanelState, ResultArea, resolve_identity, validate_question,
};
use crate::preview::PreviewedText;
use crate::ui::components::{CopyButton, ResultBox, StatusIndicator};
use crate::video_id::VideoId;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabUrl() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(handler: &js_sys::Function) -> js_sys::Function;
}

type Client = AnalysisClient<HttpTransport>;

#[function_component(App)]
pub fn app() -> Html {
    let settings = use_state(Settings::default);
    let panel = use_reducer(PanelState::default);
    let tone = use_state(|| Tone::Informative);
    let length = use_state(|| BlogLength::Medium);
    let question = use_state(String::new);

    let client: Rc<Client> = use_memo(settings.api_base_url.clone(), |base_url| {
        AnalysisClient::new(base_url.clone(), HttpTransport::new())
    });

    // Ask the relay on open, fall back to the active tab's address
    {
        let settings = settings.clone();
        let dispatcher = panel.dispatcher();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let loaded = load_settings().await;

                let from_relay = query_relay().await.unwrap_or_else(|e| {
                    log::warn!("{}", e);
                    None
                });
                let tab_url = if from_relay.is_none() {
                    active_tab_url().await.unwrap_or_else(|e| {
                        log::warn!("{}", e);
                        None
                    })
                } else {
                    None
                };

                let (identity, status) = resolve_identity(from_relay, tab_url.as_deref(), &loaded.watch_host);
                log::info!("Popup video ID: {:?} ({:?})", identity, status);

                settings.set(loaded);
                dispatcher.dispatch(PanelEvent::IdentityResolved { identity, status });
            });
            || ()
        });
    }

    // Follow relay broadcasts while open
    {
        let dispatcher = panel.dispatcher();

        use_effect_with((), move |_| {
            let listener = Closure::<dyn FnMut(JsValue)>::new(move |raw: JsValue| {
                if let Ok(Message::VideoIdUpdated { video_id }) = from_js::<Message>(raw) {
                    dispatcher.dispatch(PanelEvent::IdentityBroadcast(video_id));
                }
            });
            let unsubscribe = onRuntimeMessage(listener.as_ref().unchecked_ref());

            move || {
                detach(&unsubscribe);
                drop(listener);
            }
        });
    }

    // Sentiment + word cloud handler
    let on_sentiment = {
        let panel = panel.clone();
        let client = client.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(video_id) = ready_identity(&panel, Action::Sentiment) else {
                return;
            };
            let client = client.clone();

            run_action(&panel, Action::Sentiment, async move {
                let result = client.sentiment_with_word_cloud(&video_id).await;
                ResultArea::settle(Action::Sentiment, result, ResultArea::Report)
            });
        })
    };

    // Word cloud handler
    let on_word_cloud = {
        let panel = panel.clone();
        let client = client.clone();

        Callback::from(move |_: MouseEvent| {
            let Some(video_id) = ready_identity(&panel, Action::WordCloud) else {
                return;
            };
            let client = client.clone();

            run_action(&panel, Action::WordCloud, async move {
                let result = client.word_cloud(&video_id).await;
                ResultArea::settle(Action::WordCloud, result, ResultArea::Image)
            });
        })
    };

    // Blog post handler
    let on_blog = {
        let panel = panel.clone();
        let client = client.clone();
        let tone = tone.clone();
        let length = length.clone();
        let preview_lines = settings.preview_lines;

        Callback::from(move |_: MouseEvent| {
            let Some(video_id) = ready_identity(&panel, Action::Blog) else {
                return;
            };
            let client = client.clone();
            let (tone, length) = (*tone, *length);

            run_action(&panel, Action::Blog, async move {
                let result = client.blog_post(&video_id, tone, length).await;
                ResultArea::settle(Action::Blog, result, |post| {
                    ResultArea::Preview(PreviewedText::new(post, preview_lines))
                })
            });
        })
    };

    // Question handler
    let on_question = {
        let panel = panel.clone();
        let client = client.clone();
        let question = question.clone();
        let preview_lines = settings.preview_lines;

        Callback::from(move |_: MouseEvent| {
            let Some(video_id) = ready_identity(&panel, Action::Question) else {
                return;
            };
            let text = match validate_question(&question) {
                Ok(text) => text.to_string(),
                Err(msg) => {
                    panel.dispatch(PanelEvent::Rejected(Action::Question, msg));
                    return;
                }
            };
            let client = client.clone();

            run_action(&panel, Action::Question, async move {
                let result = client.answer(&video_id, &text).await;
                ResultArea::settle(Action::Question, result, |answer| {
                    ResultArea::Preview(PreviewedText::new(answer, preview_lines))
                })
            });
        })
    };

    let on_tone_change = {
        let tone = tone.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                match select.value().parse::<Tone>() {
                    Ok(value) => tone.set(value),
                    Err(e) => log::warn!("{}", e),
                }
            }
        })
    };

    let on_length_change = {
        let length = length.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                match select.value().parse::<BlogLength>() {
                    Ok(value) => length.set(value),
                    Err(e) => log::warn!("{}", e),
                }
            }
        })
    };

    let on_question_input = {
        let question = question.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                question.set(input.value());
            }
        })
    };

    let action_button = |action: Action, onclick: Callback<MouseEvent>| {
        html! {
            <Button
                {onclick}
                disabled={!panel.state_of(action).is_clickable()}
                variant={ButtonVariant::Primary}
                block={true}
            >
                {action.label()}
            </Button>
        }
    };

    let copy_button = |action: Action| match panel.result(action).full_text() {
        Some(text) => html! {
            <CopyButton text={text.to_string()} feedback_ms={settings.copy_feedback_ms} />
        },
        None => html! {},
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"YT Insight"}</h1>

            <StatusIndicator status={panel.status.clone()} />

            <div class="section">
                {action_button(Action::Sentiment, on_sentiment)}
                <ResultBox result={panel.result(Action::Sentiment).clone()} />
            </div>

            <div class="section">
                {action_button(Action::WordCloud, on_word_cloud)}
                <ResultBox result={panel.result(Action::WordCloud).clone()} />
            </div>

            <div class="section">
                <div class="blog-options">
                    <select onchange={on_tone_change}>
                        {for Tone::ALL.iter().map(|option| html! {
                            <option value={option.as_str()} selected={*option == *tone}>{option.as_str()}</option>
                        })}
                    </select>
                    <select onchange={on_length_change}>
                        {for BlogLength::ALL.iter().map(|option| html! {
                            <option value={option.as_str()} selected={*option == *length}>{option.as_str()}</option>
                        })}
                    </select>
                </div>
                {action_button(Action::Blog, on_blog)}
                <ResultBox result={panel.result(Action::Blog).clone()} />
                {copy_button(Action::Blog)}
            </div>

            <div class="section">
                <textarea
                    placeholder="Ask a question about the video"
                    value={(*question).clone()}
                    oninput={on_question_input}
                />
                {action_button(Action::Question, on_question)}
                <ResultBox result={panel.result(Action::Question).clone()} />
                {copy_button(Action::Question)}
            </div>

            <p class="footer-popup">
                {"YT Insight v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn ready_identity(panel: &UseReducerHandle<PanelState>, action: Action) -> Option<VideoId> {
    if !panel.state_of(action).is_clickable() {
        return None;
    }
    panel.identity.clone()
}

/// Mark the action pending, then settle it with whatever `work` produces
fn run_action<F>(panel: &UseReducerHandle<PanelState>, action: Action, work: F)
where
    F: Future<Output = ResultArea> + 'static,
{
    let dispatcher = panel.dispatcher();
    dispatcher.dispatch(PanelEvent::Started(action));

    spawn_local(async move {
        let result = work.await;
        dispatcher.dispatch(PanelEvent::Finished(action, result));
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

async fn query_relay() -> Result<Option<VideoId>, String> {
    let request = to_js(&Message::GetVideoId)?;
    let reply_js = sendRuntimeMessage(request)
        .await
        .map_err(|e| format!("Failed to query background: {:?}", e))?;

    if reply_js.is_null() || reply_js.is_undefined() {
        return Ok(None);
    }

    let reply: VideoIdReply = from_js(reply_js)?;
    Ok(reply.video_id)
}

async fn active_tab_url() -> Result<Option<String>, String> {
    let url_js = getActiveTabUrl()
        .await
        .map_err(|e| format!("Failed to get active tab: {:?}", e))?;

    Ok(url_js.as_string())
}
