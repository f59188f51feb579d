/// Content-side detection of the video shown in the current page
///
/// Three independent triggers feed one idempotent publish step:
/// script start, page mutations that changed the address (single-page
/// navigation never reloads the script), and a fixed polling timer that
/// re-sends whatever is current even when nothing changed.
use crate::messages::Message;
use crate::video_id::{VideoId, extract_video_id};

/// Where change notifications go
pub trait MessageSink {
    fn send(&self, message: Message);
}

/// What caused a detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Navigation,
    Poll,
}

pub struct Detector<S> {
    watch_host: String,
    last_url: Option<String>,
    sink: S,
}

impl<S: MessageSink> Detector<S> {
    pub fn new(watch_host: impl Into<String>, sink: S) -> Self {
        Detector {
            watch_host: watch_host.into(),
            last_url: None,
            sink,
        }
    }

    /// Pure function of the address
    pub fn extract_identity(&self, url: &str) -> Option<VideoId> {
        extract_video_id(url, &self.watch_host)
    }

    /// Send a change notification when the address carries a video id.
    /// Absence is never announced.
    pub fn publish_if_present(&self, url: &str, trigger: Trigger) -> Option<VideoId> {
        let video_id = self.extract_identity(url)?;
        log::debug!("Publishing video id {} ({:?})", video_id, trigger);
        self.sink.send(Message::VideoId {
            video_id: video_id.clone(),
        });
        Some(video_id)
    }

    /// Initial pass when the script is injected
    pub fn start(&mut self, url: &str) -> Option<VideoId> {
        self.last_url = Some(url.to_string());
        self.publish_if_present(url, Trigger::Startup)
    }

    /// Page mutated; publish only if the address moved since last seen
    pub fn on_mutation(&mut self, url: &str) -> Option<VideoId> {
        if self.last_url.as_deref() == Some(url) {
            return None;
        }

        log::debug!("URL changed from {:?} to {}", self.last_url, url);
        self.last_url = Some(url.to_string());
        self.publish_if_present(url, Trigger::Navigation)
    }

    /// Timer backstop; re-sends unchanged ids too
    pub fn on_tick(&self, url: &str) -> Option<VideoId> {
        self.publish_if_present(url, Trigger::Poll)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
