/// Background relay holding the current video identity
use crate::messages::{Ack, Message, Reply, VideoIdReply};
use crate::video_id::VideoId;
use std::cell::RefCell;
use std::rc::Rc;

/// Best-effort delivery to whichever popups are open
pub trait Broadcast {
    fn broadcast(&self, message: Message);
}

pub struct Relay<B> {
    current: Option<VideoId>,
    broadcaster: B,
}

impl<B: Broadcast> Relay<B> {
    pub fn new(broadcaster: B) -> Self {
        Relay {
            current: None,
            broadcaster,
        }
    }

    /// Last write wins; re-sends of the same id are plain overwrites
    pub fn on_change_notification(&mut self, video_id: VideoId) -> Ack {
        log::info!("Updated current video ID: {}", video_id);
        self.current = Some(video_id.clone());
        self.broadcaster.broadcast(Message::VideoIdUpdated { video_id });
        Ack { success: true }
    }

    pub fn on_query(&self) -> VideoIdReply {
        VideoIdReply {
            video_id: self.current.clone(),
        }
    }

    /// Extension installed or updated
    pub fn reset(&mut self) {
        log::info!("Extension installed/updated, clearing video ID");
        self.current = None;
    }

    /// Dispatch one incoming message; `None` means no reply is owed
    pub fn handle(&mut self, message: Message) -> Option<Reply> {
        match message {
            Message::VideoId { video_id } => Some(Reply::Ack(self.on_change_notification(video_id))),
            Message::GetVideoId => Some(Reply::VideoId(self.on_query())),
            Message::VideoIdUpdated { .. } => None,
        }
    }

    pub fn current(&self) -> Option<&VideoId> {
        self.current.as_ref()
    }
}

/// Shared handle to the one relay created at background start.
/// Handlers run one at a time on the extension's event loop.
pub struct RelayHandle<B> {
    inner: Rc<RefCell<Relay<B>>>,
}

impl<B: Broadcast> RelayHandle<B> {
    pub fn new(broadcaster: B) -> Self {
        RelayHandle {
            inner: Rc::new(RefCell::new(Relay::new(broadcaster))),
        }
    }

    pub fn handle(&self, message: Message) -> Option<Reply> {
        self.inner.borrow_mut().handle(message)
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    pub fn current(&self) -> Option<VideoId> {
        self.inner.borrow().current().cloned()
    }
}

impl<B> Clone for RelayHandle<B> {
    fn clone(&self) -> Self {
        RelayHandle {
            inner: Rc::clone(&self.inner),
        }
    }
}
