/// Popup panel state: connection status, per-action controls and results
use crate::api::{ApiError, SentimentReport, WordCloud};
use crate::preview::PreviewedText;
use crate::video_id::{PageKind, VideoId, classify_page};
use std::rc::Rc;
use yew::Reducible;

pub const NO_VIDEO_HINT: &str = "Please navigate to a YouTube video";
pub const EMPTY_QUESTION: &str = "Please enter a question";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Sentiment,
    WordCloud,
    Blog,
    Question,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Sentiment, Action::WordCloud, Action::Blog, Action::Question];

    fn index(&self) -> usize {
        match self {
            Action::Sentiment => 0,
            Action::WordCloud => 1,
            Action::Blog => 2,
            Action::Question => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Sentiment => "Analyze Sentiment",
            Action::WordCloud => "Generate Word Cloud",
            Action::Blog => "Generate Blog Post",
            Action::Question => "Get Answer",
        }
    }

    pub fn pending_message(&self) -> &'static str {
        match self {
            Action::Sentiment => "Analyzing sentiment...",
            Action::WordCloud => "Generating word cloud...",
            Action::Blog => "Generating blog post...",
            Action::Question => "Getting answer...",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Sentiment => "Error analyzing sentiment and generating word cloud",
            Action::WordCloud => "Error generating word cloud",
            Action::Blog => "Error generating blog post",
            Action::Question => "Error getting answer",
        }
    }
}

/// Lifecycle of one action control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    /// No video known
    Disabled,
    Ready,
    /// Request in flight
    Pending,
}

impl ActionState {
    pub fn resolve(has_identity: bool, in_flight: bool) -> ActionState {
        match (has_identity, in_flight) {
            (_, true) => ActionState::Pending,
            (true, false) => ActionState::Ready,
            (false, false) => ActionState::Disabled,
        }
    }

    pub fn is_clickable(&self) -> bool {
        *self == ActionState::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    NoVideoId,
    NotOnSite,
}

impl ConnectionStatus {
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Checking for video...",
            ConnectionStatus::Connected => "Connected to video",
            ConnectionStatus::NoVideoId => "No video ID found",
            ConnectionStatus::NotOnSite => "Not on YouTube",
        }
    }

    pub fn is_connected(&self) -> bool {
        *self == ConnectionStatus::Connected
    }
}

/// Pick the panel's identity: the relay first, then the active tab's address
pub fn resolve_identity(
    from_relay: Option<VideoId>,
    tab_url: Option<&str>,
    watch_host: &str,
) -> (Option<VideoId>, ConnectionStatus) {
    if let Some(video_id) = from_relay {
        return (Some(video_id), ConnectionStatus::Connected);
    }

    match tab_url.map(|url| classify_page(url, watch_host)) {
        Some(PageKind::Watch(video_id)) => (Some(video_id), ConnectionStatus::Connected),
        Some(PageKind::OnSite) => (None, ConnectionStatus::NoVideoId),
        Some(PageKind::OffSite) | None => (None, ConnectionStatus::NotOnSite),
    }
}

pub fn validate_question(input: &str) -> Result<&str, &'static str> {
    if input.trim().is_empty() {
        Err(EMPTY_QUESTION)
    } else {
        Ok(input)
    }
}

/// What a result box currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultArea {
    Empty,
    Hint(&'static str),
    Pending(&'static str),
    Image(WordCloud),
    Report(SentimentReport),
    Preview(PreviewedText),
    Failed(&'static str),
}

impl ResultArea {
    /// Turn a finished request into what the box shows; failures collapse
    /// into the action's fixed placeholder
    pub fn settle<T>(action: Action, result: Result<T, ApiError>, render: impl FnOnce(T) -> ResultArea) -> ResultArea {
        match result {
            Ok(value) => render(value),
            Err(e) => {
                log::error!("{:?} failed: {}", action, e);
                ResultArea::Failed(action.failure_message())
            }
        }
    }

    /// Full text available for copying
    pub fn full_text(&self) -> Option<&str> {
        match self {
            ResultArea::Preview(previewed) => Some(&previewed.full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionSlot {
    pub in_flight: bool,
    pub result: ResultArea,
}

impl Default for ActionSlot {
    fn default() -> Self {
        ActionSlot {
            in_flight: false,
            result: ResultArea::Empty,
        }
    }
}

pub enum PanelEvent {
    IdentityResolved {
        identity: Option<VideoId>,
        status: ConnectionStatus,
    },
    IdentityBroadcast(VideoId),
    Started(Action),
    Finished(Action, ResultArea),
    Rejected(Action, &'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub identity: Option<VideoId>,
    pub status: ConnectionStatus,
    slots: [ActionSlot; 4],
}

impl Default for PanelState {
    fn default() -> Self {
        PanelState {
            identity: None,
            status: ConnectionStatus::Checking,
            slots: Default::default(),
        }
    }
}

impl PanelState {
    pub fn state_of(&self, action: Action) -> ActionState {
        ActionState::resolve(self.identity.is_some(), self.slots[action.index()].in_flight)
    }

    pub fn result(&self, action: Action) -> &ResultArea {
        &self.slots[action.index()].result
    }

    /// Results of settled actions belong to the previous video and are
    /// dropped when the video changes; in-flight actions are left alone
    fn set_identity(&mut self, identity: Option<VideoId>, status: ConnectionStatus) {
        let changed = self.identity != identity;
        let has_identity = identity.is_some();
        self.identity = identity;
        self.status = status;

        for slot in self.slots.iter_mut().filter(|slot| !slot.in_flight) {
            if !has_identity {
                slot.result = ResultArea::Hint(NO_VIDEO_HINT);
            } else if changed || slot.result == ResultArea::Hint(NO_VIDEO_HINT) {
                slot.result = ResultArea::Empty;
            }
        }
    }
}

impl Reducible for PanelState {
    type Action = PanelEvent;

    fn reduce(self: Rc<Self>, event: PanelEvent) -> Rc<Self> {
        let mut next = (*self).clone();

        match event {
            PanelEvent::IdentityResolved { identity, status } => {
                // A broadcast may have connected the panel while the lookup ran
                if identity.is_none() && self.identity.is_some() {
                    return self;
                }
                next.set_identity(identity, status);
            }
            PanelEvent::IdentityBroadcast(video_id) => {
                if self.identity.as_ref() == Some(&video_id) && self.status.is_connected() {
                    return self;
                }
                next.set_identity(Some(video_id), ConnectionStatus::Connected);
            }
            PanelEvent::Started(action) => {
                if !self.state_of(action).is_clickable() {
                    return self;
                }
                let slot = &mut next.slots[action.index()];
                slot.in_flight = true;
                slot.result = ResultArea::Pending(action.pending_message());
            }
            PanelEvent::Finished(action, result) => {
                let slot = &mut next.slots[action.index()];
                slot.in_flight = false;
                slot.result = result;
            }
            PanelEvent::Rejected(action, message) => {
                next.slots[action.index()].result = ResultArea::Hint(message);
            }
        }

        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "youtube.com";

    fn reduce(state: PanelState, events: Vec<PanelEvent>) -> PanelState {
        let mut state = Rc::new(state);
        for event in events {
            state = state.reduce(event);
        }
        (*state).clone()
    }

    fn connected(id: &str) -> PanelEvent {
        PanelEvent::IdentityResolved {
            identity: Some(VideoId::new(id)),
            status: ConnectionStatus::Connected,
        }
    }

    #[test]
    fn test_relay_identity_wins() {
        let (identity, status) = resolve_identity(
            Some(VideoId::new("fromRelay")),
            Some("https://www.youtube.com/watch?v=fromTab"),
            HOST,
        );

        assert_eq!(identity, Some(VideoId::new("fromRelay")));
        assert_eq!(status, ConnectionStatus::Connected);
    }

    #[test]
    fn test_falls_back_to_tab_address() {
        let (identity, status) = resolve_identity(None, Some("https://www.youtube.com/watch?v=XYZ"), HOST);

        assert_eq!(identity, Some(VideoId::new("XYZ")));
        assert!(status.is_connected());
    }

    #[test]
    fn test_no_source_yields_disconnected() {
        assert_eq!(
            resolve_identity(None, Some("https://www.youtube.com/feed"), HOST),
            (None, ConnectionStatus::NoVideoId)
        );
        assert_eq!(
            resolve_identity(None, Some("https://github.com"), HOST),
            (None, ConnectionStatus::NotOnSite)
        );
        assert_eq!(resolve_identity(None, None, HOST), (None, ConnectionStatus::NotOnSite));
    }

    #[test]
    fn test_action_state_transitions() {
        assert_eq!(ActionState::resolve(false, false), ActionState::Disabled);
        assert_eq!(ActionState::resolve(true, false), ActionState::Ready);
        assert_eq!(ActionState::resolve(true, true), ActionState::Pending);
        assert!(!ActionState::Pending.is_clickable());
    }

    #[test]
    fn test_controls_disabled_until_identity_known() {
        let state = PanelState::default();

        for action in Action::ALL {
            assert_eq!(state.state_of(action), ActionState::Disabled);
        }
        assert_eq!(state.status, ConnectionStatus::Checking);
    }

    #[test]
    fn test_missing_identity_shows_hint_everywhere() {
        let state = reduce(
            PanelState::default(),
            vec![PanelEvent::IdentityResolved {
                identity: None,
                status: ConnectionStatus::NotOnSite,
            }],
        );

        for action in Action::ALL {
            assert_eq!(state.state_of(action), ActionState::Disabled);
            assert_eq!(*state.result(action), ResultArea::Hint(NO_VIDEO_HINT));
        }
    }

    #[test]
    fn test_action_lifecycle() {
        let state = reduce(PanelState::default(), vec![connected("XYZ"), PanelEvent::Started(Action::Blog)]);

        assert_eq!(state.state_of(Action::Blog), ActionState::Pending);
        assert_eq!(*state.result(Action::Blog), ResultArea::Pending("Generating blog post..."));
        assert_eq!(state.state_of(Action::Question), ActionState::Ready);

        let previewed = PreviewedText::new("a\nb\nc\nd".to_string(), 3);
        let state = reduce(
            state,
            vec![PanelEvent::Finished(Action::Blog, ResultArea::Preview(previewed.clone()))],
        );

        assert_eq!(state.state_of(Action::Blog), ActionState::Ready);
        assert_eq!(state.result(Action::Blog).full_text(), Some("a\nb\nc\nd"));
    }

    #[test]
    fn test_start_ignored_while_pending_or_disabled() {
        let disabled = reduce(PanelState::default(), vec![PanelEvent::Started(Action::Sentiment)]);
        assert_eq!(disabled.state_of(Action::Sentiment), ActionState::Disabled);
        assert_eq!(*disabled.result(Action::Sentiment), ResultArea::Empty);

        let pending = reduce(
            PanelState::default(),
            vec![
                connected("XYZ"),
                PanelEvent::Started(Action::Sentiment),
                PanelEvent::Started(Action::Sentiment),
            ],
        );
        assert_eq!(pending.state_of(Action::Sentiment), ActionState::Pending);
    }

    #[test]
    fn test_failure_leaves_control_usable() {
        let result = ResultArea::settle(Action::WordCloud, Err(ApiError::Status(500)), ResultArea::Image);
        assert_eq!(result, ResultArea::Failed("Error generating word cloud"));

        let result = ResultArea::settle(Action::Question, Err(ApiError::Status(500)), |answer: String| {
            ResultArea::Preview(PreviewedText::new(answer, 3))
        });
        assert_eq!(result, ResultArea::Failed("Error getting answer"));

        let state = reduce(
            PanelState::default(),
            vec![
                connected("XYZ"),
                PanelEvent::Started(Action::Question),
                PanelEvent::Finished(Action::Question, result),
            ],
        );

        assert_eq!(state.state_of(Action::Question), ActionState::Ready);
        assert_eq!(state.result(Action::Question).full_text(), None);
    }

    #[test]
    fn test_broadcast_connects_panel() {
        let state = reduce(
            PanelState::default(),
            vec![
                PanelEvent::IdentityResolved {
                    identity: None,
                    status: ConnectionStatus::NotOnSite,
                },
                PanelEvent::IdentityBroadcast(VideoId::new("XYZ")),
            ],
        );

        assert_eq!(state.identity, Some(VideoId::new("XYZ")));
        assert!(state.status.is_connected());
        assert_eq!(*state.result(Action::WordCloud), ResultArea::Empty);
    }

    #[test]
    fn test_question_validation() {
        assert_eq!(validate_question("   \n"), Err(EMPTY_QUESTION));
        assert_eq!(validate_question("What is this about?"), Ok("What is this about?"));

        let state = reduce(
            PanelState::default(),
            vec![connected("XYZ"), PanelEvent::Rejected(Action::Question, EMPTY_QUESTION)],
        );
        assert_eq!(*state.result(Action::Question), ResultArea::Hint(EMPTY_QUESTION));
        assert_eq!(state.state_of(Action::Question), ActionState::Ready);
    }

    fn finished_blog(text: &str) -> PanelEvent {
        PanelEvent::Finished(
            Action::Blog,
            ResultArea::Preview(PreviewedText::new(text.to_string(), 3)),
        )
    }

    #[test]
    fn test_repeated_broadcast_keeps_results() {
        let state = reduce(
            PanelState::default(),
            vec![
                connected("XYZ"),
                PanelEvent::Started(Action::Blog),
                finished_blog("post about XYZ"),
                PanelEvent::IdentityBroadcast(VideoId::new("XYZ")),
            ],
        );

        assert_eq!(state.result(Action::Blog).full_text(), Some("post about XYZ"));
    }

    #[test]
    fn test_new_video_clears_settled_results() {
        let state = reduce(
            PanelState::default(),
            vec![
                connected("first"),
                PanelEvent::Started(Action::Blog),
                finished_blog("post about first"),
                PanelEvent::Started(Action::Question),
                PanelEvent::IdentityBroadcast(VideoId::new("second")),
            ],
        );

        assert_eq!(state.identity, Some(VideoId::new("second")));
        assert_eq!(*state.result(Action::Blog), ResultArea::Empty);
        assert_eq!(state.state_of(Action::Question), ActionState::Pending);
        assert_eq!(*state.result(Action::Question), ResultArea::Pending("Getting answer..."));
    }

    #[test]
    fn test_late_empty_lookup_keeps_broadcast_identity() {
        let state = reduce(
            PanelState::default(),
            vec![
                PanelEvent::IdentityBroadcast(VideoId::new("XYZ")),
                PanelEvent::IdentityResolved {
                    identity: None,
                    status: ConnectionStatus::NotOnSite,
                },
            ],
        );

        assert_eq!(state.identity, Some(VideoId::new("XYZ")));
        assert!(state.status.is_connected());
        assert_eq!(state.state_of(Action::Sentiment), ActionState::Ready);
    }
}
