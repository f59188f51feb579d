/// Messages exchanged between the content script, background and popup
use crate::video_id::VideoId;
use serde::{Deserialize, Serialize};

/// A runtime message, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Detector → Relay: the page now shows this video
    #[serde(rename = "VIDEO_ID")]
    VideoId {
        #[serde(rename = "videoId")]
        video_id: VideoId,
    },

    /// Popup → Relay: which video is current?
    #[serde(rename = "GET_VIDEO_ID")]
    GetVideoId,

    /// Relay → open popups: the current video changed
    #[serde(rename = "VIDEO_ID_UPDATED")]
    VideoIdUpdated {
        #[serde(rename = "videoId")]
        video_id: VideoId,
    },
}

/// Acknowledgement of a change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

/// Answer to `GET_VIDEO_ID`; `videoId` is `null` when nothing is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoIdReply {
    #[serde(default)]
    pub video_id: Option<VideoId>,
}

/// Any reply the relay sends back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Ack(Ack),
    VideoId(VideoIdReply),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_notification_wire_format() {
        let message = Message::VideoId {
            video_id: VideoId::new("XYZ"),
        };

        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value, json!({"type": "VIDEO_ID", "videoId": "XYZ"}));
    }

    #[test]
    fn test_parse_messages_from_js() {
        let query: Message = serde_json::from_value(json!({"type": "GET_VIDEO_ID"})).unwrap();
        assert_eq!(query, Message::GetVideoId);

        let update: Message =
            serde_json::from_value(json!({"type": "VIDEO_ID_UPDATED", "videoId": "abc"})).unwrap();
        assert_eq!(
            update,
            Message::VideoIdUpdated {
                video_id: VideoId::new("abc")
            }
        );
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        let parsed = serde_json::from_value::<Message>(json!({"type": "SOMETHING_ELSE"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_absent_video_id_reply_is_null() {
        let reply = Reply::VideoId(VideoIdReply { video_id: None });

        assert_eq!(serde_json::to_value(&reply).unwrap(), json!({"videoId": null}));
    }

    #[test]
    fn test_parse_video_id_reply() {
        let reply: VideoIdReply = serde_json::from_value(json!({"videoId": "XYZ"})).unwrap();
        assert_eq!(reply.video_id, Some(VideoId::new("XYZ")));

        let empty: VideoIdReply = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.video_id, None);
    }
}
