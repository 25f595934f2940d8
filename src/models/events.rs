use crate::models::telegram::{Message, Update};

pub type UserId = i64;
pub type ChatId = i64;

/// Handle of a bot message that can later be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef(pub i64);

#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub callback_id: String,
    /// The message carrying the pressed keyboard; missing when the platform no longer exposes it.
    pub message: Option<MessageRef>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Photo { file_id: String },
    Document { file_id: String, file_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentEvent {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub attachment: Attachment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Text(TextEvent),
    Button(ButtonEvent),
    Attachment(AttachmentEvent),
}

impl InboundEvent {
    pub fn user_id(&self) -> UserId {
        match self {
            InboundEvent::Text(e) => e.user_id,
            InboundEvent::Button(e) => e.user_id,
            InboundEvent::Attachment(e) => e.user_id,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        match self {
            InboundEvent::Text(e) => e.chat_id,
            InboundEvent::Button(e) => e.chat_id,
            InboundEvent::Attachment(e) => e.chat_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Text(_) => "text",
            InboundEvent::Button(_) => "button",
            InboundEvent::Attachment(_) => "attachment",
        }
    }

    /// Converts a raw update; updates the bot does not react to yield `None`.
    pub fn from_update(update: Update) -> Option<Self> {
        if let Some(query) = update.callback_query {
            let data = query.data?;
            let chat_id = query
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(query.from.id);
            return Some(InboundEvent::Button(ButtonEvent {
                user_id: query.from.id,
                chat_id,
                callback_id: query.id,
                message: query.message.map(|m| MessageRef(m.message_id)),
                data,
            }));
        }

        update.message.and_then(Self::from_message)
    }

    fn from_message(message: Message) -> Option<Self> {
        let chat_id = message.chat.id;
        let user_id = message.from.as_ref().map(|u| u.id).unwrap_or(chat_id);

        if let Some(sizes) = message.photo {
            // Telegram lists sizes smallest first.
            let largest = sizes.into_iter().max_by_key(|s| s.width * s.height)?;
            return Some(InboundEvent::Attachment(AttachmentEvent {
                user_id,
                chat_id,
                attachment: Attachment::Photo {
                    file_id: largest.file_id,
                },
            }));
        }

        if let Some(document) = message.document {
            return Some(InboundEvent::Attachment(AttachmentEvent {
                user_id,
                chat_id,
                attachment: Attachment::Document {
                    file_id: document.file_id,
                    file_name: document.file_name.unwrap_or_else(|| "document".to_string()),
                },
            }));
        }

        message.text.map(|text| {
            InboundEvent::Text(TextEvent {
                user_id,
                chat_id,
                text,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn callback_query_becomes_button_event_with_message_ref() {
        let event = InboundEvent::from_update(update(json!({
            "update_id": 1,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 7},
                "message": {"message_id": 55, "chat": {"id": 700}},
                "data": "import"
            }
        })))
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::Button(ButtonEvent {
                user_id: 7,
                chat_id: 700,
                callback_id: "cb-1".into(),
                message: Some(MessageRef(55)),
                data: "import".into(),
            })
        );
    }

    #[test]
    fn photo_message_picks_the_largest_size() {
        let event = InboundEvent::from_update(update(json!({
            "update_id": 2,
            "message": {
                "message_id": 3,
                "chat": {"id": 9},
                "from": {"id": 9},
                "photo": [
                    {"file_id": "small", "width": 90, "height": 60},
                    {"file_id": "large", "width": 1280, "height": 960},
                    {"file_id": "medium", "width": 320, "height": 240}
                ]
            }
        })))
        .unwrap();

        match event {
            InboundEvent::Attachment(AttachmentEvent {
                attachment: Attachment::Photo { file_id },
                ..
            }) => assert_eq!(file_id, "large"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn updates_without_payload_are_ignored() {
        assert!(InboundEvent::from_update(update(json!({"update_id": 3}))).is_none());
        assert!(InboundEvent::from_update(update(json!({
            "update_id": 4,
            "message": {"message_id": 1, "chat": {"id": 1}}
        })))
        .is_none());
    }
}
