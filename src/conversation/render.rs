use crate::clients::telegram::ChatTransport;
use crate::conversation::keyboards::{InlineKeyboard, ReplyMarkup};
use crate::conversation::state::ConversationState;
use crate::models::events::{ChatId, InboundEvent, MessageRef};

/// One rendered wizard screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

/// Whether the next screen is a fresh message or replaces the one whose button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    New,
    Edit(MessageRef),
}

impl ReplyMode {
    pub fn for_event(event: &InboundEvent) -> Self {
        match event {
            InboundEvent::Button(button) => button
                .message
                .map(ReplyMode::Edit)
                .unwrap_or(ReplyMode::New),
            InboundEvent::Text(_) | InboundEvent::Attachment(_) => ReplyMode::New,
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One `Label: <b>value</b>` line per collected field, in the order the fields were first filled.
pub fn summary(state: &ConversationState) -> String {
    state
        .fields()
        .map(|(key, value)| {
            format!(
                "{}: <b>{}</b>",
                capitalize(key.label()),
                escape_html(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn screen(state: &ConversationState, prompt: &str, keyboard: Option<InlineKeyboard>) -> Screen {
    let text = format!("{}\n\n<b>{}</b>", summary(state), prompt)
        .trim()
        .to_string();
    Screen { text, keyboard }
}

/// Talks back to the user who triggered the current event.
pub struct Responder<'a> {
    transport: &'a dyn ChatTransport,
    chat_id: ChatId,
    mode: ReplyMode,
    callback_id: Option<String>,
    answered: bool,
}

impl<'a> Responder<'a> {
    pub fn for_event(transport: &'a dyn ChatTransport, event: &InboundEvent) -> Self {
        let callback_id = match event {
            InboundEvent::Button(button) => Some(button.callback_id.clone()),
            _ => None,
        };

        Self {
            transport,
            chat_id: event.chat_id(),
            mode: ReplyMode::for_event(event),
            callback_id,
            answered: false,
        }
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn transport(&self) -> &'a dyn ChatTransport {
        self.transport
    }

    /// Sends the screen as a new message or edits the pressed one, depending on the event.
    pub async fn show(&mut self, screen: Screen) -> anyhow::Result<()> {
        match self.mode {
            ReplyMode::New => {
                self.transport
                    .send_message(
                        self.chat_id,
                        &screen.text,
                        screen.keyboard.map(ReplyMarkup::Inline),
                    )
                    .await?;
            }
            ReplyMode::Edit(message) => {
                self.transport
                    .edit_message(self.chat_id, message, &screen.text, screen.keyboard)
                    .await?;
            }
        }
        Ok(())
    }

    /// Always a new message, whatever triggered the event.
    pub async fn say(&mut self, text: &str, markup: Option<ReplyMarkup>) -> anyhow::Result<()> {
        self.transport
            .send_message(self.chat_id, text, markup)
            .await?;
        Ok(())
    }

    /// Transient feedback: a toast for button presses, a plain message otherwise.
    pub async fn notice(&mut self, text: &str) -> anyhow::Result<()> {
        if !self.answered {
            if let Some(callback_id) = self.callback_id.clone() {
                self.answered = true;
                return self.transport.answer_callback(&callback_id, Some(text)).await;
            }
        }
        self.say(text, None).await
    }

    /// Acknowledges a pressed button that got no toast.
    pub async fn finish(&mut self) -> anyhow::Result<()> {
        if self.answered {
            return Ok(());
        }
        if let Some(callback_id) = self.callback_id.clone() {
            self.answered = true;
            self.transport.answer_callback(&callback_id, None).await?;
        }
        Ok(())
    }
}
