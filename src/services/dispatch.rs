use crate::conversation::callback::Callback;
use crate::conversation::keyboards::{MENU_CREATE_ORDER, MENU_SEARCH};
use crate::conversation::render::Responder;
use crate::conversation::texts;
use crate::models::events::InboundEvent;
use crate::services::{menu, order, search, statistics};
use crate::state::AppState;
use crate::store::sessions::{Flow, Session};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    CreateOrder,
    Search,
    Statistics,
}

impl Command {
    /// Slash commands (optionally addressed as `/cmd@bot`) and the main menu buttons.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == MENU_CREATE_ORDER {
            return Some(Command::CreateOrder);
        }
        if text == MENU_SEARCH {
            return Some(Command::Search);
        }

        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?.split('@').next()?;
        match name {
            "start" => Some(Command::Start),
            "create_order" => Some(Command::CreateOrder),
            "search" => Some(Command::Search),
            "statistics" => Some(Command::Statistics),
            _ => None,
        }
    }
}

/// Runs one inbound event to completion while holding the user's session.
pub async fn handle_event(app: &AppState, event: InboundEvent) -> anyhow::Result<()> {
    let started = Instant::now();
    let user_id = event.user_id();
    let kind = event.kind();

    let mut session = app.sessions.lock(user_id).await;
    session.touch();

    let mut responder = Responder::for_event(app.transport.as_ref(), &event);
    let routed = route(app, &mut session, &event, &mut responder).await;
    let acknowledged = responder.finish().await;

    info!(
        target: "perf",
        user_id,
        kind,
        elapsed_ms = started.elapsed().as_millis() as u64,
        ok = routed.is_ok(),
        "event handled"
    );
    routed.and(acknowledged)
}

async fn route(
    app: &AppState,
    session: &mut Session,
    event: &InboundEvent,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    match event {
        InboundEvent::Text(message) => {
            if let Some(command) = Command::parse(&message.text) {
                info!(user_id = message.user_id, ?command, "command received");
                return run_command(app, session, command, responder).await;
            }

            match &mut session.flow {
                Flow::Order(conv) => {
                    let progress = order::on_text(app, conv, &message.text, responder).await?;
                    finish_order(session, progress);
                    Ok(())
                }
                Flow::Search(state) => search::on_text(app, state, &message.text, responder).await,
                Flow::Idle => responder.say(texts::IDLE_HINT, None).await,
            }
        }

        InboundEvent::Button(button) => {
            let callback = Callback::parse(&button.data);
            debug!(user_id = button.user_id, ?callback, "button pressed");

            if let Callback::Card(action, target) = callback {
                return search::on_card(app, session, action, target, responder).await;
            }
            match &mut session.flow {
                Flow::Order(conv) => {
                    let progress = order::on_button(app, conv, callback, responder).await?;
                    finish_order(session, progress);
                    Ok(())
                }
                Flow::Search(_) | Flow::Idle => responder.notice(texts::SESSION_EXPIRED).await,
            }
        }

        InboundEvent::Attachment(upload) => match &session.flow {
            Flow::Search(state) => {
                search::on_attachment(app, state, &upload.attachment, responder).await
            }
            Flow::Order(_) => responder.say(texts::USE_BUTTONS, None).await,
            Flow::Idle => responder.say(texts::IDLE_HINT, None).await,
        },
    }
}

fn finish_order(session: &mut Session, progress: order::Progress) {
    if progress == order::Progress::Completed {
        session.reset();
    }
}

async fn run_command(
    app: &AppState,
    session: &mut Session,
    command: Command,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    match command {
        Command::Start => {
            session.reset();
            menu::greet(responder).await
        }
        Command::CreateOrder => {
            session.flow = Flow::Order(order::start(responder).await?);
            Ok(())
        }
        Command::Search => {
            session.flow = Flow::Search(search::start(responder).await?);
            Ok(())
        }
        Command::Statistics => statistics::show(app, responder).await,
    }
}
