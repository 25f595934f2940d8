use crate::clients::terminal::ServiceQuery;
use crate::conversation::calendar::{first_of_month, month_keyboard, CalendarAction};
use crate::conversation::callback::Callback;
use crate::conversation::error::{HandlerError, WizardError};
use crate::conversation::keyboards::{self, Button, ReplyMarkup, CONFIRM_SERVICES};
use crate::conversation::pagination::{offset, render_page, ListItem, ListKind, PageResult, PageView};
use crate::conversation::render::{escape_html, screen, Responder, Screen};
use crate::conversation::state::{ConversationState, FieldKey, FieldValue, ServiceScope};
use crate::conversation::step::Step;
use crate::conversation::texts;
use crate::conversation::validators::{normalize_container_number, parse_date, required_text};
use crate::models::terminal::ContainerRecord;
use crate::state::AppState;
use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

/// What the dispatcher should do with the session after an order event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Stay,
    Completed,
}

/// Opens a fresh wizard at the request type step.
pub async fn start(responder: &mut Responder<'_>) -> anyhow::Result<ConversationState> {
    let conv = ConversationState::new();
    let text = format!(
        "{}\n\n<b>{}</b>",
        texts::ORDER_WELCOME,
        texts::PROMPT_REQUEST_TYPE
    );
    responder
        .say(&text, Some(ReplyMarkup::Inline(keyboards::request_type())))
        .await?;
    Ok(conv)
}

pub async fn on_text(
    app: &AppState,
    conv: &mut ConversationState,
    text: &str,
    responder: &mut Responder<'_>,
) -> anyhow::Result<Progress> {
    let outcome = handle_text(app, conv, text, responder).await;
    settle(outcome, responder).await
}

pub async fn on_button(
    app: &AppState,
    conv: &mut ConversationState,
    callback: Callback,
    responder: &mut Responder<'_>,
) -> anyhow::Result<Progress> {
    let outcome = handle_button(app, conv, callback, responder).await;
    settle(outcome, responder).await
}

/// Turns rejections into a notice and leaves the wizard where it was.
async fn settle(
    outcome: Result<Progress, HandlerError>,
    responder: &mut Responder<'_>,
) -> anyhow::Result<Progress> {
    match outcome {
        Ok(progress) => Ok(progress),
        Err(HandlerError::Rejected(err)) => {
            info!("order step rejected: {}", err);
            responder.notice(&err.user_message()).await?;
            Ok(Progress::Stay)
        }
        Err(HandlerError::Transport(err)) => Err(err),
    }
}

async fn handle_text(
    app: &AppState,
    conv: &mut ConversationState,
    text: &str,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    let step = conv.step();
    let mut draft = conv.clone();

    match step {
        Step::ContainerName => {
            let number = normalize_container_number(text)?;
            let visits = app.terminal.find_container(&number).await?;
            if visits.results.iter().any(ContainerRecord::is_active) {
                return Err(WizardError::Conflict(number).into());
            }
            draft.set_text(FieldKey::ContainerName, number);
        }
        Step::ProductName => {
            draft.set_text(FieldKey::ProductName, required_text(text)?.to_uppercase());
        }
        Step::ContainerOwner => draft.set_text(FieldKey::ContainerOwner, required_text(text)?),
        Step::TransportNumber => draft.set_text(FieldKey::TransportNumber, required_text(text)?),
        Step::Date => draft.set(FieldKey::Date, FieldValue::Date(parse_date(text)?)),
        _ => {
            responder.say(texts::USE_BUTTONS, None).await?;
            return commit(app, conv, draft, step, responder).await;
        }
    }

    advance(app, conv, draft, responder).await
}

async fn handle_button(
    app: &AppState,
    conv: &mut ConversationState,
    callback: Callback,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    let step = conv.step();
    let mut draft = conv.clone();

    match (step, callback) {
        (_, Callback::Back) => go_back(app, conv, responder).await,

        (_, Callback::Choice(token)) if step.choices().contains(&token.as_str()) => {
            let value = match step {
                Step::RequestType | Step::ContainerSize => token.to_uppercase(),
                _ => token,
            };
            if let Some(field) = step.field() {
                draft.set_text(field, value);
            }
            if step == Step::ContainerState && draft.container_is_empty() {
                draft.remove(FieldKey::ProductName);
            }
            advance(app, conv, draft, responder).await
        }

        (
            Step::CustomerName,
            Callback::Item {
                kind: ListKind::Customers,
                id,
                name,
            },
        ) => {
            draft.choose_customer(id, &name);
            advance(app, conv, draft, responder).await
        }
        (
            Step::CustomerName,
            Callback::Page {
                kind: ListKind::Customers,
                page,
            },
        ) => {
            draft.set_customer_page(page);
            commit(app, conv, draft, step, responder).await
        }

        (
            Step::SelectedServices,
            Callback::Item {
                kind: ListKind::Services,
                id,
                name,
            },
        ) => {
            if !draft.is_offered(id) {
                info!(service_id = id, "service was not offered for the current customer");
                responder.notice(texts::STALE_BUTTON).await?;
                return Ok(Progress::Stay);
            }
            draft.toggle_service(id, &name);
            commit(app, conv, draft, step, responder).await
        }
        (
            Step::SelectedServices,
            Callback::Page {
                kind: ListKind::Services,
                page,
            },
        ) => {
            draft.set_service_page(page);
            commit(app, conv, draft, step, responder).await
        }
        (Step::SelectedServices, Callback::ConfirmServices) => {
            if draft.selection().is_empty() {
                return Err(WizardError::EmptySelection.into());
            }
            advance(app, conv, draft, responder).await
        }

        (Step::Date, Callback::Calendar(action)) => match action {
            CalendarAction::Day(date) => {
                draft.set(FieldKey::Date, FieldValue::Date(date));
                advance(app, conv, draft, responder).await
            }
            CalendarAction::Month(month) => {
                responder.show(date_screen(conv, month)).await?;
                Ok(Progress::Stay)
            }
            CalendarAction::Ignore => Ok(Progress::Stay),
        },

        (Step::Confirmation, Callback::Confirm) => submit(app, conv, responder).await,

        (_, callback) => {
            info!(?step, ?callback, "button does not belong to the current step");
            responder.notice(texts::STALE_BUTTON).await?;
            Ok(Progress::Stay)
        }
    }
}

/// Moves `draft` to the step after the current one.
async fn advance(
    app: &AppState,
    conv: &mut ConversationState,
    draft: ConversationState,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    match draft.step().next(&draft) {
        Some(next) => commit(app, conv, draft, next, responder).await,
        None => Ok(Progress::Stay),
    }
}

async fn go_back(
    app: &AppState,
    conv: &mut ConversationState,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    let current = conv.step();
    let Some(previous) = current.previous(conv) else {
        responder.notice(texts::ALREADY_FIRST_STEP).await?;
        return Ok(Progress::Stay);
    };

    let mut draft = conv.clone();
    if let Some(field) = current.field() {
        draft.remove(field);
    }
    commit(app, conv, draft, previous, responder).await
}

/// Renders `step` for `draft` and only then replaces the live state with it, so a failed lookup
/// leaves the user on the screen they were looking at.
async fn commit(
    app: &AppState,
    conv: &mut ConversationState,
    mut draft: ConversationState,
    step: Step,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    let rendered = render_step(app, &mut draft, step).await?;
    draft.set_step(step);
    *conv = draft;
    responder.show(rendered).await?;
    Ok(Progress::Stay)
}

/// Builds the prompt and keyboard of `step`, fetching list pages where the step needs them.
pub async fn render_step(
    app: &AppState,
    conv: &mut ConversationState,
    step: Step,
) -> Result<Screen, HandlerError> {
    let back = Some(keyboards::back_only());
    let rendered = match step {
        Step::RequestType => screen(conv, texts::PROMPT_REQUEST_TYPE, Some(keyboards::request_type())),
        Step::ContainerSize => screen(
            conv,
            texts::PROMPT_CONTAINER_SIZE,
            Some(keyboards::container_size()),
        ),
        Step::ContainerName => screen(conv, texts::PROMPT_CONTAINER_NAME, back),
        Step::ContainerState => screen(
            conv,
            texts::PROMPT_CONTAINER_STATE,
            Some(keyboards::container_state()),
        ),
        Step::ProductName => screen(conv, texts::PROMPT_PRODUCT_NAME, back),
        Step::CustomerName => customers_screen(app, conv).await?,
        Step::ContainerOwner => screen(conv, texts::PROMPT_CONTAINER_OWNER, back),
        Step::Date => {
            let month = conv.date().unwrap_or_else(|| Local::now().date_naive());
            date_screen(conv, month)
        }
        Step::TransportType => screen(
            conv,
            texts::PROMPT_TRANSPORT_TYPE,
            Some(keyboards::transport_type()),
        ),
        Step::TransportNumber => screen(
            conv,
            &texts::transport_number_prompt(conv.text(FieldKey::TransportType)),
            back,
        ),
        Step::SelectedServices => services_screen(app, conv).await?,
        Step::Confirmation => screen(conv, texts::PROMPT_CONFIRM, Some(keyboards::confirmation())),
    };
    Ok(rendered)
}

fn date_screen(conv: &ConversationState, month: NaiveDate) -> Screen {
    screen(
        conv,
        texts::PROMPT_DATE,
        Some(month_keyboard(first_of_month(month))),
    )
}

async fn fetch_customers(app: &AppState, page: u32) -> Result<PageResult<ListItem>, HandlerError> {
    let size = ListKind::Customers.page_size();
    let raw = app
        .terminal
        .list_customers(offset(page, size), u64::from(size))
        .await?;
    Ok(PageResult::from_paginated(raw, size))
}

async fn fetch_services(
    app: &AppState,
    scope: &ServiceScope,
    page: u32,
) -> Result<PageResult<ListItem>, HandlerError> {
    let size = ListKind::Services.page_size();
    let query = ServiceQuery {
        offset: offset(page, size),
        limit: u64::from(size),
        customer_id: scope.customer_id,
        container_size: scope.container_size.clone(),
        container_state: scope.container_state.clone(),
    };
    let raw = app.terminal.list_services(&query).await?;
    Ok(PageResult::from_paginated(raw, size))
}

/// `page` lies past the last page of a non-empty list.
fn overshoots(result: &PageResult<ListItem>, page: u32) -> bool {
    result.items.is_empty() && result.total_count > 0 && page > result.total_pages()
}

async fn customers_screen(
    app: &AppState,
    conv: &mut ConversationState,
) -> Result<Screen, HandlerError> {
    let kind = ListKind::Customers;
    let mut page = conv.customer_page();
    let mut result = fetch_customers(app, page).await?;
    if overshoots(&result, page) {
        page = result.total_pages();
        result = fetch_customers(app, page).await?;
        conv.set_customer_page(page);
    }

    match render_page(&result, page, kind, |_| false) {
        PageView::Empty => Err(WizardError::EmptyList(kind).into()),
        PageView::Page {
            keyboard,
            page,
            total_pages,
        } => Ok(screen(
            conv,
            &texts::customers_prompt(page, total_pages),
            Some(keyboard.with_back()),
        )),
    }
}

async fn services_screen(
    app: &AppState,
    conv: &mut ConversationState,
) -> Result<Screen, HandlerError> {
    let scope = conv
        .service_scope()
        .ok_or_else(|| WizardError::Validation(texts::CUSTOMER_MISSING.to_string()))?;
    if conv.enter_service_scope(scope.clone()) {
        info!(customer_id = scope.customer_id, "service selection dropped after scope change");
    }

    let kind = ListKind::Services;
    let mut page = conv.service_page();
    let mut result = fetch_services(app, &scope, page).await?;
    if overshoots(&result, page) {
        page = result.total_pages();
        result = fetch_services(app, &scope, page).await?;
        conv.set_service_page(page);
    }
    conv.offer_services(result.items.iter().map(|item| item.id));

    let selection = conv.selection();
    match render_page(&result, page, kind, |id| selection.contains(id)) {
        PageView::Empty => Err(WizardError::EmptyList(kind).into()),
        PageView::Page { keyboard, .. } => {
            let keyboard = keyboard
                .row(vec![Button::new("Подтвердить ✅", CONFIRM_SERVICES)])
                .with_back();
            Ok(screen(conv, texts::PROMPT_SERVICES, Some(keyboard)))
        }
    }
}

async fn submit(
    app: &AppState,
    conv: &ConversationState,
    responder: &mut Responder<'_>,
) -> Result<Progress, HandlerError> {
    let payload = conv.registration()?;

    match app.terminal.register_container(&payload).await {
        Ok(outcome) => {
            forward_to_admin(app, &outcome.body).await;
            if outcome.created {
                info!(
                    container = %payload.container_name,
                    company_id = payload.company_id,
                    "container visit registered"
                );
                responder
                    .say(texts::ORDER_CREATED, Some(ReplyMarkup::remove()))
                    .await?;
                return Ok(Progress::Completed);
            }
            warn!(container = %payload.container_name, body = %outcome.body, "registration refused");
        }
        Err(err) => error!(container = %payload.container_name, "registration failed: {}", err),
    }

    responder.notice(texts::ORDER_FAILED).await?;
    Ok(Progress::Stay)
}

/// Echoes the raw registration response to the operator chat, when one is configured.
async fn forward_to_admin(app: &AppState, body: &serde_json::Value) {
    let Some(admin_chat) = app.config.telegram.admin_chat_id else {
        return;
    };
    let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
    let text = format!("<pre>{}</pre>", escape_html(&pretty));
    if let Err(err) = app.transport.send_message(admin_chat, &text, None).await {
        warn!("admin echo failed: {:#}", err);
    }
}
