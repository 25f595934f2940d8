use crate::conversation::callback::{CardAction, ContainerTarget};
use crate::conversation::keyboards::{Button, InlineKeyboard, ReplyMarkup};
use crate::conversation::render::{escape_html, Responder};
use crate::conversation::texts;
use crate::models::events::Attachment;
use crate::models::terminal::ContainerRecord;
use crate::state::AppState;
use crate::store::sessions::{Flow, SearchState, Session};
use tracing::{info, warn};

pub async fn start(responder: &mut Responder<'_>) -> anyhow::Result<SearchState> {
    responder.say(texts::SEARCH_PROMPT, None).await?;
    Ok(SearchState::AwaitingContainerNumber)
}

pub async fn on_text(
    app: &AppState,
    state: &SearchState,
    text: &str,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    match state {
        SearchState::AwaitingContainerNumber => show_containers(app, text, responder).await,
        SearchState::AwaitingPhoto { .. } => responder.say(texts::SEND_PHOTO, None).await,
        SearchState::AwaitingDocument { .. } => responder.say(texts::SEND_DOCUMENT, None).await,
    }
}

async fn show_containers(
    app: &AppState,
    text: &str,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    let query: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let visits = match app.terminal.find_container(&query).await {
        Ok(page) => page.results,
        Err(err) => {
            warn!("container lookup failed: {}", err);
            return responder.say(texts::REMOTE_UNAVAILABLE, None).await;
        }
    };
    info!(query = %query, found = visits.len(), "container search");

    if visits.is_empty() {
        return responder.say(texts::CONTAINER_NOT_FOUND, None).await;
    }
    for record in &visits {
        let (text, keyboard) = container_card(record);
        responder
            .say(&text, Some(ReplyMarkup::Inline(keyboard)))
            .await?;
    }
    Ok(())
}

/// Summary of one container visit plus its attach/download buttons.
pub fn container_card(record: &ContainerRecord) -> (String, InlineKeyboard) {
    let name = &record.container.name;
    let mut lines = vec![format!(
        "Контейнер: <b>{} ({})</b>",
        escape_html(name),
        escape_html(record.container.size.as_deref().unwrap_or("-"))
    )];
    let status = match record.container_state.as_deref() {
        Some("empty") => "Порожний",
        Some("loaded") => "Груженый",
        Some(other) => other,
        None => "-",
    };
    lines.push(format!("Статус: <b>{}</b>", escape_html(status)));
    if let Some(company) = &record.company {
        lines.push(format!("Клиент: <b>{}</b>", escape_html(&company.name)));
    }
    if let Some(entry) = &record.entry_time {
        lines.push(format!("Дата прибытия: <b>{}</b>", escape_html(entry)));
    }
    if let Some(exit) = &record.exit_time {
        lines.push(format!("Дата убытия: <b>{}</b>", escape_html(exit)));
    }
    for service in &record.services {
        lines.push(format!(
            "Услуга: <b>{}</b>",
            escape_html(&service.service_type.name)
        ));
    }

    let mut downloads = Vec::new();
    if !record.images.is_empty() {
        downloads.push(Button::new(
            "Скачать фото",
            CardAction::DownloadPhotos.token(record.id, name),
        ));
    }
    if !record.documents.is_empty() {
        downloads.push(Button::new(
            "Скачать документы",
            CardAction::DownloadDocuments.token(record.id, name),
        ));
    }
    let keyboard = InlineKeyboard::new()
        .row(vec![
            Button::new("Добавить фото", CardAction::AddPhoto.token(record.id, name)),
            Button::new(
                "Добавить документ",
                CardAction::AddDocument.token(record.id, name),
            ),
        ])
        .row(downloads);

    (lines.join("\n"), keyboard)
}

/// Card buttons work from any flow: attaching switches the session into the matching search
/// state, downloading leaves it untouched.
pub async fn on_card(
    app: &AppState,
    session: &mut Session,
    action: CardAction,
    target: ContainerTarget,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    let name = escape_html(&target.container_name);
    match action {
        CardAction::AddPhoto => {
            session.flow = Flow::Search(SearchState::AwaitingPhoto {
                container_id: target.container_id,
                container_name: target.container_name,
            });
            responder
                .say(&format!("Добавьте фото контейнера {}", name), None)
                .await
        }
        CardAction::AddDocument => {
            session.flow = Flow::Search(SearchState::AwaitingDocument {
                container_id: target.container_id,
                container_name: target.container_name,
            });
            responder
                .say(&format!("Добавьте документ контейнера {}", name), None)
                .await
        }
        CardAction::DownloadPhotos => send_photos(app, &target, responder).await,
        CardAction::DownloadDocuments => send_documents(app, &target, responder).await,
    }
}

async fn send_photos(
    app: &AppState,
    target: &ContainerTarget,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    let photos = match app.terminal.fetch_photos(target.container_id).await {
        Ok(photos) => photos,
        Err(err) => {
            warn!(container_id = target.container_id, "photo list failed: {}", err);
            return responder.notice(texts::REMOTE_UNAVAILABLE).await;
        }
    };

    let chat_id = responder.chat_id();
    for photo in photos {
        let filename = format!("{}_{}.jpg", target.container_id, photo.id);
        let delivered = match app.terminal.download_media(&photo.image).await {
            Ok(bytes) => responder.transport().send_photo(chat_id, bytes, &filename).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = delivered {
            warn!(container_id = target.container_id, photo_id = photo.id, "photo not delivered: {:#}", err);
        }
    }

    responder
        .say(
            &format!("Фото контейнера {}", escape_html(&target.container_name)),
            None,
        )
        .await
}

fn document_filename(container_id: i64, document_id: i64, path: &str) -> String {
    match path.rsplit('/').next().filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{}_{}", container_id, document_id),
    }
}

async fn send_documents(
    app: &AppState,
    target: &ContainerTarget,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    let documents = match app.terminal.fetch_documents(target.container_id).await {
        Ok(documents) => documents,
        Err(err) => {
            warn!(container_id = target.container_id, "document list failed: {}", err);
            return responder.notice(texts::REMOTE_UNAVAILABLE).await;
        }
    };

    let chat_id = responder.chat_id();
    for document in documents {
        let filename = document_filename(target.container_id, document.id, &document.document);
        let delivered = match app.terminal.download_media(&document.document).await {
            Ok(bytes) => {
                responder
                    .transport()
                    .send_document(chat_id, bytes, &filename)
                    .await
            }
            Err(err) => Err(err.into()),
        };
        if let Err(err) = delivered {
            warn!(container_id = target.container_id, document_id = document.id, "document not delivered: {:#}", err);
        }
    }

    responder
        .say(
            &format!("Документы контейнера {}", escape_html(&target.container_name)),
            None,
        )
        .await
}

/// Photo or document sent while the session waits for one.
pub async fn on_attachment(
    app: &AppState,
    state: &SearchState,
    attachment: &Attachment,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    match (state, attachment) {
        (SearchState::AwaitingPhoto { container_id, .. }, Attachment::Photo { file_id }) => {
            let uploaded = async {
                let bytes = responder.transport().download_file(file_id).await?;
                Ok::<_, anyhow::Error>(app.terminal.upload_photo(*container_id, bytes).await?)
            }
            .await;
            report_upload(uploaded, texts::PHOTO_SAVED, *container_id, responder).await
        }
        (
            SearchState::AwaitingDocument { container_id, .. },
            Attachment::Document { file_id, file_name },
        ) => {
            let uploaded = async {
                let bytes = responder.transport().download_file(file_id).await?;
                Ok::<_, anyhow::Error>(
                    app.terminal
                        .upload_document(*container_id, bytes, file_name)
                        .await?,
                )
            }
            .await;
            report_upload(uploaded, texts::DOCUMENT_SAVED, *container_id, responder).await
        }
        (SearchState::AwaitingPhoto { .. }, _) => responder.say(texts::SEND_PHOTO, None).await,
        (SearchState::AwaitingDocument { .. }, _) => {
            responder.say(texts::SEND_DOCUMENT, None).await
        }
        (SearchState::AwaitingContainerNumber, _) => {
            responder.say(texts::SEARCH_PROMPT, None).await
        }
    }
}

async fn report_upload(
    uploaded: anyhow::Result<bool>,
    saved: &str,
    container_id: i64,
    responder: &mut Responder<'_>,
) -> anyhow::Result<()> {
    match uploaded {
        Ok(true) => {
            info!(container_id, "attachment stored");
            responder.say(saved, None).await
        }
        Ok(false) => {
            warn!(container_id, "terminal refused the attachment");
            responder.say(texts::UPLOAD_REFUSED, None).await
        }
        Err(err) => {
            warn!(container_id, "attachment transfer failed: {:#}", err);
            responder.say(texts::UPLOAD_FAILED, None).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::terminal::{Company, ContainerInfo, Service, ServiceType};
    use serde_json::json;

    fn record(images: usize, documents: usize) -> ContainerRecord {
        ContainerRecord {
            id: 7,
            container: ContainerInfo {
                name: "TGHU1234567".to_string(),
                size: Some("40HC".to_string()),
            },
            exit_time: None,
            entry_time: Some("2026-10-18".to_string()),
            container_state: Some("empty".to_string()),
            company: Some(Company {
                name: "Acme & Co".to_string(),
            }),
            services: vec![Service {
                id: 1,
                service_type: ServiceType {
                    name: "Мойка".to_string(),
                },
            }],
            images: vec![json!({"id": 1}); images],
            documents: vec![json!({"id": 2}); documents],
        }
    }

    #[test]
    fn card_lists_visit_details() {
        let (text, _) = container_card(&record(0, 0));
        assert_eq!(
            text,
            "Контейнер: <b>TGHU1234567 (40HC)</b>\n\
             Статус: <b>Порожний</b>\n\
             Клиент: <b>Acme &amp; Co</b>\n\
             Дата прибытия: <b>2026-10-18</b>\n\
             Услуга: <b>Мойка</b>"
        );
    }

    #[test]
    fn download_buttons_only_for_existing_files() {
        let (_, keyboard) = container_card(&record(0, 0));
        assert_eq!(keyboard.rows.len(), 1);
        assert!(keyboard.find("photo_7_TGHU1234567").is_some());
        assert!(keyboard.find("document_7_TGHU1234567").is_some());

        let (_, keyboard) = container_card(&record(2, 0));
        assert!(keyboard.find("downloadPhoto_7_TGHU1234567").is_some());
        assert!(keyboard.find("downloadDocument_7_TGHU1234567").is_none());
    }

    #[test]
    fn document_names_come_from_the_stored_path() {
        assert_eq!(
            document_filename(7, 3, "/media/documents/act.pdf"),
            "act.pdf"
        );
        assert_eq!(document_filename(7, 3, "/media/documents/"), "7_3");
    }
}
