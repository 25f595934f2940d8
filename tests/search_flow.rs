mod support;

use serde_json::json;
use std::sync::atomic::Ordering;
use support::*;
use terminal_order_bot::conversation::keyboards::ReplyMarkup;
use terminal_order_bot::conversation::texts;
use terminal_order_bot::models::events::Attachment;
use terminal_order_bot::models::terminal::{Document, Photo};
use terminal_order_bot::store::sessions::{Flow, SearchState};

fn terminal_with_container() -> FakeTerminal {
    let terminal = FakeTerminal::default();
    let mut record = visit(2, "TGHU1234567", None);
    record.images = vec![json!({"id": 1})];
    terminal
        .containers
        .lock()
        .unwrap()
        .insert("TGHU1234567".to_string(), vec![record]);
    *terminal.photos.lock().unwrap() = vec![
        Photo {
            id: 1,
            image: "/media/photos/a.jpg".to_string(),
        },
        Photo {
            id: 5,
            image: "/media/photos/b.jpg".to_string(),
        },
    ];
    *terminal.documents.lock().unwrap() = vec![Document {
        id: 3,
        document: "/media/documents/act.pdf".to_string(),
    }];
    terminal
}

#[tokio::test]
async fn search_shows_a_card_per_visit() {
    let harness = Harness::new(terminal_with_container());

    let sent = harness.text("/search").await;
    assert_eq!(texts(&sent), vec![texts::SEARCH_PROMPT.to_string()]);
    assert_eq!(
        harness.flow().await,
        Flow::Search(SearchState::AwaitingContainerNumber)
    );

    let sent = harness.text("tghu 1234567").await;
    assert_eq!(sent.len(), 1);
    assert!(last_screen(&sent).starts_with("Контейнер: <b>TGHU1234567 (40HC)</b>"));
    let card = keyboard(&sent).unwrap();
    assert!(card.find("photo_2_TGHU1234567").is_some());
    assert!(card.find("downloadPhoto_2_TGHU1234567").is_some());
    assert!(card.find("downloadDocument_2_TGHU1234567").is_none());

    let sent = harness.text("ABCD0000000").await;
    assert_eq!(texts(&sent), vec![texts::CONTAINER_NOT_FOUND.to_string()]);
}

#[tokio::test]
async fn photos_are_attached_to_the_chosen_container() {
    let harness = Harness::new(terminal_with_container());
    harness.text("/search").await;
    harness.text("TGHU1234567").await;

    let sent = harness.press("photo_2_TGHU1234567").await;
    assert_eq!(
        texts(&sent),
        vec!["Добавьте фото контейнера TGHU1234567".to_string()]
    );
    assert_eq!(
        harness.flow().await,
        Flow::Search(SearchState::AwaitingPhoto {
            container_id: 2,
            container_name: "TGHU1234567".to_string(),
        })
    );

    let sent = harness.text("hello").await;
    assert_eq!(texts(&sent), vec![texts::SEND_PHOTO.to_string()]);

    let sent = harness
        .attach(Attachment::Photo {
            file_id: "ph1".to_string(),
        })
        .await;
    assert_eq!(texts(&sent), vec![texts::PHOTO_SAVED.to_string()]);
    let uploads = harness.terminal.uploads.lock().unwrap().clone();
    assert_eq!(uploads, vec![(2, b"file:ph1".to_vec(), None)]);
}

#[tokio::test]
async fn documents_keep_their_file_name() {
    let harness = Harness::new(terminal_with_container());
    harness.text("/search").await;
    harness.press("document_2_TGHU1234567").await;

    let sent = harness
        .attach(Attachment::Photo {
            file_id: "ph1".to_string(),
        })
        .await;
    assert_eq!(texts(&sent), vec![texts::SEND_DOCUMENT.to_string()]);

    let sent = harness
        .attach(Attachment::Document {
            file_id: "doc1".to_string(),
            file_name: "invoice.pdf".to_string(),
        })
        .await;
    assert_eq!(texts(&sent), vec![texts::DOCUMENT_SAVED.to_string()]);
    let uploads = harness.terminal.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![(2, b"file:doc1".to_vec(), Some("invoice.pdf".to_string()))]
    );
}

#[tokio::test]
async fn failed_transfers_report_a_fixed_text() {
    let harness = Harness::new(terminal_with_container());
    harness.transport.downloads_down.store(true, Ordering::SeqCst);
    harness.press("photo_2_TGHU1234567").await;

    let sent = harness
        .attach(Attachment::Photo {
            file_id: "ph1".to_string(),
        })
        .await;
    assert_eq!(texts(&sent), vec![texts::UPLOAD_FAILED.to_string()]);
    assert!(texts(&sent).iter().all(|text| !text.contains(TOKEN)));
    assert!(harness.terminal.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn downloads_send_files_then_a_caption() {
    let harness = Harness::new(terminal_with_container());

    let sent = harness.press("downloadPhoto_2_TGHU1234567").await;
    assert_eq!(
        &sent[..3],
        &[
            Sent::Photo {
                filename: "2_1.jpg".to_string()
            },
            Sent::Photo {
                filename: "2_5.jpg".to_string()
            },
            Sent::Message {
                chat_id: USER,
                text: "Фото контейнера TGHU1234567".to_string(),
                markup: None,
            },
        ]
    );

    let sent = harness.press("downloadDocument_2_TGHU1234567").await;
    assert_eq!(
        sent[0],
        Sent::Document {
            filename: "act.pdf".to_string()
        }
    );
    assert_eq!(harness.flow().await, Flow::Idle);
}

#[tokio::test]
async fn statistics_are_listed_line_by_line() {
    let harness = Harness::new(FakeTerminal::default());

    let sent = harness.text("/statistics").await;
    let text = last_screen(&sent);
    assert!(text.contains("Общее количество контейнеров: <b>10</b>"));
    assert!(text.contains("Новые контейнеры: <b>1</b>"));
}

#[tokio::test]
async fn start_shows_the_main_menu_and_resets() {
    let harness = Harness::new(FakeTerminal::default());
    harness.text("/create_order").await;

    let sent = harness.text("/start").await;
    assert!(matches!(
        &sent[0],
        Sent::Message { text, markup: Some(ReplyMarkup::Menu(_)), .. } if text == texts::GREETING
    ));
    assert_eq!(harness.flow().await, Flow::Idle);

    let sent = harness.text("что-нибудь").await;
    assert_eq!(texts(&sent), vec![texts::IDLE_HINT.to_string()]);

    let sent = harness.press("import").await;
    assert_eq!(toasts(&sent), vec![texts::SESSION_EXPIRED.to_string()]);
}

#[tokio::test]
async fn menu_button_starts_an_order() {
    let harness = Harness::new(FakeTerminal::default());

    harness.text("📝 Заполнить заявку").await;
    assert!(matches!(harness.flow().await, Flow::Order(_)));
}
