use crate::conversation::calendar::CalendarAction;
use crate::conversation::keyboards::{BACK, CONFIRM, CONFIRM_SERVICES};
use crate::conversation::pagination::ListKind;

/// A container a search card button refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerTarget {
    pub container_id: i64,
    pub container_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    AddPhoto,
    AddDocument,
    DownloadPhotos,
    DownloadDocuments,
}

impl CardAction {
    const ALL: [CardAction; 4] = [
        CardAction::AddPhoto,
        CardAction::AddDocument,
        CardAction::DownloadPhotos,
        CardAction::DownloadDocuments,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            CardAction::AddPhoto => "photo",
            CardAction::AddDocument => "document",
            CardAction::DownloadPhotos => "downloadPhoto",
            CardAction::DownloadDocuments => "downloadDocument",
        }
    }

    pub fn token(self, container_id: i64, container_name: &str) -> String {
        format!("{}_{}_{}", self.prefix(), container_id, container_name)
    }
}

/// Decoded `callback_data` of an inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Back,
    ConfirmServices,
    Confirm,
    Item { kind: ListKind, id: i64, name: String },
    Page { kind: ListKind, page: u32 },
    Calendar(CalendarAction),
    Card(CardAction, ContainerTarget),
    /// Literal token of a fixed keyboard (request type, size, loading, transport).
    Choice(String),
}

fn split_id(rest: &str) -> Option<(i64, String)> {
    let (id, name) = rest.split_once('_').unwrap_or((rest, ""));
    Some((id.parse().ok()?, name.to_string()))
}

impl Callback {
    pub fn parse(data: &str) -> Callback {
        match data {
            BACK => return Callback::Back,
            CONFIRM => return Callback::Confirm,
            CONFIRM_SERVICES => return Callback::ConfirmServices,
            _ => {}
        }

        if let Some(action) = CalendarAction::parse(data) {
            return Callback::Calendar(action);
        }

        for kind in [ListKind::Customers, ListKind::Services] {
            if let Some(page) = data
                .strip_prefix(kind.page_prefix())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|page| page.parse().ok())
            {
                return Callback::Page { kind, page };
            }
            if let Some((id, name)) = data
                .strip_prefix(kind.item_prefix())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(split_id)
            {
                return Callback::Item { kind, id, name };
            }
        }

        for action in CardAction::ALL {
            if let Some((container_id, container_name)) = data
                .strip_prefix(action.prefix())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(split_id)
            {
                return Callback::Card(
                    action,
                    ContainerTarget {
                        container_id,
                        container_name,
                    },
                );
            }
        }

        Callback::Choice(data.to_string())
    }
}
