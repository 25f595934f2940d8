use crate::conversation::keyboards::{Button, InlineKeyboard};
use crate::models::terminal::{Customer, Paginated, Service};

pub const CUSTOMERS_PAGE_SIZE: u32 = 8;
pub const SERVICES_PAGE_SIZE: u32 = 40;

/// Bot API limit for `callback_data`.
pub const MAX_TOKEN_BYTES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Customers,
    Services,
}

impl ListKind {
    pub fn item_prefix(self) -> &'static str {
        match self {
            ListKind::Customers => "client",
            ListKind::Services => "service",
        }
    }

    pub fn page_prefix(self) -> &'static str {
        match self {
            ListKind::Customers => "clientpage",
            ListKind::Services => "servicepage",
        }
    }

    pub fn page_size(self) -> u32 {
        match self {
            ListKind::Customers => CUSTOMERS_PAGE_SIZE,
            ListKind::Services => SERVICES_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: i64,
    pub display_name: String,
}

impl From<Customer> for ListItem {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            display_name: customer.name,
        }
    }
}

impl From<Service> for ListItem {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            display_name: service.service_type.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    pub fn from_paginated<U: Into<T>>(page: Paginated<U>, page_size: u32) -> Self {
        Self {
            items: page.results.into_iter().map(Into::into).collect(),
            total_count: page.count,
            page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if total_count == 0 || page_size == 0 {
        return 1;
    }
    u32::try_from((total_count - 1) / u64::from(page_size) + 1).unwrap_or(u32::MAX)
}

pub fn offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(page_size)
}

fn truncate_to(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// `"{prefix}_{id}_{displayName}"`, with the name cut so the token fits the callback limit.
pub fn item_token(kind: ListKind, item: &ListItem) -> String {
    let head = format!("{}_{}_", kind.item_prefix(), item.id);
    let room = MAX_TOKEN_BYTES.saturating_sub(head.len());
    format!("{}{}", head, truncate_to(&item.display_name, room))
}

pub fn page_token(kind: ListKind, page: u32) -> String {
    format!("{}_{}", kind.page_prefix(), page)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Empty,
    Page {
        keyboard: InlineKeyboard,
        page: u32,
        total_pages: u32,
    },
}

/// Item buttons two per row, then "previous" when `page > 1` and "next" while pages remain.
pub fn render_page(
    result: &PageResult<ListItem>,
    page: u32,
    kind: ListKind,
    is_selected: impl Fn(i64) -> bool,
) -> PageView {
    if result.items.is_empty() {
        return PageView::Empty;
    }

    let total_pages = result.total_pages();
    let buttons = result
        .items
        .iter()
        .map(|item| {
            let label = if is_selected(item.id) {
                format!("✅ {}", item.display_name)
            } else {
                item.display_name.clone()
            };
            Button::new(label, item_token(kind, item))
        })
        .collect();

    let mut navigation = Vec::new();
    if page > 1 {
        navigation.push(Button::new("⬅️ Назад", page_token(kind, page - 1)));
    }
    if page < total_pages {
        navigation.push(Button::new("Вперед ➡️", page_token(kind, page + 1)));
    }

    PageView::Page {
        keyboard: InlineKeyboard::grid(buttons, 2).row(navigation),
        page,
        total_pages,
    }
}
