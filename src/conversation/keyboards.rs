use serde::Serialize;

pub const BACK: &str = "back";
pub const CONFIRM: &str = "confirm";
pub const CONFIRM_SERVICES: &str = "confirm_services";

pub const MENU_CREATE_ORDER: &str = "📝 Заполнить заявку";
pub const MENU_SEARCH: &str = "Поиск контейнера";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub text: String,
    #[serde(rename = "callback_data")]
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }

    pub fn back() -> Self {
        Self::new("◀️ Назад", BACK)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    #[serde(rename = "inline_keyboard")]
    pub rows: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays `buttons` out `width` per row, like the Bot API keyboard builders do.
    pub fn grid(buttons: Vec<Button>, width: usize) -> Self {
        Self::new().rows_of(buttons, width)
    }

    pub fn rows_of(mut self, buttons: Vec<Button>, width: usize) -> Self {
        let width = width.max(1);
        let mut row = Vec::with_capacity(width);
        for button in buttons {
            row.push(button);
            if row.len() == width {
                self.rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn with_back(self) -> Self {
        self.row(vec![Button::back()])
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, data: &str) -> Option<&Button> {
        self.buttons().find(|b| b.data == data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyButton {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuKeyboard {
    pub keyboard: Vec<Vec<KeyButton>>,
    pub resize_keyboard: bool,
    pub selective: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline(InlineKeyboard),
    Menu(MenuKeyboard),
    Remove { remove_keyboard: bool },
}

impl ReplyMarkup {
    pub fn remove() -> Self {
        ReplyMarkup::Remove {
            remove_keyboard: true,
        }
    }
}

pub fn main_menu() -> ReplyMarkup {
    ReplyMarkup::Menu(MenuKeyboard {
        keyboard: vec![vec![
            KeyButton {
                text: MENU_CREATE_ORDER.to_string(),
            },
            KeyButton {
                text: MENU_SEARCH.to_string(),
            },
        ]],
        resize_keyboard: true,
        selective: true,
    })
}

pub fn request_type() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![Button::new("Приём 📥", "import")])
        .row(vec![Button::new("Отправка 📤", "export")])
}

pub fn container_size() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![Button::new("📦 20", "20"), Button::new("📦 20HC", "20HC")])
        .row(vec![Button::new("📦 40", "40"), Button::new("📦 40HC", "40HC")])
        .row(vec![Button::new("📦 45", "45")])
        .with_back()
}

pub fn container_state() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![
            Button::new("Гружённый 🚛", "loaded"),
            Button::new("Порожний 🚚", "empty"),
        ])
        .with_back()
}

pub fn transport_type() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![Button::new("🚚 Авто", "auto"), Button::new("🚆 ЖД", "wagon")])
        .with_back()
}

pub fn confirmation() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        Button::new("Подтвердить ✅", CONFIRM),
        Button::new("Назад", BACK),
    ])
}

pub fn back_only() -> InlineKeyboard {
    InlineKeyboard::new().with_back()
}
