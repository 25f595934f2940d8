//! User-facing texts of the bot.

pub const GREETING: &str = "Привет! Это бот для учёта контейнеров";
pub const ORDER_WELCOME: &str = "Вас приветствует МТТ бот для заявки!";
pub const IDLE_HINT: &str =
    "Используйте /create_order для новой заявки, /search для поиска контейнера или /statistics.";
pub const SESSION_EXPIRED: &str = "Сессия устарела. Начните заново: /create_order";
pub const USE_BUTTONS: &str = "Пожалуйста, выберите вариант с помощью кнопок.";

pub const PROMPT_REQUEST_TYPE: &str = "Выберите тип заявки:";
pub const PROMPT_CONTAINER_SIZE: &str = "Выберите тип контейнера:";
pub const PROMPT_CONTAINER_NAME: &str = "Введите номер контейнера (Например:TGHU1234567):";
pub const PROMPT_CONTAINER_STATE: &str = "Контейнер:";
pub const PROMPT_PRODUCT_NAME: &str = "Введите название продукта:";
pub const PROMPT_CONTAINER_OWNER: &str = "Введите Собственника контейнера:";
pub const PROMPT_DATE: &str = "Выберите дату:";
pub const PROMPT_TRANSPORT_TYPE: &str = "Тип транспорта:";
pub const PROMPT_SERVICES: &str = "Выберите дополнительные услуги!";
pub const PROMPT_CONFIRM: &str = "Подтвердить ✅ ?";

pub const INVALID_CONTAINER_NAME: &str =
    "Номер контейнера должен быть 11 символов: первые 4 буквы, затем 7 цифр.";
pub const CONTAINER_EXISTS: &str = "Контейнер с таким номером уже существует.";
pub const EMPTY_VALUE: &str = "Значение не может быть пустым. Попробуйте еще раз.";
pub const INVALID_DATE: &str = "Выберите дату в календаре или введите её в формате ГГГГ-ММ-ДД.";
pub const REMOTE_UNAVAILABLE: &str = "Сервис терминала временно недоступен. Попробуйте позже.";
pub const EMPTY_SELECTION: &str = "Пожалуйста, выберите хотя бы одну услугу.";
pub const CUSTOMERS_EMPTY: &str = "Список клиентов пуст.";
pub const SERVICES_EMPTY: &str = "Список услуг для этого клиента пуст.";
pub const ALREADY_FIRST_STEP: &str = "Вы уже на начальном этапе.";

pub const ORDER_CREATED: &str = "Заявка успешно создана!!";
pub const ORDER_FAILED: &str = "Произошла ошибка при создании заявки. Попробуйте еще раз.";

pub const SEARCH_PROMPT: &str = "Отправьте номер контейнера";
pub const CONTAINER_NOT_FOUND: &str = "Контейнер не найден";
pub const PHOTO_SAVED: &str = "Фото сохранено";
pub const DOCUMENT_SAVED: &str = "Документ сохранен";
pub const SEND_PHOTO: &str = "Отправьте фото контейнера.";
pub const SEND_DOCUMENT: &str = "Отправьте документ контейнера.";
pub const STATISTICS_FAILED: &str = "Не удалось получить статистику. Попробуйте позже.";

pub fn customers_prompt(page: u32, total_pages: u32) -> String {
    format!("Выберите клиента (Страница {} из {}):", page, total_pages)
}

pub fn transport_number_prompt(transport_type: Option<&str>) -> String {
    let transport = if transport_type == Some("wagon") {
        "Вагон"
    } else {
        "Авто"
    };
    format!("Введите номер {}:", transport)
}

pub const UPLOAD_REFUSED: &str = "Произошла ошибка: файл не принят терминалом.";
pub const UPLOAD_FAILED: &str = "Не удалось загрузить файл. Попробуйте еще раз.";

pub const STALE_BUTTON: &str = "Эта кнопка больше не активна.";
pub const CUSTOMER_MISSING: &str = "Сначала выберите клиента.";
