use crate::conversation::error::WizardError;
use crate::conversation::selection::ServiceSelection;
use crate::conversation::step::Step;
use crate::models::terminal::{ContainerRegistration, ServiceRef};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    RequestType,
    ContainerSize,
    ContainerName,
    ContainerState,
    ProductName,
    CustomerName,
    ContainerOwner,
    TransportType,
    TransportNumber,
    Date,
    SelectedServiceNames,
}

impl FieldKey {
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::RequestType => "тип заявки",
            FieldKey::ContainerSize => "размер контейнера",
            FieldKey::ContainerName => "номер контейнера",
            FieldKey::ContainerState => "состояние контейнера",
            FieldKey::ProductName => "название продукта",
            FieldKey::CustomerName => "имя клиента",
            FieldKey::ContainerOwner => "собственник контейнера",
            FieldKey::TransportType => "тип транспорта",
            FieldKey::TransportNumber => "номер транспорта",
            FieldKey::Date => "дата",
            FieldKey::SelectedServiceNames => "выбранные услуги",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Filters the services list was fetched with. A selection only stays valid under the scope it was
/// made in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceScope {
    pub customer_id: i64,
    pub container_size: Option<String>,
    pub container_state: Option<String>,
}

/// Everything one user has entered into the order wizard so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    step: Step,
    // Insertion ordered; overwriting a key keeps its original position.
    fields: Vec<(FieldKey, FieldValue)>,
    customer_id: Option<i64>,
    selection: ServiceSelection,
    selection_scope: Option<ServiceScope>,
    // Service ids the terminal listed under `selection_scope`.
    offered_services: BTreeSet<i64>,
    customer_page: u32,
    service_page: u32,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            step: Step::FIRST,
            fields: Vec::new(),
            customer_id: None,
            selection: ServiceSelection::new(),
            selection_scope: None,
            offered_services: BTreeSet::new(),
            customer_page: 1,
            service_page: 1,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self.get(FieldKey::Date) {
            Some(FieldValue::Date(date)) => Some(*date),
            _ => None,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: FieldValue) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn set_text(&mut self, key: FieldKey, value: impl Into<String>) {
        self.set(key, FieldValue::Text(value.into()));
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(k, _)| *k == key)?;
        Some(self.fields.remove(index).1)
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn container_is_empty(&self) -> bool {
        self.text(FieldKey::ContainerState) == Some("empty")
    }

    pub fn choose_customer(&mut self, id: i64, name: &str) {
        self.customer_id = Some(id);
        self.set_text(FieldKey::CustomerName, name);
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    pub fn selection(&self) -> &ServiceSelection {
        &self.selection
    }

    pub fn toggle_service(&mut self, id: i64, name: &str) -> bool {
        let selected = self.selection.toggle(id, name);
        self.sync_selection_field();
        selected
    }

    fn sync_selection_field(&mut self) {
        if self.selection.is_empty() {
            self.remove(FieldKey::SelectedServiceNames);
        } else {
            let names = self.selection.names().join(", ");
            self.set_text(FieldKey::SelectedServiceNames, names);
        }
    }

    pub fn service_scope(&self) -> Option<ServiceScope> {
        Some(ServiceScope {
            customer_id: self.customer_id?,
            container_size: self.text(FieldKey::ContainerSize).map(str::to_string),
            container_state: self.text(FieldKey::ContainerState).map(str::to_string),
        })
    }

    /// Binds the selection to `scope`, dropping it when it was made for another customer, size or
    /// loading state. Returns whether anything was dropped.
    pub fn enter_service_scope(&mut self, scope: ServiceScope) -> bool {
        if self.selection_scope.as_ref() == Some(&scope) {
            return false;
        }

        let dropped = !self.selection.is_empty();
        self.selection.clear();
        self.sync_selection_field();
        self.service_page = 1;
        self.offered_services.clear();
        self.selection_scope = Some(scope);
        dropped
    }

    /// Records services shown under the current scope; only those can be toggled.
    pub fn offer_services(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.offered_services.extend(ids);
    }

    pub fn is_offered(&self, id: i64) -> bool {
        self.offered_services.contains(&id)
    }

    pub fn customer_page(&self) -> u32 {
        self.customer_page
    }

    pub fn set_customer_page(&mut self, page: u32) {
        self.customer_page = page.max(1);
    }

    pub fn service_page(&self) -> u32 {
        self.service_page
    }

    pub fn set_service_page(&mut self, page: u32) {
        self.service_page = page.max(1);
    }

    fn required(&self, key: FieldKey) -> Result<String, WizardError> {
        self.get(key).map(|v| v.to_string()).ok_or_else(|| {
            WizardError::Validation(format!("Не заполнено поле «{}».", key.label()))
        })
    }

    /// Packages the collected answers into the registration request.
    pub fn registration(&self) -> Result<ContainerRegistration, WizardError> {
        if self.selection.is_empty() {
            return Err(WizardError::EmptySelection);
        }

        let company_id = self.customer_id.ok_or_else(|| {
            WizardError::Validation(format!(
                "Не заполнено поле «{}».",
                FieldKey::CustomerName.label()
            ))
        })?;
        let entry_time = self
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .ok_or_else(|| {
                WizardError::Validation(format!(
                    "Не заполнено поле «{}».",
                    FieldKey::Date.label()
                ))
            })?;

        Ok(ContainerRegistration {
            container_size: self.required(FieldKey::ContainerSize)?,
            container_name: self.required(FieldKey::ContainerName)?,
            container_state: self.required(FieldKey::ContainerState)?.to_lowercase(),
            product_name: self
                .text(FieldKey::ProductName)
                .unwrap_or_default()
                .to_string(),
            company_id,
            container_owner: self.required(FieldKey::ContainerOwner)?,
            transport_type: self.required(FieldKey::TransportType)?,
            transport_number: self.required(FieldKey::TransportNumber)?,
            entry_time,
            services: self
                .selection
                .ids()
                .iter()
                .map(|id| ServiceRef { id: *id })
                .collect(),
        })
    }
}
