use crate::conversation::state::{ConversationState, FieldKey};

/// Stages of the order wizard, declared in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RequestType,
    ContainerSize,
    ContainerName,
    ContainerState,
    ProductName,
    CustomerName,
    ContainerOwner,
    Date,
    TransportType,
    TransportNumber,
    SelectedServices,
    Confirmation,
}

impl Step {
    /// Visiting order shared by forward and back navigation.
    pub const ORDER: [Step; 12] = [
        Step::RequestType,
        Step::ContainerSize,
        Step::ContainerName,
        Step::ContainerState,
        Step::ProductName,
        Step::CustomerName,
        Step::ContainerOwner,
        Step::Date,
        Step::TransportType,
        Step::TransportNumber,
        Step::SelectedServices,
        Step::Confirmation,
    ];

    pub const FIRST: Step = Step::RequestType;

    fn index(self) -> usize {
        self as usize
    }

    /// Conditional steps: an empty container carries no product.
    pub fn is_skipped(self, state: &ConversationState) -> bool {
        match self {
            Step::ProductName => state.container_is_empty(),
            _ => false,
        }
    }

    pub fn next(self, state: &ConversationState) -> Option<Step> {
        Self::ORDER[self.index() + 1..]
            .iter()
            .copied()
            .find(|step| !step.is_skipped(state))
    }

    pub fn previous(self, state: &ConversationState) -> Option<Step> {
        Self::ORDER[..self.index()]
            .iter()
            .rev()
            .copied()
            .find(|step| !step.is_skipped(state))
    }

    /// Field collected by this step, if it stores one directly.
    pub fn field(self) -> Option<FieldKey> {
        match self {
            Step::RequestType => Some(FieldKey::RequestType),
            Step::ContainerSize => Some(FieldKey::ContainerSize),
            Step::ContainerName => Some(FieldKey::ContainerName),
            Step::ContainerState => Some(FieldKey::ContainerState),
            Step::ProductName => Some(FieldKey::ProductName),
            Step::CustomerName => Some(FieldKey::CustomerName),
            Step::ContainerOwner => Some(FieldKey::ContainerOwner),
            Step::Date => Some(FieldKey::Date),
            Step::TransportType => Some(FieldKey::TransportType),
            Step::TransportNumber => Some(FieldKey::TransportNumber),
            Step::SelectedServices | Step::Confirmation => None,
        }
    }

    /// Button tokens accepted by steps driven by a fixed keyboard.
    pub fn choices(self) -> &'static [&'static str] {
        match self {
            Step::RequestType => &["import", "export"],
            Step::ContainerSize => &["20", "20HC", "40", "40HC", "45"],
            Step::ContainerState => &["loaded", "empty"],
            Step::TransportType => &["auto", "wagon"],
            _ => &[],
        }
    }
}
