use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset/limit envelope shared by every list endpoint of the terminal API.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServiceType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub service_type: ServiceType,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContainerInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Company {
    pub name: String,
}

/// One visit of a container to the terminal. `exit_time == None` means it is still on site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContainerRecord {
    pub id: i64,
    pub container: ContainerInfo,
    #[serde(default)]
    pub exit_time: Option<String>,
    #[serde(default)]
    pub entry_time: Option<String>,
    #[serde(default)]
    pub container_state: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub images: Vec<Value>,
    #[serde(default)]
    pub documents: Vec<Value>,
}

impl ContainerRecord {
    pub fn is_active(&self) -> bool {
        self.exit_time.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRef {
    pub id: i64,
}

/// Body of `containers/container_visit_register/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerRegistration {
    pub container_size: String,
    pub container_name: String,
    pub container_state: String,
    pub product_name: String,
    pub company_id: i64,
    pub container_owner: String,
    pub transport_type: String,
    pub transport_number: String,
    pub entry_time: String,
    pub services: Vec<ServiceRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOutcome {
    pub created: bool,
    pub body: Value,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub image: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Document {
    pub id: i64,
    pub document: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Statistics {
    #[serde(default)]
    pub total_containers: u64,
    #[serde(default)]
    pub loaded_containers: u64,
    #[serde(default)]
    pub empty_containers: u64,
    #[serde(default)]
    pub total_active_containers: u64,
    #[serde(default)]
    pub total_dispatched_containers: u64,
    #[serde(default)]
    pub new_arrived_containers: u64,
}
