/// Services picked on the services step: ids and their display names, kept index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    ids: Vec<i64>,
    names: Vec<String>,
}

impl ServiceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the service, or removes it when already selected. Returns whether it is selected now.
    ///
    /// Removal drops the id and the first name equal to `name`, so two services sharing a display
    /// name may lose the other one's label.
    pub fn toggle(&mut self, id: i64, name: &str) -> bool {
        match self.ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                self.ids.remove(index);
                if let Some(name_index) = self.names.iter().position(|n| n == name) {
                    self.names.remove(name_index);
                }
                false
            }
            None => {
                self.ids.push(id);
                self.names.push(name.to_string());
                true
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.names.clear();
    }
}
