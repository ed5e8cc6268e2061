use std::collections::HashMap;

/// Handle to an interned string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringId(usize);

/// Interns identifier names, number spellings and string contents
///
/// Equal text always yields the same `StringId`, so leaf payloads can be
/// compared without touching the underlying strings.
#[derive(Debug, Clone, Default)]
pub struct StringStorage {
    strings: Vec<String>,
    index: HashMap<String, StringId>,
}

impl StringStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the existing id if it was seen before
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.index.get(s) {
            return id;
        }

        let id = StringId(self.strings.len());
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), id);
        id
    }

    pub fn resolve(&self, id: StringId) -> &str {
        &self.strings[id.0]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
