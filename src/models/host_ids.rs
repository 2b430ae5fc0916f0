//! Bidirectional mapping between host entry names and catalog ids

use std::collections::HashMap;

use block_match::EntryId;

use crate::error::ConfigError;

/// Maps host names like `minecraft:stone` to dense catalog ids and back.
///
/// Ids are handed out in insertion order starting at 0, so they can be used
/// directly as catalog entry ids. Both directions are O(1).
#[derive(Debug, Clone, Default)]
pub struct HostIdMap {
    names: Vec<String>,
    ids: HashMap<String, EntryId>,
    fallback: Option<EntryId>,
}

impl HostIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name and return its id
    pub fn insert(&mut self, name: &str) -> Result<EntryId, ConfigError> {
        if self.ids.contains_key(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }
        let id = self.names.len() as EntryId;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Use `name` for lookups of unknown names
    pub fn set_fallback(&mut self, name: &str) -> Result<EntryId, ConfigError> {
        let id = self
            .id_of(name)
            .ok_or_else(|| ConfigError::UnknownEntry(name.to_string()))?;
        self.fallback = Some(id);
        Ok(id)
    }

    pub fn fallback(&self) -> Option<EntryId> {
        self.fallback
    }

    pub fn id_of(&self, name: &str) -> Option<EntryId> {
        self.ids.get(name).copied()
    }

    /// Id of `name`, or the fallback id for unknown names
    pub fn resolve(&self, name: &str) -> Option<EntryId> {
        self.id_of(name).or(self.fallback)
    }

    pub fn name_of(&self, id: EntryId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Ids for a list of names, failing on the first unknown one
    pub fn ids_of<'a, I>(&self, names: I) -> Result<Vec<EntryId>, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| {
                self.id_of(name)
                    .ok_or_else(|| ConfigError::UnknownEntry(name.to_string()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All `(id, name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (i as EntryId, name.as_str()))
    }
}
