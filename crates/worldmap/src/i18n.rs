use std::collections::HashMap;

use crate::vfs::dirname;

/// Msgid of the title shown for levels whose file could not be read.
pub const NO_TITLE_MSGID: &str = "<no title>";

pub trait Localization {
    /// Makes the catalog next to `path` the active one for subsequent lookups.
    fn register_translation_directory(&mut self, path: &str);
    fn translate(&self, msgid: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    directories: Vec<String>,
    messages: HashMap<String, String>,
}

impl TranslationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: HashMap<String, String>) -> Self {
        Self {
            directories: Vec::new(),
            messages,
        }
    }

    pub fn insert(&mut self, msgid: impl Into<String>, msgstr: impl Into<String>) {
        self.messages.insert(msgid.into(), msgstr.into());
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }
}

impl Localization for TranslationCatalog {
    fn register_translation_directory(&mut self, path: &str) {
        let directory = dirname(path);
        if !self.directories.contains(&directory) {
            self.directories.push(directory);
        }
    }

    fn translate(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_each_directory_once() {
        let mut catalog = TranslationCatalog::new();
        catalog.register_translation_directory("levels/world1/worldmap.stwm");
        catalog.register_translation_directory("levels/world1/a.stl");
        catalog.register_translation_directory("b.stl");
        assert_eq!(catalog.directories(), ["levels/world1/", "./"]);
    }

    #[test]
    fn unknown_msgid_translates_to_itself() {
        let mut catalog = TranslationCatalog::new();
        catalog.insert(NO_TITLE_MSGID, "<kein Titel>");
        assert_eq!(catalog.translate(NO_TITLE_MSGID), "<kein Titel>");
        assert_eq!(catalog.translate("Icy Island"), "Icy Island");
    }
}
