use std::fmt;
use std::str::FromStr;

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::vfs::{FileSystem, FileSystemError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    File(#[from] FileSystemError),
    #[error("malformed document {path} at {location}: {message}")]
    Malformed {
        path: String,
        message: String,
        location: SourceLocation,
    },
    #[error("invalid value '{value}' for '{key}' in {path} at {location}; expected {expected}")]
    InvalidValue {
        path: String,
        key: String,
        value: String,
        expected: &'static str,
        location: SourceLocation,
    },
    #[error("missing required field '{key}' in {path} at {location}")]
    MissingField {
        path: String,
        key: String,
        location: SourceLocation,
    },
}

/// Owned element of a parsed document.
///
/// Attributes and child elements are both addressable as mapping keys; only
/// child elements take part in ordered iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<ReaderElement>,
    location: SourceLocation,
}

impl ReaderElement {
    fn from_node(doc: &Document<'_>, node: Node<'_, '_>) -> Self {
        let pos = doc.text_pos_at(node.range().start);
        let text = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect::<String>()
            .trim()
            .to_string();
        Self {
            name: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            text,
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(|child| Self::from_node(doc, child))
                .collect(),
            location: SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

#[derive(Debug, Clone)]
pub struct ReaderDocument {
    path: String,
    root: ReaderElement,
}

impl ReaderDocument {
    pub fn parse(path: &str, raw: &str) -> Result<Self, ReaderError> {
        let doc = Document::parse(raw).map_err(|error| ReaderError::Malformed {
            path: path.to_string(),
            message: error.to_string(),
            location: SourceLocation {
                line: error.pos().row as usize,
                column: error.pos().col as usize,
            },
        })?;
        Ok(Self {
            path: path.to_string(),
            root: ReaderElement::from_node(&doc, doc.root_element()),
        })
    }

    pub fn from_file(fs: &dyn FileSystem, path: &str) -> Result<Self, ReaderError> {
        let raw = fs.read_to_string(path)?;
        Self::parse(path, &raw)
    }

    pub fn root(&self) -> ReaderObject<'_> {
        ReaderObject {
            path: &self.path,
            element: &self.root,
        }
    }
}

/// A named node together with its mapping.
#[derive(Debug, Clone, Copy)]
pub struct ReaderObject<'a> {
    path: &'a str,
    element: &'a ReaderElement,
}

impl<'a> ReaderObject<'a> {
    pub fn name(&self) -> &'a str {
        &self.element.name
    }

    pub fn mapping(&self) -> ReaderMapping<'a> {
        ReaderMapping {
            path: self.path,
            element: self.element,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReaderMapping<'a> {
    path: &'a str,
    element: &'a ReaderElement,
}

impl<'a> ReaderMapping<'a> {
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn location(&self) -> SourceLocation {
        self.element.location
    }

    /// Text of `key`, looked up in attributes first, then in the first child
    /// element with that tag.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.raw(key).map(|(value, _)| value.to_string())
    }

    /// Every value stored under `key`, in document order.
    pub fn get_all_strings(&self, key: &str) -> Vec<String> {
        let mut values = self
            .element
            .attributes
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .collect::<Vec<_>>();
        values.extend(
            self.element
                .children
                .iter()
                .filter(|child| child.name == key)
                .map(|child| child.text.clone()),
        );
        values
    }

    pub fn require_string(&self, key: &str) -> Result<String, ReaderError> {
        self.get_string(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ReaderError::MissingField {
                path: self.path.to_string(),
                key: key.to_string(),
                location: self.element.location,
            })
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ReaderError> {
        let Some((value, location)) = self.raw(key) else {
            return Ok(None);
        };
        match value {
            "true" | "#t" | "1" => Ok(Some(true)),
            "false" | "#f" | "0" => Ok(Some(false)),
            _ => Err(self.invalid(key, value, "a boolean", location)),
        }
    }

    pub fn get_i32(&self, key: &str) -> Result<Option<i32>, ReaderError> {
        self.parse_scalar(key, "an integer")
    }

    pub fn get_u32(&self, key: &str) -> Result<Option<u32>, ReaderError> {
        self.parse_scalar(key, "a non-negative integer")
    }

    pub fn get_f32(&self, key: &str) -> Result<Option<f32>, ReaderError> {
        let value = self.parse_scalar::<f32>(key, "a number")?;
        match value {
            Some(number) if !number.is_finite() => {
                let (raw, location) = self.raw(key).unwrap_or(("", self.element.location));
                Err(self.invalid(key, raw, "a finite number", location))
            }
            other => Ok(other),
        }
    }

    pub fn get_f32_list(&self, key: &str) -> Result<Option<Vec<f32>>, ReaderError> {
        self.parse_list(key, "a list of numbers")
    }

    pub fn get_u32_list(&self, key: &str) -> Result<Option<Vec<u32>>, ReaderError> {
        self.parse_list(key, "a list of non-negative integers")
    }

    pub fn get_mapping(&self, key: &str) -> Option<ReaderMapping<'a>> {
        let element: &'a ReaderElement = self.element;
        element
            .children
            .iter()
            .find(|child| child.name == key)
            .map(|element| ReaderMapping {
                path: self.path,
                element,
            })
    }

    /// Child elements in document order.
    pub fn iter(&self) -> impl Iterator<Item = ReaderEntry<'a>> + 'a {
        let path = self.path;
        let element: &'a ReaderElement = self.element;
        element
            .children
            .iter()
            .map(move |element| ReaderEntry { path, element })
    }

    fn raw(&self, key: &str) -> Option<(&'a str, SourceLocation)> {
        let element: &'a ReaderElement = self.element;
        if let Some((_, value)) = element.attributes.iter().find(|(name, _)| name == key) {
            return Some((value.trim(), element.location));
        }
        element
            .children
            .iter()
            .find(|child| child.name == key)
            .map(|child| (child.text.as_str(), child.location))
    }

    fn parse_scalar<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, ReaderError> {
        let Some((value, location)) = self.raw(key) else {
            return Ok(None);
        };
        value
            .parse::<T>()
            .map(Some)
            .map_err(|_| self.invalid(key, value, expected, location))
    }

    fn parse_list<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<Vec<T>>, ReaderError> {
        let Some((value, location)) = self.raw(key) else {
            return Ok(None);
        };
        value
            .split_whitespace()
            .map(|item| {
                item.parse::<T>()
                    .map_err(|_| self.invalid(key, value, expected, location))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn invalid(
        &self,
        key: &str,
        value: &str,
        expected: &'static str,
        location: SourceLocation,
    ) -> ReaderError {
        ReaderError::InvalidValue {
            path: self.path.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            expected,
            location,
        }
    }
}

/// One child element met during ordered iteration.
#[derive(Debug, Clone, Copy)]
pub struct ReaderEntry<'a> {
    path: &'a str,
    element: &'a ReaderElement,
}

impl<'a> ReaderEntry<'a> {
    pub fn key(&self) -> &'a str {
        &self.element.name
    }

    pub fn location(&self) -> SourceLocation {
        self.element.location
    }

    pub fn as_string(&self) -> &'a str {
        &self.element.text
    }

    pub fn as_mapping(&self) -> ReaderMapping<'a> {
        ReaderMapping {
            path: self.path,
            element: self.element,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::vfs::MemoryFileSystem;

    use super::*;

    const SAMPLE: &str = r#"<root version="2">
        <name>Sample</name>
        <speed>0.5</speed>
        <flag>#t</flag>
        <color>0.1 0.2 0.3</color>
        <tag>first</tag>
        <tag>second</tag>
        <inner x="3"><y>4</y></inner>
    </root>"#;

    #[test]
    fn scalar_lookup_prefers_attributes_then_children() {
        let doc = ReaderDocument::parse("sample.xml", SAMPLE).expect("parse");
        let root = doc.root();
        assert_eq!(root.name(), "root");
        let mapping = root.mapping();
        assert_eq!(mapping.get_u32("version").expect("version"), Some(2));
        assert_eq!(mapping.get_string("name").as_deref(), Some("Sample"));
        assert_eq!(mapping.get_f32("speed").expect("speed"), Some(0.5));
        assert_eq!(mapping.get_bool("flag").expect("flag"), Some(true));
        assert_eq!(mapping.get_string("missing"), None);
        assert_eq!(mapping.get_f32("missing").expect("missing"), None);
    }

    #[test]
    fn lists_and_repeated_keys() {
        let doc = ReaderDocument::parse("sample.xml", SAMPLE).expect("parse");
        let mapping = doc.root().mapping();
        assert_eq!(
            mapping.get_f32_list("color").expect("color"),
            Some(vec![0.1, 0.2, 0.3])
        );
        assert_eq!(mapping.get_all_strings("tag"), vec!["first", "second"]);
        assert_eq!(mapping.get_string("tag").as_deref(), Some("first"));
    }

    #[test]
    fn iteration_follows_document_order() {
        let doc = ReaderDocument::parse("sample.xml", SAMPLE).expect("parse");
        let keys = doc
            .root()
            .mapping()
            .iter()
            .map(|entry| entry.key())
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["name", "speed", "flag", "color", "tag", "tag", "inner"]
        );
        let inner = doc.root().mapping().get_mapping("inner").expect("inner");
        assert_eq!(inner.get_f32("x").expect("x"), Some(3.0));
        assert_eq!(inner.get_f32("y").expect("y"), Some(4.0));
    }

    #[test]
    fn invalid_scalar_reports_location() {
        let doc = ReaderDocument::parse("bad.xml", "<root>\n<speed>fast</speed></root>")
            .expect("parse");
        let err = doc.root().mapping().get_f32("speed").expect_err("err");
        match err {
            ReaderError::InvalidValue { key, location, .. } => {
                assert_eq!(key, "speed");
                assert_eq!(location.line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn malformed_xml_reports_location() {
        let err = ReaderDocument::parse("bad.xml", "<root><open></root>").expect_err("err");
        assert!(matches!(err, ReaderError::Malformed { .. }));
    }

    #[test]
    fn missing_file_is_file_error() {
        let fs = MemoryFileSystem::new();
        let err = ReaderDocument::from_file(&fs, "nope.xml").expect_err("err");
        assert!(matches!(
            err,
            ReaderError::File(FileSystemError::NotFound { .. })
        ));
    }

    #[test]
    fn require_string_rejects_empty() {
        let doc = ReaderDocument::parse("a.xml", "<root><name></name></root>").expect("parse");
        assert!(matches!(
            doc.root().mapping().require_string("name"),
            Err(ReaderError::MissingField { .. })
        ));
    }
}
