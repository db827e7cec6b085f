//! Ordered lists of reducers, as stored in JSON and XML documents.
//!
//! Reading is forgiving: entries that do not describe a valid reducer are
//! skipped with a warning so one bad preset does not discard the rest.

use super::xml::{self, COLLECTION_ELEMENT, ELEMENT, ReducerXmlError};
use super::{ImageSizeReducer, record};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSizeReducerCollection(Vec<ImageSizeReducer>);

impl ImageSizeReducerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reducer: ImageSizeReducer) {
        self.0.push(reducer);
    }

    pub fn get(&self, index: usize) -> Option<&ImageSizeReducer> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageSizeReducer> {
        self.0.iter()
    }

    /// JSON array of records.
    pub fn to_json(&self) -> String {
        let items: Vec<String> = self.0.iter().map(ImageSizeReducer::to_json).collect();
        format!("[{}]", items.join(","))
    }

    /// Accepts an array of records or an object whose values are records.
    pub fn from_value(value: &Value) -> Self {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => return Self::new(),
        };
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let parsed = record::try_parse(item);
                if parsed.is_none() {
                    tracing::warn!(index, entry = %item, "skipping invalid reducer record");
                }
                parsed
            })
            .collect()
    }

    /// Empty when `text` is not JSON.
    pub fn parse_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "reducer collection is not valid JSON");
                Self::new()
            }
        }
    }

    pub fn to_xml(&self) -> Result<String, ReducerXmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_xml(&mut writer, Some(COLLECTION_ELEMENT))?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Write every reducer as an `<ImageSizeReducer/>` element, wrapped in
    /// `wrapper` when given.
    pub fn write_xml<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        wrapper: Option<&str>,
    ) -> Result<(), ReducerXmlError> {
        if let Some(name) = wrapper {
            xml::write_event(writer, xml::start(name))?;
        }
        for reducer in &self.0 {
            reducer.write_xml(writer, ELEMENT)?;
        }
        if let Some(name) = wrapper {
            xml::write_event(writer, xml::end(name))?;
        }
        Ok(())
    }

    /// Every `<ImageSizeReducer>` element anywhere in `text`.
    pub fn parse_xml(text: &str) -> Self {
        xml::elements_named(text, ELEMENT)
            .iter()
            .enumerate()
            .filter_map(|(index, attrs)| {
                let parsed = xml::from_attributes(attrs);
                if parsed.is_none() {
                    tracing::warn!(index, ?attrs, "skipping invalid reducer element");
                }
                parsed
            })
            .collect()
    }
}

impl FromIterator<ImageSizeReducer> for ImageSizeReducerCollection {
    fn from_iter<I: IntoIterator<Item = ImageSizeReducer>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ImageSizeReducerCollection {
    type Item = ImageSizeReducer;
    type IntoIter = std::vec::IntoIter<ImageSizeReducer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ImageSizeReducerCollection {
    type Item = &'a ImageSizeReducer;
    type IntoIter = std::slice::Iter<'a, ImageSizeReducer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ImageSizeReducerCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
