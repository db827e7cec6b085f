//! XML attribute form.
//!
//! Each type writes only the attributes it uses:
//!
//! ```xml
//! <ImageSizeReducer type="crop" width="200" height="200" gravity="4"/>
//! <ImageSizeReducer type="resize" width="640" height="480"/>
//! <ImageSizeReducer type="long" landscape="1024" portrait="768"/>
//! ```
//!
//! On input `type` may also be the numeric code, and `gravity` a code or a
//! kebab-case name. Parsing never fails loudly: anything unusable yields
//! `None`.

use super::{ImageSizeReducer, ReducerType};
use crate::drawing::Gravity;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::collections::BTreeMap;
use std::io;
use thiserror::Error;

pub const ELEMENT: &str = "ImageSizeReducer";
pub const COLLECTION_ELEMENT: &str = "ImageSizeReducers";

#[derive(Error, Debug)]
pub enum ReducerXmlError {
    #[error("XML write error: {0}")]
    Write(String),
    #[error("XML output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ImageSizeReducer {
    /// A single self-closing `<ImageSizeReducer .../>` element.
    pub fn to_xml(&self) -> Result<String, ReducerXmlError> {
        let mut writer = Writer::new(Vec::new());
        self.write_xml(&mut writer, ELEMENT)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Write this reducer as an empty element called `element_name`.
    pub fn write_xml<W: io::Write>(
        &self,
        writer: &mut Writer<W>,
        element_name: &str,
    ) -> Result<(), ReducerXmlError> {
        let mut elem = BytesStart::new(element_name);
        for (key, value) in self.xml_attributes() {
            elem.push_attribute((key, value.as_str()));
        }
        write_event(writer, Event::Empty(elem))
    }

    fn xml_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("type", self.kind.xml_name().to_string())];
        match self.kind {
            ReducerType::Crop => {
                attrs.push(("width", self.width.to_string()));
                attrs.push(("height", self.height.to_string()));
                attrs.push(("gravity", self.gravity.code().to_string()));
            }
            ReducerType::Resize => {
                attrs.push(("width", self.width.to_string()));
                attrs.push(("height", self.height.to_string()));
            }
            ReducerType::LongSide | ReducerType::ShortSide => {
                attrs.push(("landscape", self.landscape.to_string()));
                attrs.push(("portrait", self.portrait.to_string()));
            }
        }
        attrs
    }

    pub fn try_parse_xml(text: &str) -> Option<Self> {
        try_parse_xml(text)
    }
}

pub(crate) fn write_event<W: io::Write>(
    writer: &mut Writer<W>,
    event: Event<'_>,
) -> Result<(), ReducerXmlError> {
    writer
        .write_event(event)
        .map_err(|e| ReducerXmlError::Write(e.to_string()))
}

pub(crate) fn start(name: &str) -> Event<'_> {
    Event::Start(BytesStart::new(name))
}

pub(crate) fn end(name: &str) -> Event<'_> {
    Event::End(BytesEnd::new(name))
}

/// Parse the first element of `text`, whatever its name.
pub fn try_parse_xml(text: &str) -> Option<ImageSizeReducer> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return from_attributes(&attributes(&e)?);
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// Attribute maps of every `element_name` element in `text`, in document
/// order. Stops at the first syntax error, keeping what was read so far.
pub(crate) fn elements_named(text: &str, element_name: &str) -> Vec<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(text);
    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.name().as_ref() == element_name.as_bytes() =>
            {
                match attributes(&e) {
                    Some(attrs) => found.push(attrs),
                    None => tracing::warn!("skipping {element_name} with malformed attributes"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "stopped reading reducer XML"
                );
                break;
            }
            Ok(_) => {}
        }
    }
    found
}

fn attributes(elem: &BytesStart<'_>) -> Option<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for attr in elem.attributes() {
        let attr = attr.ok()?;
        let key = std::str::from_utf8(attr.key.as_ref()).ok()?.to_string();
        let value = attr.unescape_value().ok()?.into_owned();
        map.insert(key, value);
    }
    Some(map)
}

pub(crate) fn from_attributes(attrs: &BTreeMap<String, String>) -> Option<ImageSizeReducer> {
    let kind = ReducerType::parse(attrs.get("type")?)?;
    let int = |key: &str| attrs.get(key)?.trim().parse::<i64>().ok();
    let reducer = match kind {
        ReducerType::Crop => {
            let gravity = attrs
                .get("gravity")
                .and_then(|g| Gravity::parse(g))
                .unwrap_or_default();
            ImageSizeReducer::cropper(int("width")?, int("height")?, gravity)
        }
        ReducerType::Resize => ImageSizeReducer::resizer(int("width")?, int("height")?),
        ReducerType::LongSide => ImageSizeReducer::long_side(int("landscape")?, int("portrait")?),
        ReducerType::ShortSide => ImageSizeReducer::short_side(int("landscape")?, int("portrait")?),
    };
    reducer.ok()
}
