//! Label-driven parsing of property boxes
//!
//! Detail pages list properties as free text such as `Количество комнат: 3`.
//! Parsing is by substring match on locale-specific label fragments, so each
//! source supplies its own `LabelSet`. Every field parse is a pure function
//! returning a tagged value; the caller decides what to log.

use crate::sources::traits::PropertyDetails;
use crate::storage::RentalKind;

/// Outcome of parsing one field out of a property box
#[derive(Debug, Clone, PartialEq)]
pub enum FieldParse<T> {
    /// The label matched and the value parsed
    Parsed(T),
    /// The label matched but the value did not parse; carries the raw text
    Malformed(String),
    /// The label is not in this box
    NotPresent,
}

/// Label fragments a source uses on its detail pages
#[derive(Debug, Clone, Copy)]
pub struct LabelSet {
    /// Fragment marking the dwelling-type box
    pub kind_label: &'static str,
    /// Values of the dwelling-type box that mean a house
    pub house_fragments: &'static [&'static str],
    /// Values of the dwelling-type box that mean an apartment
    pub apartment_fragments: &'static [&'static str],
    /// Fragment marking the room-count box
    pub room_label: &'static str,
    /// Fragment marking the floor-count box
    pub floor_label: &'static str,
}

/// Parses the dwelling type from a box carrying the kind label
pub fn parse_kind(text: &str, labels: &LabelSet) -> FieldParse<RentalKind> {
    if !text.contains(labels.kind_label) {
        return FieldParse::NotPresent;
    }
    let value = value_after_label(text, labels.kind_label);
    if labels.house_fragments.iter().any(|f| value.contains(f)) {
        FieldParse::Parsed(RentalKind::House)
    } else if labels.apartment_fragments.iter().any(|f| value.contains(f)) {
        FieldParse::Parsed(RentalKind::Apartment)
    } else {
        FieldParse::Malformed(text.trim().to_string())
    }
}

/// Parses a `label: number` box
///
/// The value is the text after the last `:`; its leading whitespace-separated
/// token must be an integer (`3`, `3 комнаты`).
pub fn parse_labelled_count(text: &str, label: &str) -> FieldParse<u32> {
    if !text.contains(label) {
        return FieldParse::NotPresent;
    }
    let value = text.rsplit(':').next().unwrap_or("").trim();
    match value.split_whitespace().next().map(str::parse::<u32>) {
        Some(Ok(count)) => FieldParse::Parsed(count),
        _ => FieldParse::Malformed(text.trim().to_string()),
    }
}

/// Parses every property box into structured fields
///
/// Boxes are checked in document order. Within a box the dwelling-type label
/// is checked first and, when it matches, the room and floor checks are
/// skipped for that box. Malformed values are logged and left unset.
pub fn parse_property_boxes(boxes: &[String], labels: &LabelSet) -> PropertyDetails {
    let mut details = PropertyDetails::default();

    for text in boxes {
        match parse_kind(text, labels) {
            FieldParse::Parsed(kind) => {
                details.kind = Some(kind);
                continue;
            }
            FieldParse::Malformed(raw) => {
                tracing::warn!("Unknown rental kind: {:?}", raw);
                continue;
            }
            FieldParse::NotPresent => {}
        }

        match parse_labelled_count(text, labels.room_label) {
            FieldParse::Parsed(count) => {
                details.room_count = Some(count);
                continue;
            }
            FieldParse::Malformed(raw) => {
                tracing::warn!("Malformed room count: {:?}", raw);
                continue;
            }
            FieldParse::NotPresent => {}
        }

        match parse_labelled_count(text, labels.floor_label) {
            FieldParse::Parsed(count) => details.floor_count = Some(count),
            FieldParse::Malformed(raw) => tracing::warn!("Malformed floor count: {:?}", raw),
            FieldParse::NotPresent => {}
        }
    }

    details
}

fn value_after_label<'a>(text: &'a str, label: &str) -> &'a str {
    match text.find(label) {
        Some(pos) => text[pos + label.len()..].trim_start_matches([':', ' ']),
        None => text,
    }
}
