//! Structural and value events surfaced by the [`StreamParser`].
//!
//! [`StreamParser`]: crate::StreamParser

/// One notification from the streaming parser.
///
/// Commas and colons are never surfaced; they are consumed silently as
/// structural noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Event {
    /// `{` was consumed and an object context opened.
    StartObject,
    /// `[` was consumed and an array context opened.
    StartArray,
    /// An object member name was consumed together with its `:`. The key
    /// text is available through
    /// [`string_value`](crate::StreamParser::string_value).
    KeyName,
    /// A string value. Text available through `string_value`.
    ValueString,
    /// A numeric value, integer or decimal. Readable as its original text
    /// or through the numeric accessors.
    ValueNumber,
    /// The keyword `true`.
    ValueTrue,
    /// The keyword `false`.
    ValueFalse,
    /// The keyword `null`.
    ValueNull,
    /// `}` was consumed. The closed context stays inspectable until the
    /// next cursor advance.
    EndObject,
    /// `]` was consumed, with the same deferred-pop behavior as
    /// [`EndObject`](Event::EndObject).
    EndArray,
}

impl Event {
    /// Returns `true` for [`EndObject`] and [`EndArray`].
    ///
    /// [`EndObject`]: Event::EndObject
    /// [`EndArray`]: Event::EndArray
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }
}

/// Kind of an open JSON structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    /// `{` … `}`
    Object,
    /// `[` … `]`
    Array,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let events = vec![
            Event::StartObject,
            Event::KeyName,
            Event::ValueNumber,
            Event::EndObject,
        ];
        let text = serde_json::to_string(&events).unwrap();
        let back: Vec<Event> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, events);
    }

    #[test]
    fn end_events() {
        assert!(Event::EndObject.is_end());
        assert!(Event::EndArray.is_end());
        assert!(!Event::ValueNull.is_end());
    }
}
