use crate::event::{
    StreamEvent, TOOL_END_CLOSE, TOOL_END_OPEN, TOOL_START_CLOSE,
    TOOL_START_OPEN,
};

/// Serializes a single event into its wire representation, appending it
/// to `out`.
///
/// Text is emitted verbatim. The grammar has no escaping mechanism, so
/// the protocol assumes tool names and assistant text never contain the
/// literal marker tokens; tool names come from the closed registry set,
/// which keeps that assumption checkable.
pub fn encode_event(event: &StreamEvent, out: &mut String) {
    match event {
        StreamEvent::TextChunk(text) => out.push_str(text),
        StreamEvent::ToolStarted(name) => {
            out.push_str(TOOL_START_OPEN);
            out.push_str(name);
            out.push_str(TOOL_START_CLOSE);
        }
        StreamEvent::ToolFinished(name) => {
            out.push_str(TOOL_END_OPEN);
            out.push_str(name);
            out.push_str(TOOL_END_CLOSE);
        }
    }
}

/// Serializes a sequence of events into one contiguous stream.
pub fn encode<'a, I>(events: I) -> String
where
    I: IntoIterator<Item = &'a StreamEvent>,
{
    let mut out = String::new();
    for event in events {
        encode_event(event, &mut out);
    }
    out
}
