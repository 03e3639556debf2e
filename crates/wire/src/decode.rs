use crate::event::{
    StreamEvent, TOOL_END_CLOSE, TOOL_END_OPEN, TOOL_START_CLOSE,
    TOOL_START_OPEN,
};

const MARKER_TOKENS: [&str; 4] = [
    TOOL_START_OPEN,
    TOOL_START_CLOSE,
    TOOL_END_OPEN,
    TOOL_END_CLOSE,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    #[inline]
    fn open(self) -> &'static str {
        match self {
            MarkerKind::Start => TOOL_START_OPEN,
            MarkerKind::End => TOOL_END_OPEN,
        }
    }

    #[inline]
    fn close(self) -> &'static str {
        match self {
            MarkerKind::Start => TOOL_START_CLOSE,
            MarkerKind::End => TOOL_END_CLOSE,
        }
    }

    #[inline]
    fn into_event(self, name: String) -> StreamEvent {
        match self {
            MarkerKind::Start => StreamEvent::ToolStarted(name),
            MarkerKind::End => StreamEvent::ToolFinished(name),
        }
    }
}

/// An incremental parser for the wire protocol.
///
/// The decoder consumes the raw stream in arbitrarily-sized chunks: a
/// single chunk may contain zero, one, or many complete events, and may
/// split a marker token at any byte offset. Text is surfaced as soon as
/// it is known not to be part of a marker; only an ambiguous tail (an
/// unterminated marker, or a suffix that is still a prefix of some
/// marker token) is retained for the next chunk.
///
/// One decoder instance serves exactly one stream. Create a fresh value
/// per connection and drop it at stream end.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: String,
}

impl Decoder {
    /// Creates a decoder with an empty buffer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk to the buffer and returns every event that is
    /// now settled.
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buf.push_str(chunk);

        let mut events = Vec::new();
        loop {
            let Some((idx, kind)) = earliest_open_marker(&self.buf) else {
                // No opening marker anywhere. Everything except a tail
                // that could still grow into a marker token is settled
                // literal text.
                let settled = ambiguous_tail_start(&self.buf)
                    .unwrap_or(self.buf.len());
                if settled > 0 {
                    events.push(StreamEvent::TextChunk(
                        self.buf[..settled].to_owned(),
                    ));
                    self.buf.drain(..settled);
                }
                break;
            };

            let name_start = idx + kind.open().len();
            let Some(rel) = self.buf[name_start..].find(kind.close()) else {
                // An opening marker without its close yet. The text
                // before the marker is settled; the marker itself has
                // to wait for more data.
                if idx > 0 {
                    events
                        .push(StreamEvent::TextChunk(self.buf[..idx].to_owned()));
                    self.buf.drain(..idx);
                }
                break;
            };

            let name_end = name_start + rel;
            if idx > 0 {
                events.push(StreamEvent::TextChunk(self.buf[..idx].to_owned()));
            }
            let name = self.buf[name_start..name_end].to_owned();
            events.push(kind.into_event(name));
            self.buf.drain(..name_end + kind.close().len());
        }
        events
    }

    /// Consumes the decoder at end of stream, flushing whatever is left
    /// in the buffer as literal text.
    ///
    /// A stream that ends mid-marker is malformed, but the partial
    /// marker is surfaced as text rather than an error.
    #[inline]
    pub fn finish(self) -> Option<StreamEvent> {
        if self.buf.is_empty() {
            None
        } else {
            Some(StreamEvent::TextChunk(self.buf))
        }
    }
}

/// Merges adjacent text chunks and drops empty ones.
///
/// The decoder emits text eagerly, so the granularity of `TextChunk`
/// events depends on how the stream was chunked. Coalescing normalizes
/// a sequence to what a rendering client effectively displays.
pub fn coalesce<I>(events: I) -> Vec<StreamEvent>
where
    I: IntoIterator<Item = StreamEvent>,
{
    let mut out: Vec<StreamEvent> = Vec::new();
    for event in events {
        match event {
            StreamEvent::TextChunk(text) => {
                if text.is_empty() {
                    continue;
                }
                if let Some(StreamEvent::TextChunk(prev)) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(StreamEvent::TextChunk(text));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Finds the earliest occurrence of a complete opening marker token.
fn earliest_open_marker(buf: &str) -> Option<(usize, MarkerKind)> {
    let start = buf.find(TOOL_START_OPEN);
    let end = buf.find(TOOL_END_OPEN);
    match (start, end) {
        (Some(s), Some(e)) if s <= e => Some((s, MarkerKind::Start)),
        (Some(_), Some(e)) => Some((e, MarkerKind::End)),
        (Some(s), None) => Some((s, MarkerKind::Start)),
        (None, Some(e)) => Some((e, MarkerKind::End)),
        (None, None) => None,
    }
}

/// Returns the position of the earliest buffer suffix that is a proper
/// prefix of some marker token, if any.
///
/// Only a suffix can be ambiguous: a would-be token that is followed by
/// non-matching bytes is already settled as literal text.
fn ambiguous_tail_start(buf: &str) -> Option<usize> {
    let longest = TOOL_START_CLOSE.len();
    let lo = buf.len().saturating_sub(longest - 1);
    let bytes = buf.as_bytes();
    // Marker tokens are pure ASCII, so a `[` byte is always a char
    // boundary.
    (lo..buf.len())
        .find(|&k| bytes[k] == b'[' && is_marker_token_prefix(&buf[k..]))
}

#[inline]
fn is_marker_token_prefix(s: &str) -> bool {
    MARKER_TOKENS
        .iter()
        .any(|token| token.len() > s.len() && token.starts_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn decode_chunks<'a, I>(chunks: I) -> Vec<StreamEvent>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut decoder = Decoder::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.feed(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    fn sample_events() -> Vec<StreamEvent> {
        vec![
            StreamEvent::ToolStarted("get_race_results".to_owned()),
            StreamEvent::ToolFinished("get_race_results".to_owned()),
            StreamEvent::TextChunk("Verstappen won the race.".to_owned()),
        ]
    }

    #[test]
    fn test_whole_stream_round_trip() {
        let events = sample_events();
        let stream = encode(&events);
        assert_eq!(coalesce(decode_chunks([stream.as_str()])), events);
    }

    #[test]
    fn test_plain_text_passes_through() {
        let events = decode_chunks(["no markers ", "in here at all"]);
        assert_eq!(
            coalesce(events),
            vec![StreamEvent::TextChunk(
                "no markers in here at all".to_owned()
            )]
        );
    }

    #[test]
    fn test_marker_split_across_chunks() {
        let events = decode_chunks([
            "checking... [TO",
            "OL_START]look",
            "up[/TOOL_ST",
            "ART][TOOL_END]lookup[/TOOL_END]done",
        ]);
        assert_eq!(
            coalesce(events),
            vec![
                StreamEvent::TextChunk("checking... ".to_owned()),
                StreamEvent::ToolStarted("lookup".to_owned()),
                StreamEvent::ToolFinished("lookup".to_owned()),
                StreamEvent::TextChunk("done".to_owned()),
            ]
        );
    }

    #[test]
    fn test_text_surfaced_before_marker_completes() {
        let mut decoder = Decoder::new();
        let events = decoder.feed("Hello [TOOL_ST");
        // The settled prefix must come out now, not at end of stream.
        assert_eq!(events, vec![StreamEvent::TextChunk("Hello ".to_owned())]);
    }

    #[test]
    fn test_false_marker_prefix_resolves_to_text() {
        let mut decoder = Decoder::new();
        assert_eq!(
            decoder.feed("a[TOOL"),
            vec![StreamEvent::TextChunk("a".to_owned())]
        );
        // `[TOOL_X` can no longer become a marker token.
        assert_eq!(
            decoder.feed("_Xyz"),
            vec![StreamEvent::TextChunk("[TOOL_Xyz".to_owned())]
        );
    }

    #[test]
    fn test_partial_marker_at_eof_is_flushed_as_text() {
        let mut decoder = Decoder::new();
        assert_eq!(
            decoder.feed("abc[TOOL_STA"),
            vec![StreamEvent::TextChunk("abc".to_owned())]
        );
        assert_eq!(
            decoder.finish(),
            Some(StreamEvent::TextChunk("[TOOL_STA".to_owned()))
        );
    }

    #[test]
    fn test_unterminated_marker_at_eof_is_flushed_as_text() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed("[TOOL_START]lookup").is_empty());
        assert_eq!(
            decoder.finish(),
            Some(StreamEvent::TextChunk("[TOOL_START]lookup".to_owned()))
        );
    }

    #[test]
    fn test_stray_close_token_is_text() {
        let events = decode_chunks(["a[/TOOL_S", "TART]b"]);
        assert_eq!(
            coalesce(events),
            vec![StreamEvent::TextChunk("a[/TOOL_START]b".to_owned())]
        );
    }

    #[test]
    fn test_empty_tool_name() {
        let events = decode_chunks(["[TOOL_START][/TOOL_START]"]);
        assert_eq!(events, vec![StreamEvent::ToolStarted(String::new())]);
    }

    #[test]
    fn test_single_byte_chunks() {
        // A 40-character stream containing one tool-started marker,
        // fed as 40 one-character chunks.
        let stream = "pre[TOOL_START]x[/TOOL_START]postamble!!";
        assert_eq!(stream.len(), 40);

        let whole = coalesce(decode_chunks([stream]));
        let chunks: Vec<String> =
            stream.chars().map(|c| c.to_string()).collect();
        let byte_by_byte =
            coalesce(decode_chunks(chunks.iter().map(String::as_str)));
        assert_eq!(byte_by_byte, whole);
        assert_eq!(
            whole,
            vec![
                StreamEvent::TextChunk("pre".to_owned()),
                StreamEvent::ToolStarted("x".to_owned()),
                StreamEvent::TextChunk("postamble!!".to_owned()),
            ]
        );
    }

    #[test]
    fn test_chunk_invariance_at_every_split_offset() {
        let events = vec![
            StreamEvent::TextChunk("Let me check. ".to_owned()),
            StreamEvent::ToolStarted("lookup".to_owned()),
            StreamEvent::ToolFinished("lookup".to_owned()),
            StreamEvent::TextChunk("Résumé: P1 — Verstappen.".to_owned()),
        ];
        let stream = encode(&events);
        let whole = coalesce(decode_chunks([stream.as_str()]));
        assert_eq!(whole, events);

        for (offset, _) in stream.char_indices().skip(1) {
            let split = coalesce(decode_chunks([
                &stream[..offset],
                &stream[offset..],
            ]));
            assert_eq!(split, whole, "split at byte offset {offset}");
        }
    }

    #[test]
    fn test_chunk_invariance_for_three_way_splits() {
        let stream = "[TOOL_START]a[/TOOL_START]x[TOOL_END]a[/TOOL_END]";
        let whole = coalesce(decode_chunks([stream]));

        let offsets: Vec<usize> = (1..stream.len()).collect();
        for (i, &first) in offsets.iter().enumerate() {
            for &second in &offsets[i + 1..] {
                let split = coalesce(decode_chunks([
                    &stream[..first],
                    &stream[first..second],
                    &stream[second..],
                ]));
                assert_eq!(split, whole, "splits at {first}/{second}");
            }
        }
    }

    #[test]
    fn test_coalesce_merges_adjacent_text() {
        let events = vec![
            StreamEvent::TextChunk("a".to_owned()),
            StreamEvent::TextChunk(String::new()),
            StreamEvent::TextChunk("b".to_owned()),
            StreamEvent::ToolStarted("t".to_owned()),
            StreamEvent::TextChunk("c".to_owned()),
        ];
        assert_eq!(
            coalesce(events),
            vec![
                StreamEvent::TextChunk("ab".to_owned()),
                StreamEvent::ToolStarted("t".to_owned()),
                StreamEvent::TextChunk("c".to_owned()),
            ]
        );
    }
}
