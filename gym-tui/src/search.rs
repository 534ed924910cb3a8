//! Search highlight segmentation
//!
//! Splits a cell value into plain and highlighted segments so the table
//! can style every case-insensitive occurrence of the search string. An
//! empty query returns the text untouched as a single plain segment.

/// One run of a cell value, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Split `text` around every case-insensitive occurrence of `query`.
///
/// Matching runs over a lowercased copy while offsets map back into the
/// original string, so the original casing is preserved in the output.
pub fn highlight_segments(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() || text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let needle = query.to_lowercase();

    // lowered byte index -> original byte offset of the source char
    let mut lowered = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    for (orig_idx, ch) in text.char_indices() {
        for lc in ch.to_lowercase() {
            lowered.push(lc);
            offsets.resize(lowered.len(), orig_idx);
        }
    }
    offsets.push(text.len());

    let mut segments = Vec::new();
    let mut cursor = 0; // lowered byte offset
    while let Some(found) = lowered[cursor..].find(&needle) {
        let start = cursor + found;
        let end = start + needle.len();
        let orig_start = offsets[start];
        let orig_end = offsets[end];
        if orig_end <= orig_start {
            // match ends inside a multi-byte lowercase expansion; stop
            // rather than emit an empty or inverted segment
            break;
        }
        if offsets[cursor] < orig_start {
            segments.push(Segment::plain(&text[offsets[cursor]..orig_start]));
        }
        segments.push(Segment::marked(&text[orig_start..orig_end]));
        cursor = end;
    }
    if offsets[cursor] < text.len() {
        segments.push(Segment::plain(&text[offsets[cursor]..]));
    }
    if segments.is_empty() {
        return vec![Segment::plain(text)];
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_returns_text_unchanged() {
        assert_eq!(
            highlight_segments("Ana Silva", ""),
            vec![Segment::plain("Ana Silva")]
        );
    }

    #[test]
    fn no_match_returns_single_plain_segment() {
        assert_eq!(
            highlight_segments("Ana Silva", "zzz"),
            vec![Segment::plain("Ana Silva")]
        );
    }

    #[test]
    fn highlights_all_occurrences_not_just_the_first() {
        let segments = highlight_segments("ana banana", "an");
        assert_eq!(
            segments,
            vec![
                Segment::marked("an"),
                Segment::plain("a b"),
                Segment::marked("an"),
                Segment::marked("an"),
                Segment::plain("a"),
            ]
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_preserves_original_casing() {
        let segments = highlight_segments("Ana Silva", "AN");
        assert_eq!(
            segments,
            vec![Segment::marked("An"), Segment::plain("a Silva")]
        );
    }

    #[test]
    fn segments_reassemble_to_the_original_text() {
        let text = "ana@example.com";
        let joined: String = highlight_segments(text, "a")
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(joined, text);
    }
}
