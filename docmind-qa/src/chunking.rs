//! Splitting document text into overlapping fixed-size segments.
//!
//! Overlap preserves semantic continuity across a hard split: a sentence cut
//! at a window boundary reappears at the start of the next window.

use crate::document::Segment;

/// A strategy for splitting extracted document text into [`Segment`]s.
///
/// Implementations are pure: no side effects, deterministic for given inputs.
/// Empty text yields an empty `Vec`; callers treat that as "nothing to
/// index", not as an error at this level.
pub trait Chunker: Send + Sync {
    /// Split `text` into ordered segments for the given document.
    fn chunk(&self, document_id: &str, text: &str) -> Vec<Segment>;
}

/// Splits text into windows of at most `chunk_size` characters, where each
/// window after the first begins `chunk_overlap` characters before the end of
/// the previous one.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point. Segment IDs are `{document_id}_{index}`.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of characters per segment
    /// * `chunk_overlap` — number of overlapping characters between consecutive segments
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document_id: &str, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut segments = Vec::new();
        let mut start = 0;
        let mut index = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            segments.push(Segment {
                id: format!("{document_id}_{index}"),
                text: chars[start..end].iter().collect(),
                document_id: document_id.to_string(),
            });
            index += 1;

            // The last window reaches the end of the text; a further window
            // would be a strict suffix of this one.
            if end == chars.len() {
                break;
            }
            let step = self.chunk_size.saturating_sub(self.chunk_overlap);
            if step == 0 {
                break;
            }
            start += step;
        }

        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn empty_text_yields_no_segments() {
        let chunker = FixedSizeChunker::new(1000, 100);
        assert!(chunker.chunk("doc1", "").is_empty());
    }

    #[test]
    fn short_text_yields_one_segment_equal_to_text() {
        let chunker = FixedSizeChunker::new(1000, 100);
        let segments = chunker.chunk("doc1", "a short document");
        assert_eq!(texts(&segments), vec!["a short document"]);
        assert_eq!(segments[0].id, "doc1_0");
        assert_eq!(segments[0].document_id, "doc1");
    }

    #[test]
    fn hello_world_windows_are_exact() {
        let chunker = FixedSizeChunker::new(5, 2);
        let segments = chunker.chunk("doc1", "hello world");
        assert_eq!(texts(&segments), vec!["hello", "lo wo", "world"]);
    }

    #[test]
    fn consecutive_segments_overlap_exactly() {
        let overlap = 7;
        let chunker = FixedSizeChunker::new(40, overlap);
        let text: String =
            "the quick brown fox jumps over the lazy dog and keeps on running".repeat(4);
        let segments = chunker.chunk("doc1", &text);
        assert!(segments.len() > 2);

        for pair in segments.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let next: Vec<char> = pair[1].text.chars().collect();
            let tail: String = prev[prev.len() - overlap..].iter().collect();
            let head: String = next[..overlap].iter().collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn multibyte_text_never_splits_inside_a_character() {
        let chunker = FixedSizeChunker::new(4, 1);
        let segments = chunker.chunk("doc1", "héllo wörld ünïcode");
        let rebuilt: String = segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let skip = if i == 0 { 0 } else { 1 };
                s.text.chars().skip(skip).collect::<String>()
            })
            .collect();
        assert_eq!(rebuilt, "héllo wörld ünïcode");
    }

    #[test]
    fn deterministic_for_same_input() {
        let chunker = FixedSizeChunker::new(10, 3);
        let a = chunker.chunk("doc1", "determinism matters for reconstruction");
        let b = chunker.chunk("doc1", "determinism matters for reconstruction");
        assert_eq!(a, b);
    }
}
