//! Text segmentation: bounded chunks on safe natural boundaries.

/// Split text into bounded chunks, cutting on natural boundaries.
///
/// Each chunk ends at the nearest newline (preferred) or whitespace within
/// the window `[end - overlap, end)` so that chunks avoid cutting mid-sentence
/// where possible. The overlap only influences where the boundary lands; it
/// does not duplicate text, so concatenating the chunks reconstructs the
/// input exactly.
///
/// A chunk with no break point in the window degenerates to a hard cut at
/// the nearest char boundary at or below `chunk_size`; `end` always advances
/// by at least one byte, so the loop terminates.
///
/// # Examples
///
/// ```
/// use fresco_engine::segment;
///
/// let chunks = segment("short text", 1000, 100);
/// assert_eq!(chunks, vec!["short text"]);
/// ```
pub fn segment(text: &str, chunk_size: usize, overlap: usize) -> Vec<&str> {
    if text.len() <= chunk_size {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let text_len = text.len();

    while start < text_len {
        let mut end = floor_char_boundary(text, (start + chunk_size).min(text_len));

        if end < text_len {
            let search_start = start.max(end.saturating_sub(overlap));
            let window = &text[search_start..end];
            if let Some(pos) = window.rfind('\n') {
                end = search_start + pos + 1;
            } else if let Some(pos) = window.rfind(' ') {
                end = search_start + pos + 1;
            }
        }

        // Guarantee progress even when the window yields no break point
        // at (or before) the current position.
        if end <= start {
            end = ceil_char_boundary(text, start + 1).min(text_len);
        }

        chunks.push(&text[start..end]);
        start = end;
    }

    chunks
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `index`.
fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut i = index.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let text = "a very short story";
        assert_eq!(segment(text, 100, 10), vec![text]);
    }

    #[test]
    fn test_exact_length_single_chunk() {
        let text = "abcde";
        assert_eq!(segment(text, 5, 2), vec![text]);
    }

    #[test]
    fn test_chunks_reconstruct_input() {
        let text = "The rain fell on the harbor.\nShips creaked in the dark.\nA lantern swung on the pier, and the watchman counted the hours until dawn broke over the water.";
        let chunks = segment(text, 40, 20);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_prefers_newline_boundary() {
        let text = "first line of prose here\nsecond line of prose here\nthird line";
        let chunks = segment(text, 30, 20);
        // The boundary lands just after a newline, not mid-word.
        assert!(chunks[0].ends_with('\n'));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_falls_back_to_space_boundary() {
        let text = "word word word word word word word word word word";
        let chunks = segment(text, 22, 10);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with(' '), "chunk {:?} should end on a space", chunk);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_no_break_point_hard_cut() {
        let text = "x".repeat(100);
        let chunks = segment(&text, 30, 10);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].len(), 30);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_boundaries_never_exceed_nominal_end() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let chunk_size = 20;
        let chunks = segment(text, chunk_size, 8);
        for chunk in &chunks {
            assert!(chunk.len() <= chunk_size);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "старый маяк стоял на берегу моря и светил кораблям в ночи".repeat(3);
        let chunks = segment(&text, 50, 20);
        assert_eq!(chunks.concat(), text);
    }
}
