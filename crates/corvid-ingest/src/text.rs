// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML-to-text extraction and fixed-size overlapping chunk splitting.

/// Strips HTML down to plain text: script/style blocks dropped, tags
/// removed, common entities decoded, whitespace collapsed.
///
/// Extraction quality beyond this is out of scope; the knowledge
/// pipeline only needs readable sentences, not faithful layout.
pub fn strip_html(html: &str) -> String {
    let without_blocks = drop_element(&drop_element(html, "script"), "style");

    let mut text = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for c in without_blocks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                // Tag boundaries act as word separators.
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes `<tag ...> ... </tag>` blocks, case-insensitively.
fn drop_element(html: &str, tag: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(start) = find_ascii_ci(html, &open, pos) {
        out.push_str(&html[pos..start]);
        match find_ascii_ci(html, &close, start) {
            Some(end) => pos = end + close.len(),
            None => return out, // unterminated block: drop the rest
        }
    }
    out.push_str(&html[pos..]);
    out
}

/// Byte offset of the first ASCII-case-insensitive match of `needle`
/// at or after `from`. The needle must be ASCII (tag names are).
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    haystack[from..]
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

/// Splits text into fixed-size character chunks with overlap.
///
/// Consecutive chunks share `overlap` characters; callers are expected
/// to keep `overlap < chunk_size` (config validation enforces it), but
/// a degenerate step is clamped to 1 rather than looping forever.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || chunk_size == 0 {
        return Vec::new();
    }
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Title</h1>\n  <p>Hello   <b>world</b></p></body></html>";
        assert_eq!(strip_html(html), "Title Hello world");
    }

    #[test]
    fn strip_drops_script_and_style() {
        let html = "<style>p { color: red; }</style><p>kept</p><script>var x = '<p>';</script>";
        assert_eq!(strip_html(html), "kept");
    }

    #[test]
    fn strip_decodes_entities() {
        assert_eq!(strip_html("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn strip_plain_text_passes_through() {
        assert_eq!(strip_html("just words"), "just words");
    }

    #[test]
    fn split_empty_is_empty() {
        assert!(split_text("", 500, 50).is_empty());
    }

    #[test]
    fn split_short_text_is_single_chunk() {
        let chunks = split_text("short", 500, 50);
        assert_eq!(chunks, vec!["short"]);
    }

    #[test]
    fn split_overlap_arithmetic() {
        let text = "abcdefghij"; // 10 chars
        let chunks = split_text(text, 4, 2);
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij"]);
    }

    #[test]
    fn split_covers_all_text() {
        let text: String = ('a'..='z').cycle().take(1234).collect();
        let chunks = split_text(&text, 500, 50);
        assert!(chunks.iter().all(|c| c.chars().count() <= 500));
        // First chunk starts at the start, last chunk ends at the end.
        assert!(text.starts_with(&chunks[0]));
        assert!(text.ends_with(chunks.last().unwrap()));
    }

    #[test]
    fn split_handles_multibyte() {
        let text = "héllo wörld ünïcode tèxt";
        let chunks = split_text(text, 8, 2);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.chars().count() <= 8));
    }
}
