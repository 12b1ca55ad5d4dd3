//! Recovers comments and whitespace from the text between two tokens.
//!
//! The grammar treats trivia as implicit, so the tree builder scans each gap
//! itself. Every token the grammar produces is kept, punctuation included, so
//! a gap normally holds nothing but trivia. Text skipped by error recovery is
//! the exception: it discards what was collected in front of it.

use crate::ast::{Trivia, TriviaKind};

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    pub(crate) fn line(&self, offset: usize) -> u32 {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        line as u32
    }
}

/// Scans `gap`, which starts at byte `base` of the source.
pub(crate) fn scan_trivia(gap: &str, base: usize, lines: &LineIndex) -> Vec<Trivia> {
    let mut trivia = Vec::new();
    let mut pos = 0;

    while pos < gap.len() {
        let rest = &gap[pos..];
        let (kind, len) = if rest.starts_with("//") {
            // The line break, `\r\n` included, belongs to the whitespace after.
            let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
            (Some(TriviaKind::ShortComment), end)
        } else if rest.starts_with("/*") {
            (Some(TriviaKind::LongComment), block_len(rest, "*/"))
        } else if rest.starts_with("%{") {
            (Some(TriviaKind::CopyText), block_len(rest, "%}"))
        } else if rest.starts_with(|c: char| c.is_ascii_whitespace()) {
            let len = rest
                .find(|c: char| !c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            (Some(TriviaKind::Whitespace), len)
        } else {
            let len = rest.chars().next().map_or(1, char::len_utf8);
            (None, len)
        };

        match kind {
            Some(kind) => trivia.push(Trivia::new(
                lines.line(base + pos),
                kind,
                &rest[..len],
            )),
            None => trivia.clear(),
        }
        pos += len;
    }

    trivia
}

// Length of a block opened at the start of `text` and closed by `close`;
// an unterminated block runs to the end of the gap.
fn block_len(text: &str, close: &str) -> usize {
    text[2..]
        .find(close)
        .map_or(text.len(), |end| end + 2 + close.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<(u32, TriviaKind, String)> {
        let lines = LineIndex::new(source);
        scan_trivia(source, 0, &lines)
            .into_iter()
            .map(|t| (t.line, t.kind, t.text))
            .collect()
    }

    #[test]
    fn line_index_is_one_based() {
        let lines = LineIndex::new("a\nbc\n\nd");
        assert_eq!(lines.line(0), 1);
        assert_eq!(lines.line(2), 2);
        assert_eq!(lines.line(3), 2);
        assert_eq!(lines.line(5), 3);
        assert_eq!(lines.line(6), 4);
    }

    #[test]
    fn comments_and_whitespace_are_kept_in_order() {
        let trivia = scan("// one\n/** two */ %{ copy %}\n");
        assert_eq!(
            trivia,
            vec![
                (1, TriviaKind::ShortComment, "// one".to_string()),
                (1, TriviaKind::Whitespace, "\n".to_string()),
                (2, TriviaKind::LongComment, "/** two */".to_string()),
                (2, TriviaKind::Whitespace, " ".to_string()),
                (2, TriviaKind::CopyText, "%{ copy %}".to_string()),
                (2, TriviaKind::Whitespace, "\n".to_string()),
            ]
        );
    }

    #[test]
    fn skipped_text_discards_pending_trivia() {
        let trivia = scan("/* dropped */ junk; // kept\n");
        let texts: Vec<_> = trivia.iter().map(|(_, _, text)| text.as_str()).collect();
        assert_eq!(texts, vec![" ", "// kept", "\n"]);
    }

    #[test]
    fn short_comment_stops_before_crlf() {
        let trivia = scan("// license\r\n// second\r\n");
        assert_eq!(
            trivia,
            vec![
                (1, TriviaKind::ShortComment, "// license".to_string()),
                (1, TriviaKind::Whitespace, "\r\n".to_string()),
                (2, TriviaKind::ShortComment, "// second".to_string()),
                (2, TriviaKind::Whitespace, "\r\n".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_block_runs_to_the_end() {
        let trivia = scan("/* open");
        assert_eq!(trivia, vec![(1, TriviaKind::LongComment, "/* open".to_string())]);
    }
}
