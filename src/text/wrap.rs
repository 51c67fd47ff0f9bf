//! Paragraph-aware reflow and word wrapping.

use unicode_width::UnicodeWidthStr;

/// Reflows and wraps `text` to `width` columns.
///
/// A width of `0` disables wrapping and returns `text` untouched.
pub fn fill(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    wrap(&reflow(text), width)
}

/// Unwraps hard line breaks inside paragraphs.
///
/// Paragraphs are separated by a blank line and survive the reflow. Inside a
/// paragraph, newlines become spaces, runs of spaces collapse to one and the
/// paragraph is trimmed. A single trailing newline is kept if the input had
/// one. `\r\n` line endings are normalized first.
pub fn reflow(text: &str) -> String {
    let text = text.replace("\r\n", "\n");

    let has_trailing_newline = text.ends_with('\n');
    let text = text.strip_suffix('\n').unwrap_or(&text);

    let paragraphs: Vec<String> = text
        .split("\n\n")
        .map(|paragraph| {
            paragraph
                .replace('\n', " ")
                .split(' ')
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let mut reflowed = paragraphs.join("\n\n");
    if has_trailing_newline && !reflowed.is_empty() {
        reflowed.push('\n');
    }
    reflowed
}

/// Greedy word wrap at spaces.
///
/// Widths are terminal columns, so wide characters count double.
/// Existing newlines are kept. Words longer than `width` are never split and
/// sit on a line of their own. A width of `0` returns `text` unchanged.
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut wrapped = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            wrapped.push('\n');
        }

        let mut column = 0;
        for word in line.split(' ').filter(|word| !word.is_empty()) {
            let len = word.width();
            if column > 0 && column + 1 + len > width {
                wrapped.push('\n');
                column = 0;
            }
            if column > 0 {
                wrapped.push(' ');
                column += 1;
            }
            wrapped.push_str(word);
            column += len;
        }
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflow_single_line() {
        assert_eq!(reflow("hello world"), "hello world");
    }

    #[test]
    fn test_reflow_multiple_lines() {
        assert_eq!(reflow("hello\nworld"), "hello world");
    }

    #[test]
    fn test_reflow_multiple_paragraphs() {
        assert_eq!(
            reflow("first paragraph\nwith two lines\n\nsecond paragraph"),
            "first paragraph with two lines\n\nsecond paragraph"
        );
    }

    #[test]
    fn test_reflow_crlf_line_endings() {
        assert_eq!(reflow("hello\r\nworld"), "hello world");
        assert_eq!(reflow("hello\r\nworld\nfoo"), "hello world foo");
    }

    #[test]
    fn test_reflow_trailing_newline() {
        assert_eq!(reflow("hello\nworld\n"), "hello world\n");
        assert_eq!(reflow("first\n\nsecond\n"), "first\n\nsecond\n");
    }

    #[test]
    fn test_reflow_collapses_spaces() {
        assert_eq!(reflow("hello   world"), "hello world");
        assert_eq!(reflow("  hello world  "), "hello world");
    }

    #[test]
    fn test_reflow_empty_input() {
        assert_eq!(reflow(""), "");
        assert_eq!(reflow("\n\n"), "");
    }

    #[test]
    fn test_reflow_is_idempotent() {
        let inputs = [
            "a  b\nc\n\n  d e  \nf\n",
            "one\r\ntwo\n\n\nthree",
            "\n\n",
            "plain",
        ];
        for input in inputs {
            let once = reflow(input);
            assert_eq!(reflow(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_wrap_breaks_at_width() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            "the quick\nbrown fox\njumps"
        );
    }

    #[test]
    fn test_wrap_keeps_long_words_whole() {
        assert_eq!(wrap("a supercalifragilistic b", 5), "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn test_wrap_keeps_paragraph_breaks() {
        assert_eq!(wrap("aaa bbb\n\nccc", 3), "aaa\nbbb\n\nccc");
    }

    #[test]
    fn test_wrap_lines_never_exceed_width() {
        let text = "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod";
        for width in 8..30 {
            for line in wrap(text, width).lines() {
                let lone_long_word = !line.contains(' ') && line.width() > width;
                assert!(
                    lone_long_word || line.width() <= width,
                    "width {width}: {line:?}"
                );
            }
        }
    }

    #[test]
    fn test_wrap_counts_wide_characters_as_two_columns() {
        assert_eq!(wrap("日本語です 日本語です", 12), "日本語です\n日本語です");
        assert_eq!(wrap("日本 語", 7), "日本 語");
    }

    #[test]
    fn test_fill_zero_width_is_untouched() {
        let text = "first line\nsecond   line";
        assert_eq!(fill(text, 0), text);
    }

    #[test]
    fn test_fill_reflows_then_wraps() {
        assert_eq!(
            fill("a tool that\nleans on\nconventional commits", 20),
            "a tool that leans on\nconventional commits"
        );
    }
}
