//! Word wrapping and wrapped-line estimation

use crate::font::FontMetrics;
use tracing::trace;

/// Break text into lines no wider than `max_width`.
///
/// Explicit newlines are kept, runs of whitespace collapse to one space and a
/// word wider than the line is split at character boundaries. The result
/// always holds at least one (possibly empty) line.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    if max_width <= 0.0 {
        return text.split('\n').map(|s| s.trim().to_string()).collect();
    }

    let space_width = metrics.char_width(' ', font_size);
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in segment.split_whitespace() {
            let word_width = metrics.text_width(word, font_size);

            if word_width > max_width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let (pieces, tail) = split_long_word(word, max_width, font_size, metrics);
                lines.extend(pieces);
                line_width = metrics.text_width(&tail, font_size);
                line = tail;
                continue;
            }

            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + space_width + word_width <= max_width {
                line.push(' ');
                line.push_str(word);
                line_width += space_width + word_width;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
                line_width = word_width;
            }
        }

        lines.push(line);
    }

    trace!("Wrapped text into {} lines", lines.len());
    lines
}

/// Split a word wider than the line into full-width chunks plus a tail
fn split_long_word(
    word: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> (Vec<String>, String) {
    let mut pieces = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0.0;

    for ch in word.chars() {
        let ch_width = metrics.char_width(ch, font_size);
        // Always take at least one character per chunk
        if !chunk.is_empty() && chunk_width + ch_width > max_width {
            pieces.push(std::mem::take(&mut chunk));
            chunk_width = 0.0;
        }
        chunk.push(ch);
        chunk_width += ch_width;
    }

    (pieces, chunk)
}

/// Number of lines `text` occupies when wrapped to `max_width`
pub fn wrapped_line_count(
    text: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn FontMetrics,
) -> usize {
    wrap_text(text, max_width, font_size, metrics).len()
}

/// Map text onto the WinAnsi (Latin-1 subset) bytes the built-in fonts use
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::HeuristicMetrics;

    fn wrap(text: &str, width: f64) -> Vec<String> {
        wrap_text(text, width, 10.0, &HeuristicMetrics::default())
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a long piece of text that should be wrapped into multiple lines";
        let lines = wrap(text, 100.0);
        assert!(lines.len() > 1);
        // 100pt at 5pt per char holds 20 characters
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(wrap("", 100.0), vec![String::new()]);
    }

    #[test]
    fn test_exact_fit_stays_on_one_line() {
        // "abcd efgh" is 9 chars = 45pt
        assert_eq!(wrap("abcd efgh", 45.0), vec!["abcd efgh"]);
        assert_eq!(wrap("abcd efgh", 44.0), vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_text_with_newlines() {
        let lines = wrap("Line 1\n\nLine 3", 200.0);
        assert_eq!(lines, vec!["Line 1", "", "Line 3"]);
    }

    #[test]
    fn test_long_word_is_split() {
        let text = "supercalifragilisticexpialidocious";
        let lines = wrap(text, 50.0);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.concat(), text);
    }

    #[test]
    fn test_long_word_tail_joins_next_word() {
        let lines = wrap("abcdefghijkl mn", 50.0);
        assert_eq!(lines, vec!["abcdefghij", "kl mn"]);
    }

    #[test]
    fn test_multibyte_characters_split_safely() {
        let text = "caf\u{00e9}caf\u{00e9}caf\u{00e9}caf\u{00e9}";
        let lines = wrap(text, 30.0);
        assert_eq!(lines.concat(), text);
        assert!(lines.iter().all(|l| l.chars().count() <= 6));
    }

    #[test]
    fn test_line_count() {
        let metrics = HeuristicMetrics::default();
        assert_eq!(wrapped_line_count("-", 10.0, 10.0, &metrics), 1);
        assert_eq!(wrapped_line_count("aa bb cc", 10.0, 10.0, &metrics), 3);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Squat"), b"Squat".to_vec());
        assert_eq!(encode_win_ansi("caf\u{00e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{4f60}"), vec![b'?']);
    }
}
