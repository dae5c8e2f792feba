//! Re-encode whitespace the editor lets authors create but Markdown would
//! otherwise collapse: blank-line runs, tabs and leading indentation.

use crate::config::WhitespaceConfig;

/// Apply every whitespace rule to rendered Markdown.
pub fn normalize(markdown: &str, config: &WhitespaceConfig) -> String {
    let gaps = collapse_gaps(markdown, &config.break_tag);
    escape_indentation(&gaps, config)
}

/// Turn runs of three or more newlines into one paragraph break plus one
/// `break_tag` per extra pair of newlines. An odd leftover newline is kept.
pub fn collapse_gaps(markdown: &str, break_tag: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut run = 0usize;

    for ch in markdown.chars() {
        if ch == '\n' {
            run += 1;
            continue;
        }
        flush_newlines(run, break_tag, &mut out);
        run = 0;
        out.push(ch);
    }
    flush_newlines(run, break_tag, &mut out);

    out
}

fn flush_newlines(run: usize, break_tag: &str, out: &mut String) {
    if run < 3 {
        for _ in 0..run {
            out.push('\n');
        }
        return;
    }
    let extra = run - 2;
    out.push_str("\n\n");
    for _ in 0..extra / 2 {
        out.push_str(break_tag);
    }
    if extra % 2 == 1 {
        out.push('\n');
    }
}

/// Expand tabs and escape the leading whitespace of every line that is
/// neither blank nor a list item.
pub fn escape_indentation(markdown: &str, config: &WhitespaceConfig) -> String {
    let expanded = markdown.replace('\t', &config.tab());
    expanded
        .split('\n')
        .map(|line| {
            if line.trim().is_empty() || is_marker_line(line) {
                line.to_string()
            } else {
                escape_leading(line, config)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the leading spaces and tabs of `text` with entities.
pub(crate) fn escape_leading(text: &str, config: &WhitespaceConfig) -> String {
    let rest = text.trim_start_matches([' ', '\t']);
    let leading = &text[..text.len() - rest.len()];
    if leading.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + leading.len() * config.nbsp.len());
    for ch in leading.chars() {
        match ch {
            '\t' => out.push_str(&config.tab()),
            _ => out.push_str(&config.nbsp),
        }
    }
    out.push_str(rest);
    out
}

/// Whether a line opens a list item: optional indentation, then `-`, `*` or
/// `N.` followed by whitespace.
pub(crate) fn is_marker_line(line: &str) -> bool {
    let rest = line.trim_start();
    let after_marker = if let Some(after) = rest.strip_prefix(['-', '*']) {
        after
    } else {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return false;
        }
        match rest[digits..].strip_prefix('.') {
            Some(after) => after,
            None => return false,
        }
    };
    after_marker.starts_with(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ws() -> WhitespaceConfig {
        WhitespaceConfig::default()
    }

    #[test]
    fn short_newline_runs_are_untouched() {
        assert_eq!(collapse_gaps("a\nb\n\nc", "<br>"), "a\nb\n\nc");
    }

    #[test]
    fn gap_arithmetic() {
        assert_eq!(collapse_gaps("a\n\n\nb", "<br>"), "a\n\n\nb");
        assert_eq!(collapse_gaps("a\n\n\n\nb", "<br>"), "a\n\n<br>b");
        assert_eq!(collapse_gaps("a\n\n\n\n\nb", "<br>"), "a\n\n<br>\nb");
        assert_eq!(collapse_gaps("a\n\n\n\n\n\nb", "<br>"), "a\n\n<br><br>b");
        assert_eq!(collapse_gaps("a\n\n\n\n", "<br>"), "a\n\n<br>");
    }

    #[test]
    fn five_newlines_give_one_break() {
        let out = normalize("first\n\n\n\n\nsecond\n\n", &ws());
        assert_eq!(out, "first\n\n<br>\nsecond\n\n");
        assert_eq!(out.matches("<br>").count(), 1);
    }

    #[test]
    fn tabs_expand_to_four_entities() {
        assert_eq!(
            escape_indentation("a\tb", &ws()),
            "a&nbsp;&nbsp;&nbsp;&nbsp;b"
        );
    }

    #[test]
    fn leading_spaces_become_entities() {
        assert_eq!(
            escape_indentation("  indented\nplain", &ws()),
            "&nbsp;&nbsp;indented\nplain"
        );
        assert_eq!(
            escape_indentation("\tx", &ws()),
            "&nbsp;&nbsp;&nbsp;&nbsp;x"
        );
    }

    #[test]
    fn list_and_blank_lines_keep_their_indentation() {
        let text = "- a\n  - b\n    12. c\n   \n  * d";
        assert_eq!(escape_indentation(text, &ws()), text);
    }

    #[test]
    fn marker_detection() {
        assert!(is_marker_line("- item"));
        assert!(is_marker_line("   * item"));
        assert!(is_marker_line("10. item"));
        assert!(is_marker_line("- "));
        assert!(!is_marker_line("-item"));
        assert!(!is_marker_line("---"));
        assert!(!is_marker_line("1.5 apples"));
        assert!(!is_marker_line("plain"));
        assert!(!is_marker_line(""));
    }

    #[test]
    fn escape_leading_only_touches_the_start() {
        assert_eq!(escape_leading(" a  b", &ws()), "&nbsp;a  b");
        assert_eq!(escape_leading("a b", &ws()), "a b");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[ a-z\t\n*.0-9-]{0,64}") {
            let once = normalize(&text, &ws());
            let twice = normalize(&once, &ws());
            prop_assert_eq!(once, twice);
        }
    }
}
