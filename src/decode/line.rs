use memchr::memchr;

/// One preprocessed input line. Indentation is measured in columns, a space
/// counting 1 and a tab counting 2; `content` starts at the first
/// non-whitespace character. Blank lines are kept so diagnostics can report
/// stable 1-based line numbers.
#[derive(Clone, Debug)]
pub(crate) struct Line {
    pub indent: usize,
    pub content: String,
    pub blank: bool,
}

/// Split raw input into the line table: comments stripped, trailing
/// whitespace trimmed, indentation measured once per line.
pub(crate) fn collect_lines(input: &str) -> Vec<Line> {
    input
        .split('\n')
        .map(|raw| {
            let stripped = strip_comment(raw).trim_end_matches([' ', '\t', '\r']);
            let (indent, content) = split_indent(stripped);
            Line {
                indent,
                blank: content.is_empty(),
                content: content.to_string(),
            }
        })
        .collect()
}

/// `#` starts a comment unless it sits inside a quoted region of the line.
/// Quote state does not carry across physical lines, so a `#` inside a
/// quoted string that spans lines of a flow block is still stripped.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    if memchr(b'#', bytes).is_none() {
        return line;
    }
    let mut quote = 0u8;
    let mut escape = false;
    for (idx, &byte) in bytes.iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if quote != 0 {
            if byte == b'\\' {
                escape = true;
            } else if byte == quote {
                quote = 0;
            }
            continue;
        }
        match byte {
            b'"' | b'\'' => quote = byte,
            b'#' => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn split_indent(line: &str) -> (usize, &str) {
    let mut width = 0;
    for (idx, byte) in line.bytes().enumerate() {
        match byte {
            b' ' => width += 1,
            b'\t' => width += 2,
            _ => return (width, &line[idx..]),
        }
    }
    (width, "")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{collect_lines, strip_comment};

    #[rstest]
    #[case("key: value", "key: value")]
    #[case("key: value # trailing", "key: value ")]
    #[case("# full line", "")]
    #[case("key: \"a # b\"", "key: \"a # b\"")]
    #[case("key: 'a # b' # real", "key: 'a # b' ")]
    #[case("key: \"esc \\\" # quote\"", "key: \"esc \\\" # quote\"")]
    #[case("no comment here", "no comment here")]
    fn test_strip_comment(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_comment(input), expected);
    }

    #[rstest]
    #[case("a", 0)]
    #[case("  a", 2)]
    #[case("\ta", 2)]
    #[case("\t a", 3)]
    #[case("    - x", 4)]
    fn test_indent_width(#[case] input: &str, #[case] expected: usize) {
        let lines = collect_lines(input);
        assert_eq!(lines[0].indent, expected);
    }

    #[rstest]
    fn test_collect_lines_keeps_blanks_and_numbers() {
        let lines = collect_lines("a: 1\n\n   \n# gone\nb: 2");
        assert_eq!(lines.len(), 5);
        assert!(!lines[0].blank);
        assert!(lines[1].blank);
        assert!(lines[2].blank);
        assert!(lines[3].blank);
        assert_eq!(lines[4].content, "b: 2");
    }

    #[rstest]
    fn test_trailing_whitespace_trimmed() {
        let lines = collect_lines("key: value   \t\r");
        assert_eq!(lines[0].content, "key: value");
    }

    #[rstest]
    fn test_empty_input() {
        let lines = collect_lines("");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].blank);
    }
}
