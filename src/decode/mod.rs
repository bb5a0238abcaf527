mod flow;
mod line;
mod scalar;

use memchr::memchr;

use crate::error::{Error, Result};
use crate::value::{Object, Value};

use line::{collect_lines, Line};
use scalar::parse_scalar;

pub(crate) fn document_from_str(input: &str) -> Result<Value> {
    Parser::new(input).parse_document()
}

/// Recursive-descent parser over the preprocessed line table.
///
/// The cursor always points at the next unconsumed line. Every parse method
/// either advances it past everything it consumed or leaves it exactly where
/// it was on a failed attempt.
pub(crate) struct Parser {
    lines: Vec<Line>,
    cursor: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            lines: collect_lines(input),
            cursor: 0,
        }
    }

    fn line_number(&self, idx: usize) -> usize {
        idx + 1
    }

    /// Indentation of the first non-blank line after `from`, when strictly
    /// deeper than `parent_indent`. `None` means "no nested block present".
    fn next_sub_indent(&self, from: usize, parent_indent: usize) -> Option<usize> {
        let mut peek = from;
        while peek < self.lines.len() {
            let line = &self.lines[peek];
            if line.blank {
                peek += 1;
                continue;
            }
            if line.indent > parent_indent {
                return Some(line.indent);
            }
            return None;
        }
        None
    }

    /// Top-level document loop. A `-` in column zero makes the whole
    /// document a sequence, unless mapping entries already exist at the
    /// root. A document consisting of one scalar line is that scalar.
    /// Other root lines without a `:` are skipped, and root keys are
    /// accepted at any indentation.
    fn parse_document(&mut self) -> Result<Value> {
        let mut non_blank = self.lines.iter().enumerate().filter(|(_, l)| !l.blank);
        if let (Some((idx, only)), None) = (non_blank.next(), non_blank.next()) {
            if only.indent == 0
                && !only.content.starts_with('-')
                && find_colon(&only.content).is_none()
            {
                return parse_scalar(&only.content, idx + 1);
            }
        }

        let mut root = Object::new();
        self.cursor = 0;

        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }

            if line.indent == 0 && line.content.starts_with('-') {
                if root.is_empty() {
                    return self.parse_sequence(0).map(Value::Array);
                }
                return Err(Error::MixedRoot {
                    line: self.line_number(self.cursor),
                });
            }

            let indent = line.indent;
            let Some(colon) = find_colon(&line.content) else {
                self.cursor += 1;
                continue;
            };
            let key = line.content[..colon].trim_end_matches([' ', '\t']).to_string();
            let value_text = line.content[colon + 1..]
                .trim_matches([' ', '\t'])
                .to_string();
            let key_line = self.cursor;
            self.cursor += 1;

            let value = if value_text.is_empty() {
                self.parse_block_for_key(&key, key_line, indent)?
            } else {
                parse_scalar(&value_text, self.line_number(key_line))?
            };
            root.insert(key, value);
        }

        Ok(Value::Object(root))
    }

    /// Generic value dispatcher at `expected_indent`: flow block, sequence,
    /// mapping, or single scalar line. Returns `Ok(None)` — the "no value"
    /// sentinel, distinct from a parsed null — when indentation drops below
    /// the expectation or input runs out before any content.
    fn parse_value(&mut self, expected_indent: usize) -> Result<Option<Value>> {
        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }
            if line.indent < expected_indent {
                return Ok(None);
            }
            if line.indent > expected_indent {
                // Over-indented stray line; scan on until the level matches.
                self.cursor += 1;
                continue;
            }

            if matches!(line.content.as_bytes().first(), Some(b'[') | Some(b'{')) {
                let saved = self.cursor;
                if let Some(buffer) = self.try_collect_flow_block(expected_indent) {
                    match serde_json::from_str::<serde_json::Value>(&buffer) {
                        Ok(value) => return Ok(Some(Value::from(value))),
                        // Strict parse rejected the collected text; fall back
                        // to reading the same lines as ordinary structure.
                        Err(_) => self.cursor = saved,
                    }
                }
            }

            let line = &self.lines[self.cursor];
            if line.content.starts_with('-') {
                return self
                    .parse_sequence(expected_indent)
                    .map(|items| Some(Value::Array(items)));
            }
            if find_colon(&line.content).is_some() {
                return self
                    .parse_mapping(expected_indent)
                    .map(|map| Some(Value::Object(map)));
            }

            let content = line.content.clone();
            let line_no = self.line_number(self.cursor);
            self.cursor += 1;
            return parse_scalar(&content, line_no).map(Some);
        }

        Ok(None)
    }

    /// Block mapping at exactly `current_indent`. Ends without consuming on
    /// an indentation change or a line with no `:`. Duplicate keys are
    /// overwritten, last write wins.
    fn parse_mapping(&mut self, current_indent: usize) -> Result<Object> {
        let mut object = Object::new();

        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }
            if line.indent != current_indent {
                break;
            }
            let Some(colon) = find_colon(&line.content) else {
                break;
            };
            let key = line.content[..colon].trim_end_matches([' ', '\t']).to_string();
            let value_text = line.content[colon + 1..]
                .trim_matches([' ', '\t'])
                .to_string();
            let key_line = self.cursor;
            self.cursor += 1;

            let value = if value_text.is_empty() {
                self.parse_block_for_key(&key, key_line, current_indent)?
            } else {
                parse_scalar(&value_text, self.line_number(key_line))?
            };
            object.insert(key, value);
        }

        Ok(object)
    }

    /// Block sequence at exactly `current_indent`: lines starting with `-`.
    fn parse_sequence(&mut self, current_indent: usize) -> Result<Vec<Value>> {
        let mut array = Vec::new();

        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }
            if line.indent != current_indent || !line.content.starts_with('-') {
                break;
            }
            let value_text = line.content[1..]
                .trim_start_matches([' ', '\t'])
                .to_string();
            let item_line = self.cursor;
            self.cursor += 1;

            if value_text.is_empty() {
                let value = self.parse_block_for_item(item_line, current_indent)?;
                array.push(value);
            } else if value_text.starts_with('-') {
                let nested =
                    self.parse_inline_nested_sequence(&value_text, item_line, current_indent)?;
                array.push(Value::Array(nested));
            } else if let Some(colon) = find_colon(&value_text) {
                let object =
                    self.parse_inline_mapping(&value_text, colon, item_line, current_indent)?;
                array.push(Value::Object(object));
            } else {
                array.push(parse_scalar(&value_text, self.line_number(item_line))?);
            }
        }

        Ok(array)
    }

    /// `- - a - b` style items: the remainder is split on the literal `" -"`
    /// separator into scalars, then continuation dashes at one consistent
    /// deeper indentation extend the nested sequence.
    fn parse_inline_nested_sequence(
        &mut self,
        first: &str,
        item_line: usize,
        current_indent: usize,
    ) -> Result<Vec<Value>> {
        let mut nested = Vec::new();

        let mut remaining = first;
        while remaining.starts_with('-') {
            remaining = remaining[1..].trim_start_matches([' ', '\t']);
            let item_text = match remaining.find(" -") {
                Some(pos) => {
                    let text = &remaining[..pos];
                    remaining = remaining[pos + 1..].trim_start_matches([' ', '\t']);
                    text
                }
                None => {
                    let text = remaining;
                    remaining = "";
                    text
                }
            };
            if !item_text.is_empty() {
                nested.push(parse_scalar(item_text, self.line_number(item_line))?);
            }
        }

        let mut sub_indent = None;
        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }
            if line.indent <= current_indent || !line.content.starts_with('-') {
                break;
            }
            match sub_indent {
                None => sub_indent = Some(line.indent),
                Some(expected) if line.indent != expected => {
                    return Err(Error::InconsistentIndent {
                        line: self.line_number(self.cursor),
                    });
                }
                Some(_) => {}
            }
            let text = line.content[1..]
                .trim_start_matches([' ', '\t'])
                .to_string();
            let line_no = self.line_number(self.cursor);
            self.cursor += 1;
            nested.push(parse_scalar(&text, line_no)?);
        }

        Ok(nested)
    }

    /// `- key: value` items: the first pair comes from the item line itself,
    /// further pairs at one consistent deeper indentation join the same
    /// object. A depth change or a non-colon line ends it silently.
    fn parse_inline_mapping(
        &mut self,
        first: &str,
        colon: usize,
        item_line: usize,
        current_indent: usize,
    ) -> Result<Object> {
        let mut object = Object::new();

        let key = first[..colon].trim_end_matches([' ', '\t']).to_string();
        let value_text = first[colon + 1..].trim_matches([' ', '\t']);
        let value = if value_text.is_empty() {
            self.parse_block_for_key(&key, item_line, current_indent)?
        } else {
            parse_scalar(value_text, self.line_number(item_line))?
        };
        object.insert(key, value);

        let mut key_indent = None;
        while self.cursor < self.lines.len() {
            let line = &self.lines[self.cursor];
            if line.blank {
                self.cursor += 1;
                continue;
            }
            if line.indent <= current_indent {
                break;
            }
            let Some(colon) = find_colon(&line.content) else {
                break;
            };
            let indent = line.indent;
            let entry_indent = match key_indent {
                None => {
                    key_indent = Some(indent);
                    indent
                }
                Some(expected) if indent != expected => break,
                Some(expected) => expected,
            };
            let key = line.content[..colon].trim_end_matches([' ', '\t']).to_string();
            let value_text = line.content[colon + 1..]
                .trim_matches([' ', '\t'])
                .to_string();
            let key_line = self.cursor;
            self.cursor += 1;

            let value = if value_text.is_empty() {
                self.parse_block_for_key(&key, key_line, entry_indent)?
            } else {
                parse_scalar(&value_text, self.line_number(key_line))?
            };
            object.insert(key, value);
        }

        Ok(object)
    }

    /// Parse the required indented block after an empty-valued `key:`. The
    /// "no value" sentinel and an explicit null block are both hard errors.
    fn parse_block_for_key(
        &mut self,
        key: &str,
        key_line: usize,
        parent_indent: usize,
    ) -> Result<Value> {
        let line = self.line_number(key_line);
        let sub_indent =
            self.next_sub_indent(self.cursor, parent_indent)
                .ok_or_else(|| Error::ExpectedBlock {
                    key: key.to_string(),
                    line,
                })?;
        match self.parse_value(sub_indent)? {
            Some(Value::Null) | None => Err(Error::EmptyBlock {
                key: key.to_string(),
                line,
            }),
            Some(value) => Ok(value),
        }
    }

    /// Same as [`Parser::parse_block_for_key`] for a bare `-` item.
    fn parse_block_for_item(&mut self, item_line: usize, parent_indent: usize) -> Result<Value> {
        let line = self.line_number(item_line);
        let sub_indent = self
            .next_sub_indent(self.cursor, parent_indent)
            .ok_or(Error::ExpectedItemBlock { line })?;
        match self.parse_value(sub_indent)? {
            Some(Value::Null) | None => Err(Error::EmptyItemBlock { line }),
            Some(value) => Ok(value),
        }
    }
}

/// First `:` on the line, scanned naively: a colon inside a quoted scalar
/// also separates, matching the line grammar's subset rules.
fn find_colon(content: &str) -> Option<usize> {
    memchr(b':', content.as_bytes())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::value::Value;

    use super::{document_from_str, Parser};

    #[rstest]
    fn test_next_sub_indent() {
        let p = Parser::new("key:\n\n    nested: 1\n");
        assert_eq!(p.next_sub_indent(1, 0), Some(4));
        assert_eq!(p.next_sub_indent(2, 4), None);
        assert_eq!(p.next_sub_indent(9, 0), None);
    }

    #[rstest]
    fn test_cursor_advances_past_consumed_block() {
        let mut p = Parser::new("a: 1\nb: 2\n");
        let map = p.parse_mapping(0).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(p.cursor, p.lines.len());
    }

    #[rstest]
    fn test_mapping_stops_at_shallower_line() {
        let mut p = Parser::new("  a: 1\n  b: 2\nc: 3\n");
        let map = p.parse_mapping(2).unwrap();
        assert_eq!(map.len(), 2);
        // The shallower line is left for the caller.
        assert_eq!(p.lines[p.cursor].content, "c: 3");
    }

    #[rstest]
    fn test_value_sentinel_on_indent_drop() {
        let mut p = Parser::new("shallow: 1\n");
        let parsed = p.parse_value(4).unwrap();
        assert!(parsed.is_none());
        assert_eq!(p.cursor, 0);
    }

    #[rstest]
    fn test_document_skips_non_mapping_root_lines() {
        let value = document_from_str("stray text\na: 1\n").unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert_eq!(value["a"], Value::Integer(1));
    }
}
