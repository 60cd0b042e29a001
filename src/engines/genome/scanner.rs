//! Finds call sites (`name(...)` and `.name(...)`) in pattern code.
//!
//! A regex locates call heads; arguments are read by a small
//! paren-balancing reader that skips over string literals, so mini-notation
//! such as `"bd(3,8)"` is never mistaken for a call.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static CALL_HEAD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\.\s*)?\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub name: String,
    /// Chained onto a previous expression (`.name(`)
    pub is_method: bool,
    /// Byte offset of the call head (the dot for methods)
    pub offset: usize,
    /// Text between the outer parentheses
    pub args: String,
    /// Byte range of the argument text
    pub args_span: Range<usize>,
}

impl CallSite {
    /// Inner text when the arguments are a single string literal
    pub fn string_argument(&self) -> Option<String> {
        string_literal(&self.args)
    }
}

pub fn scan_calls(text: &str) -> Vec<CallSite> {
    let Some(head) = CALL_HEAD.as_ref() else {
        return Vec::new();
    };
    let strings = string_spans(text);

    let mut calls = Vec::new();
    for caps in head.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if strings.iter().any(|span| span.contains(&whole.start())) {
            continue;
        }
        let Some(name) = caps.get(2) else { continue };
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else {
            continue;
        };
        calls.push(CallSite {
            name: name.as_str().to_string(),
            is_method: caps.get(1).is_some(),
            offset: whole.start(),
            args: text[open + 1..close].to_string(),
            args_span: open + 1..close,
        });
    }
    calls
}

/// Strip one layer of matching quotes
pub fn string_literal(args: &str) -> Option<String> {
    let trimmed = args.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !matches!(first, '"' | '\'' | '`') || trimmed.len() < 2 || !trimmed.ends_with(first) {
        return None;
    }
    Some(trimmed[1..trimmed.len() - 1].to_string())
}

fn string_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open: Option<(char, usize)> = None;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        match open {
            Some((quote, start)) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    spans.push(start..idx + 1);
                    open = None;
                }
            }
            None => {
                if matches!(ch, '"' | '\'' | '`') {
                    open = Some((ch, idx));
                }
            }
        }
    }
    if let Some((_, start)) = open {
        spans.push(start..text.len());
    }
    spans
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_chain() {
        let calls = scan_calls(r#"sound("bd ~ sd ~").gain(0.7)"#);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "sound");
        assert!(!calls[0].is_method);
        assert_eq!(calls[0].string_argument().as_deref(), Some("bd ~ sd ~"));
        assert_eq!(calls[1].name, "gain");
        assert!(calls[1].is_method);
        assert_eq!(calls[1].args, "0.7");
        assert_eq!(calls[1].offset, 18);
    }

    #[test]
    fn test_scan_nested_and_strings() {
        let text = r#"stack(sound("bd(3,8)"), note("c3").s("saw")).every(4, x => x.fast(2))"#;
        let names: Vec<_> = scan_calls(text).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["stack", "sound", "note", "s", "every", "fast"]);
    }

    #[test]
    fn test_unbalanced_is_skipped() {
        let calls = scan_calls(r#"sound("bd" .gain(0.5)"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "gain");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(" 'c4 e4' ").as_deref(), Some("c4 e4"));
        assert_eq!(string_literal("0.5"), None);
        assert_eq!(string_literal("\""), None);
    }
}
