use crate::error::ExtractError;
use log::debug;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static JSON_LD_SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").unwrap());

/// Raw text of every JSON-LD script block, in document order.
pub(crate) fn script_blocks(document: &Html) -> Vec<String> {
    let blocks: Vec<String> = document
        .select(&JSON_LD_SCRIPT)
        .map(|script| script.text().collect::<String>())
        .collect();
    debug!("Found {} JSON-LD script tags", blocks.len());
    blocks
}

fn strip_wrappers(raw: &str) -> &str {
    let mut text = raw.trim();
    for prefix in ["<!--", "//<![CDATA[", "<![CDATA["] {
        text = text.strip_prefix(prefix).unwrap_or(text).trim_start();
    }
    for suffix in ["-->", "//]]>", "]]>"] {
        text = text.strip_suffix(suffix).unwrap_or(text).trim_end();
    }
    text
}

/// Decode one JSON-LD block.
///
/// When `repair` is set, a block that fails strict decoding is retried once
/// through [`repair_json`]. The error always reports the strict failure.
pub fn decode_block(index: usize, raw: &str, repair: bool) -> Result<Value, ExtractError> {
    let text = strip_wrappers(raw);
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            if repair {
                if let Ok(value) = serde_json::from_str::<Value>(&repair_json(text)) {
                    debug!("JSON-LD block {} decoded after repair", index);
                    return Ok(value);
                }
            }
            Err(ExtractError::MalformedPayload {
                index,
                reason: err.to_string(),
            })
        }
    }
}

fn next_significant(rest: &[char]) -> Option<char> {
    rest.iter().copied().find(|c| !c.is_whitespace())
}

/// Fix the JSON mistakes recipe sites commonly ship: missing commas between
/// members, trailing or doubled commas, and raw line breaks inside strings.
pub fn repair_json(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut repaired = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        let rest = chars.get(i + 1..).unwrap_or(&[]);

        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    repaired.push(c);
                }
                '\\' => {
                    escaped = true;
                    repaired.push(c);
                }
                '"' => {
                    in_string = false;
                    repaired.push(c);
                    if matches!(next_significant(rest), Some('"' | '[' | '{')) {
                        debug!("Adding missing comma after string");
                        repaired.push(',');
                    }
                }
                '\n' | '\r' | '\t' => repaired.push(' '),
                _ => repaired.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                repaired.push(c);
            }
            ']' | '}' => {
                if repaired.ends_with(',') {
                    repaired.pop();
                }
                repaired.push(c);
                if matches!(next_significant(rest), Some('"' | '[' | '{')) {
                    debug!("Adding missing comma after array/object closing");
                    repaired.push(',');
                }
            }
            ',' => {
                if !repaired.ends_with([',', '[', '{']) {
                    repaired.push(c);
                }
            }
            ':' => {
                if repaired.ends_with(',') {
                    repaired.pop();
                }
                repaired.push(c);
            }
            _ if c.is_whitespace() => {}
            _ => repaired.push(c),
        }
    }

    repaired
}
