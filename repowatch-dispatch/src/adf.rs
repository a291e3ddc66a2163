//! Atlassian Document Format rendering.
//!
//! The ticketing API only accepts descriptions and comments as ADF documents.
//! This converts the markdown-ish text the dispatcher builds — paragraphs,
//! ``` code fences, `- ` bullet lists, and `*bold*` lines — into the
//! equivalent ADF JSON.

use serde_json::{json, Value};

/// Convert markdown-ish text into an ADF `doc` value.
pub fn to_adf(text: &str) -> Value {
    let mut content: Vec<Value> = Vec::new();
    let mut code_block: Option<Vec<String>> = None;
    let mut bullets: Vec<Value> = Vec::new();

    for line in text.lines() {
        let stripped = line.trim();

        if stripped.starts_with("```") {
            match code_block.take() {
                None => code_block = Some(Vec::new()),
                Some(lines) => content.push(json!({
                    "type": "codeBlock",
                    "content": [{ "type": "text", "text": lines.join("\n") }],
                })),
            }
            continue;
        }
        if let Some(lines) = code_block.as_mut() {
            lines.push(line.to_string());
            continue;
        }

        if let Some(item) = stripped.strip_prefix("- ") {
            bullets.push(json!({
                "type": "listItem",
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": item.trim() }],
                }],
            }));
            continue;
        }
        flush_bullets(&mut content, &mut bullets);

        if stripped.len() > 1 && stripped.starts_with('*') && stripped.ends_with('*') {
            let bold = stripped.trim_matches('*').trim();
            content.push(json!({
                "type": "paragraph",
                "content": [{
                    "type": "text",
                    "text": bold,
                    "marks": [{ "type": "strong" }],
                }],
            }));
            continue;
        }

        content.push(json!({
            "type": "paragraph",
            "content": [{ "type": "text", "text": if stripped.is_empty() { "" } else { line } }],
        }));
    }

    // Unterminated fence: emit what accumulated rather than dropping it.
    if let Some(lines) = code_block.take() {
        content.push(json!({
            "type": "codeBlock",
            "content": [{ "type": "text", "text": lines.join("\n") }],
        }));
    }
    flush_bullets(&mut content, &mut bullets);

    json!({
        "type": "doc",
        "version": 1,
        "content": content,
    })
}

fn flush_bullets(content: &mut Vec<Value>, bullets: &mut Vec<Value>) {
    if bullets.is_empty() {
        return;
    }
    content.push(json!({
        "type": "bulletList",
        "content": std::mem::take(bullets),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_envelope_is_version_1() {
        let doc = to_adf("hello");
        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["version"], 1);
    }

    #[test]
    fn code_fence_becomes_one_code_block() {
        let doc = to_adf("before\n```\nlet x = 1;\nlet y = 2;\n```\nafter");
        let blocks = doc["content"].as_array().expect("content");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1]["type"], "codeBlock");
        assert_eq!(blocks[1]["content"][0]["text"], "let x = 1;\nlet y = 2;");
    }

    #[test]
    fn consecutive_bullets_group_into_one_list() {
        let doc = to_adf("- first\n- second\nplain");
        let blocks = doc["content"].as_array().expect("content");
        assert_eq!(blocks[0]["type"], "bulletList");
        assert_eq!(blocks[0]["content"].as_array().expect("items").len(), 2);
        assert_eq!(blocks[1]["type"], "paragraph");
    }

    #[test]
    fn starred_line_is_bold_paragraph() {
        let doc = to_adf("*Issue Summary:*");
        let block = &doc["content"][0];
        assert_eq!(block["type"], "paragraph");
        assert_eq!(block["content"][0]["marks"][0]["type"], "strong");
        assert_eq!(block["content"][0]["text"], "Issue Summary:");
    }

    #[test]
    fn empty_line_keeps_a_paragraph_break() {
        let doc = to_adf("a\n\nb");
        let blocks = doc["content"].as_array().expect("content");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1]["content"][0]["text"], "");
    }

    #[test]
    fn unterminated_fence_is_not_dropped() {
        let doc = to_adf("```\ndangling");
        let blocks = doc["content"].as_array().expect("content");
        assert_eq!(blocks[0]["type"], "codeBlock");
        assert_eq!(blocks[0]["content"][0]["text"], "dangling");
    }
}
