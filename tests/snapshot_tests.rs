// tests/snapshot_tests.rs
//! Snapshot tests for generated documents.
//!
//! Uses the `insta` crate for snapshot management. Snapshots are stored as `.snap`
//! files under `tests/snapshots/` and reviewed with `cargo insta review`.

mod common;

use common::{config, docs_workspace, fetcher, hex, FakeNotion};
use notion2docs::run_sync;
use serde_json::{json, Value};
use std::fs;

fn run(style: Value) -> Value {
    let flag = |name: &str| style[name].as_bool().unwrap_or(false);
    json!({
        "type": "text",
        "text": {"content": style["text"], "link": null},
        "annotations": {
            "bold": flag("bold"),
            "italic": flag("italic"),
            "strikethrough": flag("strike"),
            "underline": flag("underline"),
            "code": flag("code"),
            "color": "default"
        },
        "plain_text": style["text"],
        "href": style["href"]
    })
}

fn block(n: u32, kind: &str, payload: Value, has_children: bool) -> Value {
    let mut value = json!({
        "object": "block",
        "id": hex(n),
        "type": kind,
        "has_children": has_children
    });
    value[kind] = payload;
    value
}

fn text_block(n: u32, kind: &str, text: &str) -> Value {
    block(n, kind, json!({"rich_text": [run(json!({"text": text}))]}), false)
}

fn style_guide() -> FakeNotion {
    let fake = FakeNotion::default();
    fake.add_page(1, "Style Guide");
    fake.set_children(
        1,
        vec![
            text_block(10, "heading_2", "Basics"),
            block(
                11,
                "paragraph",
                json!({"rich_text": [
                    run(json!({"text": "Plain "})),
                    run(json!({"text": "bold", "bold": true})),
                    run(json!({"text": " and "})),
                    run(json!({"text": "both", "italic": true, "code": true})),
                    run(json!({"text": ", "})),
                    run(json!({"text": "gone", "strike": true, "underline": true})),
                    run(json!({"text": " see "})),
                    run(json!({"text": "docs", "href": "https://example.com"})),
                ]}),
                false,
            ),
            text_block(12, "bulleted_list_item", "One"),
            block(
                13,
                "bulleted_list_item",
                json!({"rich_text": [run(json!({"text": "Two"}))]}),
                true,
            ),
            text_block(14, "numbered_list_item", "First"),
            text_block(15, "numbered_list_item", "Second"),
            block(
                16,
                "to_do",
                json!({"rich_text": [run(json!({"text": "Done"}))], "checked": true}),
                false,
            ),
            block(
                17,
                "to_do",
                json!({"rich_text": [run(json!({"text": "Todo"}))], "checked": false}),
                false,
            ),
            text_block(18, "quote", "Quoted"),
            block(
                19,
                "callout",
                json!({"rich_text": [run(json!({"text": "Careful"}))], "icon": {"type": "emoji", "emoji": "⚠️"}}),
                false,
            ),
            block(
                20,
                "code",
                json!({"rich_text": [run(json!({"text": "fn main() {}"}))], "language": "rust"}),
                false,
            ),
            block(
                21,
                "toggle",
                json!({"rich_text": [run(json!({"text": "More"}))]}),
                true,
            ),
            block(22, "divider", json!({}), false),
            block(23, "table_of_contents", json!({}), false),
            block(24, "child_database", json!({"title": "Tasks"}), false),
            block(25, "equation", json!({"expression": "e=mc^2"}), false),
            block(
                26,
                "image",
                json!({"type": "external", "external": {"url": "https://example.com/diagram.png"}}),
                false,
            ),
        ],
    );
    fake.set_children(13, vec![text_block(30, "bulleted_list_item", "Nested")]);
    fake.set_children(21, vec![text_block(31, "paragraph", "Hidden")]);
    fake
}

#[tokio::test]
async fn style_guide_page() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("docs");
    let fake = std::sync::Arc::new(style_guide());

    run_sync(&fetcher(&fake), &config(&out, &[])).await.unwrap();

    let document = fs::read_to_string(out.join("index.md")).unwrap();
    insta::assert_snapshot!("style_guide_page", document);
}

#[tokio::test]
async fn docs_root_page() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("docs");
    let fake = docs_workspace();

    run_sync(&fetcher(&fake), &config(&out, &[])).await.unwrap();

    let document = fs::read_to_string(out.join("index.md")).unwrap();
    insta::assert_snapshot!("docs_root_page", document);
}

#[tokio::test]
async fn docs_section_page() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("docs");
    let fake = docs_workspace();

    run_sync(&fetcher(&fake), &config(&out, &[])).await.unwrap();

    let document = fs::read_to_string(out.join("b/index.md")).unwrap();
    insta::assert_snapshot!("docs_section_page", document);
}
