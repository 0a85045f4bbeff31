// tests/common/mod.rs
//! In-memory Notion workspace used by the integration tests.
#![allow(dead_code)]

use notion2docs::{
    AppError, CommandLineInput, NotionId, NotionRepository, PaginatedResponse, SyncConfig,
    TreeFetcher,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const API_KEY: &str = "secret_abcdefghijklmnopqrstuvwxyz";

/// Deterministic 32-hex id for a small number.
pub fn hex(n: u32) -> String {
    format!("{:032x}", n)
}

pub fn id(n: u32) -> NotionId {
    NotionId::parse(&hex(n)).unwrap()
}

fn text(content: &str) -> Value {
    json!([{
        "type": "text",
        "text": {"content": content, "link": null},
        "annotations": {"bold": false, "italic": false, "strikethrough": false,
                        "underline": false, "code": false, "color": "default"},
        "plain_text": content,
        "href": null
    }])
}

fn block(n: u32, kind: &str, payload: Value, has_children: bool) -> Value {
    let mut value = json!({
        "object": "block",
        "id": hex(n),
        "type": kind,
        "has_children": has_children,
        "archived": false
    });
    value[kind] = payload;
    value
}

pub fn paragraph(n: u32, content: &str) -> Value {
    block(n, "paragraph", json!({"rich_text": text(content)}), false)
}

pub fn heading(n: u32, level: u8, content: &str) -> Value {
    block(
        n,
        &format!("heading_{}", level),
        json!({"rich_text": text(content)}),
        false,
    )
}

pub fn bullet(n: u32, content: &str) -> Value {
    block(n, "bulleted_list_item", json!({"rich_text": text(content)}), false)
}

pub fn toggle(n: u32, content: &str) -> Value {
    block(n, "toggle", json!({"rich_text": text(content)}), true)
}

pub fn child_page(n: u32, title: &str) -> Value {
    block(n, "child_page", json!({"title": title}), true)
}

/// A heading whose type-specific payload is missing altogether.
pub fn malformed_heading(n: u32) -> Value {
    json!({
        "object": "block",
        "id": hex(n),
        "type": "heading_1",
        "has_children": false
    })
}

pub fn page(n: u32, title: &str) -> Value {
    json!({
        "object": "page",
        "id": hex(n),
        "url": format!("https://www.notion.so/{}", hex(n)),
        "properties": {
            "title": {"id": "title", "type": "title", "title": text(title)}
        }
    })
}

pub fn post_row(n: u32, title: &str, summary: &str, tags: &[&str]) -> Value {
    let tags: Vec<Value> = tags.iter().map(|t| json!({"name": t})).collect();
    json!({
        "object": "page",
        "id": hex(n),
        "created_time": "2024-01-02T03:04:05.000Z",
        "last_edited_time": "2024-02-03T04:05:06.000Z",
        "url": format!("https://www.notion.so/{}", hex(n)),
        "properties": {
            "Name": {"type": "title", "title": text(title)},
            "Summary": {"type": "rich_text", "rich_text": text(summary)},
            "Tags": {"type": "multi_select", "multi_select": tags}
        }
    })
}

/// Scripted failure: HTTP status and body.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: u16,
    pub body: String,
}

impl Failure {
    pub fn rate_limited() -> Self {
        Self {
            status: 429,
            body: r#"{"object":"error","status":429,"code":"rate_limited","message":"Rate limited"}"#
                .to_string(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: 503,
            body: r#"{"object":"error","status":503,"code":"service_unavailable","message":"Down"}"#
                .to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find block"}"#
                .to_string(),
        }
    }

    fn to_error(&self) -> AppError {
        AppError::from_error_body(self.status, &self.body)
    }
}

#[derive(Default)]
struct Workspace {
    pages: HashMap<String, Value>,
    children: HashMap<String, Vec<Value>>,
    rows: HashMap<String, Vec<Value>>,
    /// Failures returned, in order, before any success
    scripted: HashMap<String, VecDeque<Failure>>,
    /// Failures returned on every call
    broken: HashMap<String, Failure>,
    calls: Vec<String>,
}

/// A Notion workspace held in memory.
#[derive(Default)]
pub struct FakeNotion {
    state: Mutex<Workspace>,
}

impl FakeNotion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_page(&self, n: u32, title: &str) {
        self.state.lock().unwrap().pages.insert(hex(n), page(n, title));
    }

    pub fn set_children(&self, n: u32, blocks: Vec<Value>) {
        self.state.lock().unwrap().children.insert(hex(n), blocks);
    }

    pub fn set_rows(&self, n: u32, rows: Vec<Value>) {
        self.state.lock().unwrap().rows.insert(hex(n), rows);
    }

    /// The next calls for `n` fail with `failures`, in order.
    pub fn fail_next(&self, n: u32, failures: Vec<Failure>) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .insert(hex(n), failures.into());
    }

    /// Every call for `n` fails.
    pub fn break_object(&self, n: u32, failure: Failure) {
        self.state.lock().unwrap().broken.insert(hex(n), failure);
    }

    /// Number of remote calls made for `n`.
    pub fn calls_for(&self, n: u32) -> usize {
        let key = hex(n);
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == key)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn record(&self, key: &str) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(key.to_string());
        if let Some(failure) = state.scripted.get_mut(key).and_then(VecDeque::pop_front) {
            return Err(failure.to_error());
        }
        if let Some(failure) = state.broken.get(key) {
            return Err(failure.to_error());
        }
        Ok(())
    }

    fn paginate(items: &[Value], page_size: u32, cursor: Option<String>) -> PaginatedResponse<Value> {
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + page_size as usize).min(items.len());
        let has_more = end < items.len();
        PaginatedResponse {
            results: items[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        }
    }
}

#[async_trait::async_trait]
impl NotionRepository for FakeNotion {
    async fn list_children(
        &self,
        parent: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        self.record(parent.as_str())?;
        let state = self.state.lock().unwrap();
        let items = state.children.get(parent.as_str()).cloned().unwrap_or_default();
        Ok(Self::paginate(&items, page_size, cursor))
    }

    async fn retrieve_page(&self, id: &NotionId) -> Result<Value, AppError> {
        self.record(id.as_str())?;
        let state = self.state.lock().unwrap();
        state.pages.get(id.as_str()).cloned().ok_or_else(|| {
            AppError::from_error_body(404, r#"{"code":"object_not_found","message":"no page"}"#)
        })
    }

    async fn query_database(
        &self,
        id: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Value>, AppError> {
        self.record(id.as_str())?;
        let state = self.state.lock().unwrap();
        let rows = state.rows.get(id.as_str()).cloned().unwrap_or_default();
        Ok(Self::paginate(&rows, page_size, cursor))
    }
}

/// A fetcher over the fake with no courtesy pause.
pub fn fetcher(fake: &Arc<FakeNotion>) -> TreeFetcher {
    let repository: Arc<dyn NotionRepository> = fake.clone();
    TreeFetcher::new(repository).with_courtesy_delay(Duration::ZERO)
}

/// Resolves a sync configuration rooted at page 1 and writing to `out`.
pub fn config(out: &Path, extra: &[&str]) -> SyncConfig {
    config_with_env(out, extra, &[])
}

pub fn config_with_env(out: &Path, extra: &[&str], env: &[(&str, &str)]) -> SyncConfig {
    let out = out.to_string_lossy().into_owned();
    let root = hex(1);
    let mut argv = vec!["notion2docs", root.as_str(), "--output-dir", out.as_str()];
    argv.extend_from_slice(extra);
    let cli = <CommandLineInput as clap::Parser>::parse_from(argv);

    let mut vars: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert("NOTION_API_KEY".to_string(), API_KEY.to_string());
    SyncConfig::resolve_with(cli, move |name| vars.get(name).cloned()).unwrap()
}

/// The "Docs" workspace: root with children A and B, B with child B1.
pub fn docs_workspace() -> Arc<FakeNotion> {
    let fake = FakeNotion::new();
    fake.add_page(1, "Docs");
    fake.set_children(
        1,
        vec![
            paragraph(10, "Welcome to the docs."),
            child_page(2, "A"),
            child_page(3, "B"),
        ],
    );
    fake.set_children(2, vec![paragraph(20, "Alpha body.")]);
    fake.set_children(
        3,
        vec![heading(30, 2, "Beta"), paragraph(31, "Beta body."), child_page(4, "B1")],
    );
    fake.set_children(4, vec![paragraph(40, "Leaf body.")]);
    fake
}
