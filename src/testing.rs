//! 核心库测试共用的替身实现

use crate::app::Spawner;
use crate::auth::AuthClient;
use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::events::AuthEvent;
use crate::request::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, MockHttpClient};
use crate::router::HashLocation;
use crate::session::{MemoryStore, SessionStore};
use crate::ui::UiSurface;
use futures::future::LocalBoxFuture;
use qrdesk_shared::{QrCode, Timestamp};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

pub const BASE: &str = "http://api.test";
pub const T0: i64 = 1_700_000_000_000;

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

pub fn config() -> Rc<ClientConfig> {
    Rc::new(ClientConfig::new(BASE).unwrap())
}

// =========================================================
// 时钟
// =========================================================

pub struct ManualClock(Cell<i64>);

impl ManualClock {
    pub fn new(ms: i64) -> Self {
        Self(Cell::new(ms))
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by.as_millis() as i64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.0.get())
    }
}

// =========================================================
// 基于 MockHttpClient 的认证测试夹具
// =========================================================

pub struct AuthHarness {
    pub http: Rc<MockHttpClient>,
    pub store: Rc<MemoryStore>,
    pub clock: Rc<ManualClock>,
    pub auth: AuthClient,
    pub events: Rc<RefCell<Vec<AuthEvent>>>,
}

impl AuthHarness {
    pub fn new() -> Self {
        let http = Rc::new(MockHttpClient::new());
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(T0));
        let auth = AuthClient::new(config(), http.clone(), store.clone(), clock.clone());

        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        auth.events().subscribe(move |e| log.borrow_mut().push(e));

        Self {
            http,
            store,
            clock,
            auth,
            events,
        }
    }

    /// 写入一个 `ttl` 后过期的会话
    pub fn seed_session(&self, access: &str, refresh: &str, ttl: Duration) {
        let expiry = Timestamp::new(T0) + ttl;
        self.store.set("access", access);
        self.store.set("refresh", refresh);
        self.store.set("exp", &expiry.to_string());
    }

    pub fn mock_refresh_ok(&self, access: &str) {
        self.http.mock_response(
            HttpMethod::Post,
            &url("/auth/refresh"),
            200,
            json!({"access_token": access, "expires_in": 3600}),
        );
    }

    pub fn events(&self) -> Vec<AuthEvent> {
        self.events.borrow().clone()
    }
}

// =========================================================
// 模拟后端：认证 + 内存表上的 QR 增改查
// =========================================================

/// 行为与 QR API 一致：签发令牌、校验 Bearer、保存二维码
#[derive(Default)]
pub struct FakeBackend {
    codes: RefCell<Vec<QrCode>>,
    issued: Cell<u32>,
    valid_tokens: RefCell<Vec<String>>,
    fail_writes: RefCell<Option<(u16, String)>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes(codes: Vec<QrCode>) -> Self {
        let backend = Self::new();
        *backend.codes.borrow_mut() = codes;
        backend
    }

    pub fn fail_writes_with(&self, status: u16, body: serde_json::Value) {
        *self.fail_writes.borrow_mut() = Some((status, body.to_string()));
    }

    pub fn codes(&self) -> Vec<QrCode> {
        self.codes.borrow().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let wanted = url(path);
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url.split('?').next() == Some(wanted.as_str()))
            .count()
    }

    fn issue_token(&self) -> String {
        self.issued.set(self.issued.get() + 1);
        let token = format!("A{}", self.issued.get());
        self.valid_tokens.borrow_mut().push(token.clone());
        token
    }

    fn authorized(&self, req: &HttpRequest) -> bool {
        req.header("Authorization")
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|t| self.valid_tokens.borrow().iter().any(|v| v == t))
    }

    fn handle(&self, req: &HttpRequest) -> HttpResponse {
        let rest = req.url.strip_prefix(BASE).unwrap_or(&req.url);
        let (path, query) = match rest.split_once('?') {
            Some((p, q)) => (p, parse_query(q)),
            None => (rest, HashMap::new()),
        };

        match (req.method, path) {
            (HttpMethod::Post, "/auth/login") => {
                let access = self.issue_token();
                json_response(200, json!({"access_token": access, "refresh_token": "R1", "expires_in": 3600}))
            }
            (HttpMethod::Post, "/auth/refresh") => {
                if req.header("Authorization") != Some("Bearer R1") {
                    return json_response(401, json!({"detail": "Refresh token required"}));
                }
                let access = self.issue_token();
                json_response(200, json!({"access_token": access, "expires_in": 3600}))
            }
            (HttpMethod::Post, "/user/register") => json_response(200, json!({})),
            (_, p) if p.starts_with("/qr_code/") => {
                if !self.authorized(req) {
                    return json_response(401, json!({"detail": "Not authorized"}));
                }
                self.handle_qr(req.method, &p["/qr_code/".len()..], &query)
            }
            _ => json_response(404, json!({"detail": "Not Found"})),
        }
    }

    fn handle_qr(&self, method: HttpMethod, id: &str, query: &HashMap<String, String>) -> HttpResponse {
        if method != HttpMethod::Get {
            if let Some((status, body)) = self.fail_writes.borrow().clone() {
                return HttpResponse::new(status, body);
            }
        }

        match (method, id) {
            (HttpMethod::Get, "") => {
                json_response(200, serde_json::to_value(&*self.codes.borrow()).unwrap())
            }
            (HttpMethod::Post, "") => {
                let code = QrCode {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: query.get("name").cloned().unwrap_or_default(),
                    link: query.get("link").cloned().unwrap_or_default(),
                };
                self.codes.borrow_mut().push(code.clone());
                json_response(200, serde_json::to_value(code).unwrap())
            }
            (HttpMethod::Put, id) => {
                let mut codes = self.codes.borrow_mut();
                match codes.iter_mut().find(|c| c.id == id) {
                    Some(code) => {
                        code.name = query.get("name").cloned().unwrap_or_default();
                        code.link = query.get("link").cloned().unwrap_or_default();
                        json_response(200, serde_json::to_value(code.clone()).unwrap())
                    }
                    None => json_response(404, json!({"detail": "QR code not found"})),
                }
            }
            _ => json_response(405, json!({"detail": "Method Not Allowed"})),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FakeBackend {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let resp = self.handle(&req);
        self.requests.borrow_mut().push(req);
        Ok(resp)
    }
}

fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string())
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| {
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect()
}

// =========================================================
// 地址栏 / 视图 / 调度器
// =========================================================

#[derive(Default)]
pub struct RecordingLocation {
    hash: RefCell<String>,
    pub writes: RefCell<Vec<String>>,
}

impl RecordingLocation {
    pub fn at(hash: &str) -> Self {
        let location = Self::default();
        *location.hash.borrow_mut() = hash.to_string();
        location
    }

    /// 模拟用户修改地址栏（不记录写入）
    pub fn visit(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
    }
}

impl HashLocation for RecordingLocation {
    fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn set_hash(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
        self.writes.borrow_mut().push(hash.to_string());
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub lists: RefCell<Vec<String>>,
    pub previews: RefCell<Vec<String>>,
    pub forms: RefCell<Vec<(String, String)>>,
    pub alerts: RefCell<Vec<String>>,
}

impl RecordingSurface {
    pub fn last_list(&self) -> String {
        self.lists.borrow().last().cloned().unwrap_or_default()
    }

    pub fn last_form(&self) -> Option<(String, String)> {
        self.forms.borrow().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl UiSurface for RecordingSurface {
    fn render_list(&self, markup: &str) {
        self.lists.borrow_mut().push(markup.to_string());
    }

    fn render_preview(&self, markup: &str) {
        self.previews.borrow_mut().push(markup.to_string());
    }

    fn fill_edit_form(&self, name: &str, link: &str) {
        self.forms
            .borrow_mut()
            .push((name.to_string(), link.to_string()));
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

/// 收集提交的任务，`run_all` 运行它们（包括运行中新提交的任务）直到清空
#[derive(Default)]
pub struct QueueSpawner {
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
    pub spawned: Cell<usize>,
}

impl QueueSpawner {
    pub async fn run_all(&self) {
        loop {
            let batch: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            for task in batch {
                task.await;
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawned.set(self.spawned.get() + 1);
        self.tasks.borrow_mut().push(task);
    }
}
