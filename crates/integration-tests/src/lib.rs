//! Test harness for the ShopPro client engine.
//!
//! Drives a fully assembled [`App`] against a scripted in-process bridge,
//! so end-to-end flows (sign in, add to cart, check out) run without a
//! backend. Response delays combined with `#[tokio::test(start_paused =
//! true)]` make interleaved-completion scenarios deterministic.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use shoppro_client::rpc::{BoxFuture, RpcTransport, TransportError};
use shoppro_client::{App, AppState, Markup, MarkupSink, Notifier, PageId, PageParams,
    PageRenderer, ToastKind};
use shoppro_core::Role;

// =============================================================================
// Scripted bridge
// =============================================================================

/// A call the engine made through the bridge.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub args: Vec<Value>,
}

struct Scripted {
    body: String,
    delay: Option<Duration>,
}

/// In-process [`RpcTransport`] answering from scripted envelopes.
///
/// One-shot responses (`enqueue*`) are consumed in invoke order and take
/// priority over the per-method fallback (`respond`). An unscripted method
/// fails as a transport error, which makes the offending call visible in
/// the test output.
#[derive(Default)]
pub struct ScriptedBridge {
    queues: Mutex<HashMap<String, VecDeque<Scripted>>>,
    fallbacks: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reusable response for `method`.
    pub fn respond(&self, method: &str, envelope: &Value) {
        self.fallbacks
            .lock()
            .expect("fallbacks lock")
            .insert(method.to_owned(), envelope.to_string());
    }

    /// Script a one-shot response for `method`.
    pub fn enqueue(&self, method: &str, envelope: &Value) {
        self.enqueue_scripted(method, envelope, None);
    }

    /// Script a one-shot response that completes only after `delay` of
    /// (virtual) time.
    pub fn enqueue_delayed(&self, method: &str, envelope: &Value, delay: Duration) {
        self.enqueue_scripted(method, envelope, Some(delay));
    }

    fn enqueue_scripted(&self, method: &str, envelope: &Value, delay: Option<Duration>) {
        self.queues
            .lock()
            .expect("queues lock")
            .entry(method.to_owned())
            .or_default()
            .push_back(Scripted {
                body: envelope.to_string(),
                delay,
            });
    }

    /// Every call made so far, in invoke order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// How many times `method` was invoked.
    #[must_use]
    pub fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|call| call.method == method)
            .count()
    }
}

impl RpcTransport for ScriptedBridge {
    fn invoke<'a>(
        &'a self,
        method: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<String, TransportError>> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            method: method.to_owned(),
            args: args.to_vec(),
        });

        let scripted = self
            .queues
            .lock()
            .expect("queues lock")
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        let fallback = self
            .fallbacks
            .lock()
            .expect("fallbacks lock")
            .get(method)
            .cloned();

        Box::pin(async move {
            match scripted {
                Some(Scripted { body, delay }) => {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(body)
                }
                None => fallback.ok_or_else(|| {
                    TransportError::Unavailable(format!("no scripted response for {method}"))
                }),
            }
        })
    }
}

// =============================================================================
// Presentation recorders
// =============================================================================

/// Captures every toast the engine emits.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.toasts.lock().expect("toasts lock").clone()
    }

    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.toasts
            .lock()
            .expect("toasts lock")
            .iter()
            .any(|(m, _)| m == message)
    }

    #[must_use]
    pub fn count_of(&self, message: &str) -> usize {
        self.toasts
            .lock()
            .expect("toasts lock")
            .iter()
            .filter(|(m, _)| m == message)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.toasts
            .lock()
            .expect("toasts lock")
            .push((message.to_owned(), kind));
    }
}

/// Captures committed markup and scroll resets.
#[derive(Default)]
pub struct RecordingSink {
    commits: Mutex<Vec<String>>,
    scroll_resets: AtomicUsize,
}

impl RecordingSink {
    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("commits lock").clone()
    }

    #[must_use]
    pub fn last_commit(&self) -> Option<String> {
        self.commits.lock().expect("commits lock").last().cloned()
    }

    #[must_use]
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets.load(Ordering::SeqCst)
    }
}

impl MarkupSink for RecordingSink {
    fn commit(&self, markup: Markup) {
        self.commits
            .lock()
            .expect("commits lock")
            .push(markup.into_string());
    }

    fn reset_scroll(&self) {
        self.scroll_resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// Renderer producing one recognizable element per page, with optional
/// per-page render delays for supersession tests.
#[derive(Default)]
pub struct StubRenderer {
    delays: Mutex<HashMap<PageId, Duration>>,
}

impl StubRenderer {
    /// Make renders of `page` take `delay` of (virtual) time.
    pub fn delay_page(&self, page: PageId, delay: Duration) {
        self.delays.lock().expect("delays lock").insert(page, delay);
    }
}

impl PageRenderer for StubRenderer {
    fn render<'a>(
        &'a self,
        page: PageId,
        _params: &'a PageParams,
        _state: &'a AppState,
    ) -> BoxFuture<'a, Result<Markup, shoppro_client::AppError>> {
        let delay = self.delays.lock().expect("delays lock").get(&page).copied();
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Markup::new(format!("<section data-page=\"{page}\"></section>")))
        })
    }
}

// =============================================================================
// Assembled harness
// =============================================================================

/// A fully wired [`App`] plus handles to its scripted surroundings.
pub struct Harness {
    pub app: App,
    pub bridge: Arc<ScriptedBridge>,
    pub notifier: Arc<RecordingNotifier>,
    pub sink: Arc<RecordingSink>,
    pub renderer: Arc<StubRenderer>,
}

/// Assemble an app over a fresh scripted bridge.
///
/// Installs a `tracing` subscriber honoring `RUST_LOG` so engine logs show
/// up under `--nocapture`; repeated installs are ignored.
#[must_use]
pub fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let bridge = Arc::new(ScriptedBridge::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let sink = Arc::new(RecordingSink::default());
    let renderer = Arc::new(StubRenderer::default());

    let app = App::new(
        bridge.clone(),
        renderer.clone(),
        sink.clone(),
        notifier.clone(),
    );

    Harness {
        app,
        bridge,
        notifier,
        sink,
        renderer,
    }
}

// =============================================================================
// Envelope fixtures
// =============================================================================

/// A `success: true` envelope carrying `payload`'s fields.
#[must_use]
pub fn ok(payload: &Value) -> Value {
    let mut envelope = json!({"success": true});
    if let (Some(envelope), Some(payload)) = (envelope.as_object_mut(), payload.as_object()) {
        for (key, value) in payload {
            envelope.insert(key.clone(), value.clone());
        }
    }
    envelope
}

/// A `success: false` envelope with a backend message.
#[must_use]
pub fn fail(message: &str) -> Value {
    json!({"success": false, "message": message})
}

/// A user record as the bridge serializes it.
#[must_use]
pub fn user_json(id: &str, email: &str, role: Role) -> Value {
    json!({
        "id": id,
        "email": email,
        "firstname": "Test",
        "lastname": "User",
        "role": role.to_string(),
        "created_at": "2024-03-01T10:00:00",
        "last_login": ""
    })
}

/// A product summary as the bridge serializes it. `price` is the backend's
/// decimal string, e.g. `"10.00"`.
#[must_use]
pub fn product_json(id: &str, name: &str, price: &str, stock: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image_url": "",
        "stock": stock
    })
}

/// A cart envelope built from `(product, quantity)` lines, with the count
/// the backend would report.
#[must_use]
pub fn cart_json(lines: &[(Value, u32)]) -> Value {
    let count: u32 = lines.iter().map(|(_, quantity)| quantity).sum();
    let items: Vec<Value> = lines
        .iter()
        .map(|(product, quantity)| {
            json!({
                "product_id": product.get("id").cloned().unwrap_or(Value::Null),
                "quantity": quantity,
                "product": product
            })
        })
        .collect();
    json!({"cart": items, "count": count})
}

/// An empty cart envelope.
#[must_use]
pub fn empty_cart_json() -> Value {
    json!({"cart": [], "count": 0})
}

/// Script a login for `role` and sign the harness in.
///
/// # Panics
///
/// Panics if the scripted login fails.
pub async fn sign_in_as(h: &Harness, role: Role) {
    h.bridge
        .enqueue("login", &ok(&json!({"user": user_json("u-1", "test@shoppro.fr", role)})));
    h.bridge.respond("get_cart", &ok(&empty_cart_json()));

    let password = secrecy::SecretString::from("hunter2");
    h.app
        .session()
        .login("test@shoppro.fr", &password)
        .await
        .expect("scripted login");
}
