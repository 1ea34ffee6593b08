//! WASM live feed client using `web-sys::WebSocket`.
//!
//! - `web-sys::WebSocket` + `wasm-bindgen` closures
//! - Fixed-delay reconnection on every close, cancellable via `disconnect()`
//! - Callback-based event delivery (`on_event: impl Fn(FeedEvent)`)
//!
//! State lives in one `Rc<RefCell<Inner>>` owned by the client value. The
//! browser callbacks hold only `Weak` references to it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures_util::future::{AbortHandle, Abortable};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, WebSocket};

use crate::ws::{FeedConfig, FeedEvent, ReadyState};

/// Closures attached to the current socket. Kept alive until the socket is released.
struct Handlers {
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(ErrorEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    config: FeedConfig,
    on_event: Rc<dyn Fn(FeedEvent)>,
    socket: Option<WebSocket>,
    handlers: Option<Handlers>,
    reconnect: Option<AbortHandle>,
    stopped: bool,
}

/// Browser live feed client.
pub struct FeedClient {
    inner: Rc<RefCell<Inner>>,
}

impl FeedClient {
    /// Create a client. `on_event` receives every connection event and row.
    pub fn new(config: FeedConfig, on_event: impl Fn(FeedEvent) + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                config,
                on_event: Rc::new(on_event),
                socket: None,
                handlers: None,
                reconnect: None,
                stopped: false,
            })),
        }
    }

    /// Open the connection. A no-op while one is connecting or open.
    pub fn connect(&self) {
        self.inner.borrow_mut().stopped = false;
        open(&self.inner);
    }

    /// Close the connection and cancel any pending reconnect.
    pub fn disconnect(&self) {
        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.stopped = true;
            if let Some(handle) = inner.reconnect.take() {
                handle.abort();
            }
            release_socket(&mut inner, true)
        };
        defer_drop(released);
    }

    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    pub fn ready_state(&self) -> ReadyState {
        let inner = self.inner.borrow();
        if inner.reconnect.is_some() {
            return ReadyState::Closed;
        }
        inner
            .socket
            .as_ref()
            .map(|ws| ReadyState::from(ws.ready_state()))
            .unwrap_or(ReadyState::Closed)
    }
}

impl Drop for FeedClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// ─── Internal ────────────────────────────────────────────────────────────────

fn emit(inner: &Rc<RefCell<Inner>>, event: FeedEvent) {
    // clone the callback out so it can call back into the client
    let on_event = Rc::clone(&inner.borrow().on_event);
    on_event(event);
}

fn open(inner: &Rc<RefCell<Inner>>) {
    let url = {
        let state = inner.borrow();
        if let Some(ws) = state.socket.as_ref() {
            match ReadyState::from(ws.ready_state()) {
                ReadyState::Connecting | ReadyState::Open => {
                    tracing::info!("Feed already connected or connecting, skipping");
                    return;
                }
                ReadyState::Closed => {}
            }
        }
        state.config.url.clone()
    };

    tracing::info!(url = %url, "Opening live feed");
    match WebSocket::new(&url) {
        Ok(ws) => attach(inner, ws),
        Err(err) => {
            let reason = extract_js_error(&err);
            tracing::error!("Failed to create WebSocket: {}", reason);
            emit(
                inner,
                FeedEvent::Disconnected {
                    code: None,
                    reason: reason.clone(),
                },
            );
            schedule_reconnect(inner);
        }
    }
}

fn attach(inner: &Rc<RefCell<Inner>>, ws: WebSocket) {
    let weak = Rc::downgrade(inner);

    let onopen = {
        let weak = Weak::clone(&weak);
        Closure::<dyn FnMut()>::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            tracing::info!("Live feed connected");
            emit(&inner, FeedEvent::Connected);
        })
    };

    let onmessage = {
        let weak = Weak::clone(&weak);
        Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
            let Some(inner) = weak.upgrade() else { return };
            match e.data().as_string() {
                Some(text) => emit(&inner, FeedEvent::Row(text)),
                None => tracing::debug!("Ignoring non-text frame"),
            }
        })
    };

    let onerror = {
        let weak = Weak::clone(&weak);
        Closure::<dyn FnMut(_)>::new(move |e: ErrorEvent| {
            let Some(inner) = weak.upgrade() else { return };
            let msg = extract_js_error(&e.error());
            tracing::warn!("Live feed error: {}", msg);
            emit(&inner, FeedEvent::Error(msg));
        })
    };

    let onclose = Closure::<dyn FnMut(_)>::new(move |e: CloseEvent| {
        let Some(inner) = weak.upgrade() else { return };
        let code = e.code();
        let reason = e.reason();
        tracing::info!(code, reason = %reason, "Live feed closed");

        let released = release_socket(&mut inner.borrow_mut(), false);
        // this closure is one of the released handlers
        defer_drop(released);

        emit(
            &inner,
            FeedEvent::Disconnected {
                code: Some(code),
                reason,
            },
        );
        schedule_reconnect(&inner);
    });

    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    let mut state = inner.borrow_mut();
    state.socket = Some(ws);
    state.handlers = Some(Handlers {
        _onopen: onopen,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    });
}

/// Queue exactly one reconnect after the fixed delay.
fn schedule_reconnect(inner: &Rc<RefCell<Inner>>) {
    let mut state = inner.borrow_mut();
    if state.stopped || !state.config.reconnect {
        return;
    }
    if state.reconnect.is_some() {
        tracing::info!("Reconnect already scheduled, skipping");
        return;
    }

    let delay_ms = state.config.reconnect_delay_ms.min(u32::MAX as u64) as u32;
    tracing::info!("Reconnecting in {}ms", delay_ms);

    let (abort_handle, abort_reg) = AbortHandle::new_pair();
    state.reconnect = Some(abort_handle);

    let weak = Rc::downgrade(inner);
    wasm_bindgen_futures::spawn_local(async move {
        let wait = Abortable::new(TimeoutFuture::new(delay_ms), abort_reg);
        if wait.await.is_err() {
            return;
        }
        if let Some(inner) = weak.upgrade() {
            inner.borrow_mut().reconnect = None;
            open(&inner);
        }
    });
}

/// Detach the current socket. Returns its handlers so the caller can drop
/// them outside any callback they may be running in.
fn release_socket(inner: &mut Inner, close: bool) -> Option<Handlers> {
    if let Some(ws) = inner.socket.take() {
        ws.set_onopen(None);
        ws.set_onmessage(None);
        ws.set_onerror(None);
        ws.set_onclose(None);
        if close && ReadyState::from(ws.ready_state()) != ReadyState::Closed {
            let _ = ws.close_with_code_and_reason(1000, "Client disconnect");
        }
    }
    inner.handlers.take()
}

fn defer_drop(handlers: Option<Handlers>) {
    if let Some(handlers) = handlers {
        wasm_bindgen_futures::spawn_local(async move {
            drop(handlers);
        });
    }
}

fn extract_js_error(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        let name = error.name().as_string().unwrap_or_else(|| "Error".to_string());
        let message = error.message().as_string().unwrap_or_default();
        return if message.is_empty() {
            name
        } else {
            format!("{}: {}", name, message)
        };
    }

    if let Some(s) = err.as_string().filter(|s| !s.is_empty()) {
        return s;
    }

    if err.is_undefined() || err.is_null() {
        return "WebSocket error".to_string();
    }

    "Unknown WebSocket error".to_string()
}
