//! Live browser preview.
//!
//! Serves a shell page over HTTP and pushes every rendered document to it
//! over a WebSocket. The shell runs the document inside a sandboxed
//! `<iframe srcdoc>`, so user scripts never share an origin with anything.
//! A bridge script prepended to the document forwards `console.*` calls and
//! uncaught errors back through the socket as `PreviewMessage` frames.
//!
//! ```text
//! publish() --[render]--> shell page --srcdoc--> sandboxed iframe
//!     sink  <--[console/error]-- shell page <--postMessage-- bridge
//! ```

use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use tiny_http::{Header, Request, Response, Server, StatusCode};
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::app::controllers::preview::PreviewSurface;
use crate::app::domain::PreviewMessage;
use crate::app::services::composer::ComposedDocument;
use crate::app::infrastructure::error::{AppError, Result};

/// Ports tried after the configured one before giving up.
const MAX_PORT_RETRIES: u16 = 10;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

/// Receives messages posted by the running preview. Called on the server's
/// reader thread.
pub type PreviewSink = Box<dyn Fn(PreviewMessage) + Send + 'static>;

/// Installed ahead of the user document. Kept on one line so error line
/// numbers still match the composed document.
const BRIDGE_SCRIPT: &str = concat!(
    "<script>(function(){",
    "var send=function(m){try{parent.postMessage(m,'*');}catch(e){}};",
    "var show=function(a){if(typeof a==='string')return a;",
    "try{var s=JSON.stringify(a);return s===undefined?String(a):s;}catch(e){return String(a);}};",
    "['log','info','warn','error','debug'].forEach(function(k){",
    "var orig=console[k];",
    "console[k]=function(){var args=[].slice.call(arguments).map(show);",
    "send({type:'console',method:k,args:args});",
    "if(orig)orig.apply(console,arguments);};});",
    "window.addEventListener('error',function(e){",
    "send({type:'error',message:String(e.message),line:e.lineno||0});});",
    "window.addEventListener('unhandledrejection',function(e){",
    "send({type:'error',message:'Unhandled promise rejection: '+show(e.reason),line:0});});",
    "})();</script>",
);

const SHELL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>CodeBench Preview</title>
<style>html,body{margin:0;height:100%}iframe{border:0;width:100%;height:100%;display:block}</style>
</head>
<body>
<iframe id="preview" sandbox="allow-scripts allow-modals"></iframe>
<script>
(function () {
  var frame = document.getElementById('preview');
  var ws = null;
  var revision = -1;
  function connect() {
    ws = new WebSocket('ws://' + location.hostname + ':__WS_PORT__');
    ws.onmessage = function (ev) {
      var msg = JSON.parse(ev.data);
      if (msg.type === 'render' && msg.revision !== revision) {
        revision = msg.revision;
        frame.srcdoc = msg.html;
      }
    };
    ws.onclose = function () { setTimeout(connect, 1000); };
  }
  window.addEventListener('message', function (ev) {
    if (ev.source !== frame.contentWindow || !ws || ws.readyState !== 1) return;
    ws.send(JSON.stringify(ev.data));
  });
  connect();
})();
</script>
</body>
</html>
"#;

struct Shared {
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
    /// Last render frame, replayed to clients that connect later.
    latest: Mutex<Option<String>>,
    running: AtomicBool,
}

/// Handle to a running live preview server. Dropping it stops every thread.
pub struct LiveServer {
    http: Arc<Server>,
    http_port: u16,
    ws_port: u16,
    shared: Arc<Shared>,
    /// Renders published through `PreviewSurface`.
    revision: u64,
}

impl LiveServer {
    /// Bind the HTTP and WebSocket listeners on consecutive free ports
    /// starting at `base_port` and spawn the server threads.
    pub fn start(base_port: u16, sink: PreviewSink) -> Result<Self> {
        let (http, http_port) = bind_http(base_port)?;
        let ws_base = if base_port == 0 { 0 } else { http_port.saturating_add(1) };
        let (listener, ws_port) = try_bind_port(ws_base)?;
        listener.set_nonblocking(true)?;

        let http = Arc::new(http);
        let shared = Arc::new(Shared {
            clients: Mutex::new(Vec::new()),
            latest: Mutex::new(None),
            running: AtomicBool::new(true),
        });

        let http_for_loop = Arc::clone(&http);
        thread::spawn(move || serve_http(&http_for_loop, ws_port));

        let shared_for_accept = Arc::clone(&shared);
        thread::spawn(move || accept_loop(listener, &shared_for_accept));

        let shared_for_read = Arc::clone(&shared);
        thread::spawn(move || reader_loop(&shared_for_read, sink));

        log::info!("live preview at http://127.0.0.1:{http_port} (ws {ws_port})");
        Ok(Self {
            http,
            http_port,
            ws_port,
            shared,
            revision: 0,
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.http_port)
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn ws_port(&self) -> u16 {
        self.ws_port
    }

    pub fn client_count(&self) -> usize {
        self.shared.clients.lock().len()
    }

    /// Send `document` to every connected page and remember it for pages
    /// that connect later.
    pub fn publish(&self, revision: u64, document: &str) {
        let frame = render_frame(revision, document);
        *self.shared.latest.lock() = Some(frame.clone());

        let msg = Message::Text(frame.into());
        let mut clients = self.shared.clients.lock();
        let count = clients.len();
        clients.retain_mut(|ws| send_or_drop(ws, msg.clone()));
        log::debug!("render {revision} sent to {count} client(s)");
    }
}

impl PreviewSurface for LiveServer {
    fn load_document(&mut self, doc: &ComposedDocument) {
        self.revision += 1;
        self.publish(self.revision, doc.as_str());
    }

    /// Pages that are not open yet get the latest render on connect.
    fn is_visible(&self) -> bool {
        true
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Relaxed);
        self.http.unblock();
        for ws in self.shared.clients.lock().iter_mut() {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }
}

fn render_frame(revision: u64, document: &str) -> String {
    let mut html = String::with_capacity(BRIDGE_SCRIPT.len() + document.len());
    html.push_str(BRIDGE_SCRIPT);
    html.push_str(document);
    serde_json::json!({
        "type": "render",
        "revision": revision,
        "html": html,
    })
    .to_string()
}

/// A pending write on a non-blocking socket stays buffered and is flushed by
/// the reader loop.
fn send_or_drop(ws: &mut WebSocket<TcpStream>, msg: Message) -> bool {
    match ws.send(msg) {
        Ok(()) => true,
        Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
        Err(e) => {
            log::debug!("preview client dropped: {e}");
            false
        }
    }
}

fn bind_http(base_port: u16) -> Result<(Server, u16)> {
    let mut last_error = String::new();
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match Server::http(("127.0.0.1", port)) {
            Ok(server) => {
                let actual = server.server_addr().to_ip().map_or(port, |addr| addr.port());
                if offset > 0 {
                    log::info!("port {base_port} in use, live preview using {actual}");
                }
                return Ok((server, actual));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(AppError::Server(format!(
        "no free HTTP port in {}..{}: {}",
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES),
        last_error
    )))
}

fn try_bind_port(base_port: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => {
                let actual = listener.local_addr()?.port();
                return Ok((listener, actual));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(AppError::Server(format!(
        "no free WebSocket port after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn serve_http(server: &Server, ws_port: u16) {
    let page = SHELL_PAGE.replace("__WS_PORT__", &ws_port.to_string());
    for request in server.incoming_requests() {
        if let Err(e) = respond(request, &page) {
            log::debug!("live preview request failed: {e}");
        }
    }
    log::debug!("live preview HTTP loop stopped");
}

fn respond(request: Request, page: &str) -> std::io::Result<()> {
    let path = request.url().split('?').next().unwrap_or("/");
    if path == "/" || path == "/index.html" {
        let mut response = Response::from_string(page);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
            response = response.with_header(header);
        }
        request.respond(response)
    } else {
        request.respond(Response::from_string("Not Found").with_status_code(StatusCode(404)))
    }
}

fn accept_loop(listener: TcpListener, shared: &Shared) {
    while shared.running.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, addr)) => {
                log::debug!("preview client connected: {addr}");
                add_client(stream, shared);
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                log::warn!("live preview accept error: {e}");
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn add_client(stream: TcpStream, shared: &Shared) {
    // Blocking for the handshake, non-blocking for polling afterwards.
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));
    let mut ws = match tungstenite::accept(stream) {
        Ok(ws) => ws,
        Err(e) => {
            log::debug!("preview handshake failed: {e}");
            return;
        }
    };
    let _ = ws.get_ref().set_read_timeout(None);
    let _ = ws.get_ref().set_nonblocking(true);

    // Replay and register under one lock so no publish falls between them.
    let mut clients = shared.clients.lock();
    let latest = shared.latest.lock().clone();
    if let Some(frame) = latest {
        if !send_or_drop(&mut ws, Message::Text(frame.into())) {
            return;
        }
    }
    clients.push(ws);
}

fn reader_loop(shared: &Shared, sink: PreviewSink) {
    while shared.running.load(Ordering::Relaxed) {
        thread::sleep(POLL_INTERVAL);

        let mut inbound = Vec::new();
        {
            let mut clients = shared.clients.lock();
            clients.retain_mut(|ws| poll_client(ws, &mut inbound));
        }
        for text in inbound {
            if let Some(msg) = PreviewMessage::from_json(&text) {
                sink(msg);
            }
        }
    }
}

/// Drain every frame the client has sent. Returns false once it is gone.
fn poll_client(ws: &mut WebSocket<TcpStream>, inbound: &mut Vec<String>) -> bool {
    loop {
        match ws.read() {
            Ok(Message::Text(text)) => inbound.push(text.as_str().to_owned()),
            Ok(Message::Close(_)) => return false,
            Ok(_) => {}
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => break,
            Err(e) => {
                log::debug!("preview client dropped: {e}");
                return false;
            }
        }
    }
    match ws.flush() {
        Ok(()) => true,
        Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
        Err(_) => false,
    }
}
