// src/bootstrap.rs

//! Client bootstrap snippet embedded in build output.
//!
//! When the generated JavaScript runs in a browser it loads the live-reload
//! client library from the notification endpoint, which then subscribes to
//! change notifications. The snippet guards on a fixed element id so that
//! duplicating it in one page still results in a single subscription.

/// Id given to the injected `<script>` element.
pub const SCRIPT_ELEMENT_ID: &str = "livebridge-livereload-script";

/// Path of the client library served by the notification endpoint.
pub const CLIENT_LIBRARY_PATH: &str = "livereload.js";

/// Where browsers should fetch the client library from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub protocol: String,
    pub hostname: String,
    pub port: u16,
}

impl BootstrapConfig {
    pub fn script_url(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            self.protocol, self.hostname, self.port, CLIENT_LIBRARY_PATH
        )
    }
}

/// Render the bootstrap snippet.
pub fn render(config: &BootstrapConfig) -> String {
    let url = config.script_url();
    [
        "// livebridge live-reload bootstrap".to_string(),
        "(function() {".to_string(),
        "  if (typeof window === \"undefined\") { return; }".to_string(),
        format!("  var id = {};", js_string(SCRIPT_ELEMENT_ID)),
        "  if (document.getElementById(id)) { return; }".to_string(),
        "  var el = document.createElement(\"script\");".to_string(),
        "  el.id = id;".to_string(),
        "  el.async = true;".to_string(),
        format!("  el.src = {};", js_string(&url)),
        "  document.getElementsByTagName(\"head\")[0].appendChild(el);".to_string(),
        "}());".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Prepend `snippet` to `source` when `inject` is set.
///
/// The caller decides `inject`: script-tag injection must be enabled and the
/// controller must hold a usable endpoint.
pub fn apply(snippet: &str, source: &str, inject: bool) -> String {
    if inject {
        let mut out = String::with_capacity(snippet.len() + source.len());
        out.push_str(snippet);
        out.push_str(source);
        out
    } else {
        source.to_string()
    }
}

/// Quote a value as a JavaScript string literal.
fn js_string(value: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    serde_json::Value::from(value).to_string()
}
