// tests/bootstrap_snippet.rs
//
// Runs the bootstrap snippet in a JavaScript engine against a minimal
// document so the duplicate guard is checked by behaviour, not by text.

use boa_engine::{Context, Source};

use livebridge::bootstrap::{apply, render, BootstrapConfig, SCRIPT_ELEMENT_ID};

const DOCUMENT_STUB: &str = r#"
var window = {};
var appended = [];
var elements = {};
var document = {
  getElementById: function (id) { return elements[id] || null; },
  createElement: function (tag) { return { tagName: tag }; },
  getElementsByTagName: function (tag) {
    return [{
      appendChild: function (el) {
        appended.push(el);
        if (el.id) { elements[el.id] = el; }
      }
    }];
  }
};
"#;

fn snippet() -> String {
    render(&BootstrapConfig {
        protocol: "http".to_string(),
        hostname: "localhost".to_string(),
        port: 35729,
    })
}

fn eval(ctx: &mut Context, code: &str) -> boa_engine::JsValue {
    ctx.eval(Source::from_bytes(code))
        .unwrap_or_else(|err| panic!("evaluation failed: {err}\n{code}"))
}

#[test]
fn doubled_snippet_appends_one_script_element() {
    let js = snippet();
    let doubled = apply(&js, &js, true);

    let mut ctx = Context::default();
    eval(&mut ctx, DOCUMENT_STUB);
    eval(&mut ctx, &doubled);

    assert_eq!(eval(&mut ctx, "appended.length").as_number(), Some(1.0));
    assert_eq!(
        eval(&mut ctx, "appended[0].id")
            .as_string()
            .map(|s| s.to_std_string_escaped()),
        Some(SCRIPT_ELEMENT_ID.to_string())
    );
    assert_eq!(
        eval(&mut ctx, "appended[0].src")
            .as_string()
            .map(|s| s.to_std_string_escaped()),
        Some("http://localhost:35729/livereload.js".to_string())
    );
}

#[test]
fn snippet_followed_by_program_still_runs_the_program() {
    let mut ctx = Context::default();
    eval(&mut ctx, DOCUMENT_STUB);
    eval(&mut ctx, &apply(&snippet(), "var programRan = true;", true));

    assert_eq!(eval(&mut ctx, "programRan").as_boolean(), Some(true));
    assert_eq!(eval(&mut ctx, "appended.length").as_number(), Some(1.0));
}

#[test]
fn snippet_is_inert_without_a_window() {
    let mut ctx = Context::default();
    eval(&mut ctx, &snippet());
    assert_eq!(
        eval(&mut ctx, "typeof document").as_string().map(|s| s.to_std_string_escaped()),
        Some("undefined".to_string())
    );
}
