//! Plan text arrives as Markdown from the model; this renders it for the page.

use pulldown_cmark::{Event, Options, Parser, html};

/// Renders `text` as HTML. Raw HTML in the input is shown as text, never
/// passed through.
pub(crate) fn plan_html(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}
