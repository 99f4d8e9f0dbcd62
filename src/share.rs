//! Share links and letter text for the clipboard

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::settings::PageConfig;
use crate::sim::Code;

/// Characters escaped in query values
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// `href` with its `code` parameter replaced (or appended).
///
/// Other parameters and the fragment are kept in order.
pub fn share_url(href: &str, code: &Code) -> String {
    let (rest, fragment) = match href.split_once('#') {
        Some((rest, frag)) => (rest, Some(frag)),
        None => (href, None),
    };
    let (base, query) = rest.split_once('?').unwrap_or((rest, ""));

    let value = utf8_percent_encode(&code.to_string(), QUERY_VALUE).to_string();
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let key = pair.split_once('=').map_or(pair, |(k, _)| k);
        if key == "code" {
            if !replaced {
                pairs.push(format!("code={value}"));
                replaced = true;
            }
        } else {
            pairs.push(pair.to_string());
        }
    }
    if !replaced {
        pairs.push(format!("code={value}"));
    }

    let mut url = format!("{base}?{}", pairs.join("&"));
    if let Some(frag) = fragment {
        url.push('#');
        url.push_str(frag);
    }
    url
}

/// Plain-text letter: message lines, caption, then signature
pub fn letter_text(config: &PageConfig, message: &[String]) -> String {
    let mut out = message.join("\n");
    if !config.caption.is_empty() {
        out.push_str("\n\n");
        out.push_str(&config.caption);
    }
    out.push_str("\n\n- ");
    out.push_str(&config.sign);
    out
}
