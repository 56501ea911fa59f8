// --- File: crates/atelier_gmail/src/mime.rs ---
//! Plain-text MIME message building for the Gmail `messages.send` endpoint.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

/// RFC 2047 "B" encoding of a header value.
pub fn encode_header_word(value: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
}

/// Header values must stay on one line.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// `"Name" <address>`, encoding the name when it is not plain ASCII.
pub fn mailbox(name: &str, address: &str) -> String {
    let name = single_line(name);
    let address = single_line(address);
    if name.is_empty() {
        return format!("<{}>", address);
    }
    if name.is_ascii() && !name.contains('"') {
        format!("\"{}\" <{}>", name, address)
    } else {
        format!("{} <{}>", encode_header_word(&name), address)
    }
}

/// Builds the RFC 5322 message: UTF-8 plain text, 8bit body, encoded subject.
pub fn build_message(from: &str, to: &str, subject: &str, body: &str) -> String {
    let mut message = String::with_capacity(body.len() + 256);
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
    message.push_str("Content-Transfer-Encoding: 8bit\r\n");
    message.push_str(&format!("From: {}\r\n", single_line(from)));
    message.push_str(&format!("To: {}\r\n", single_line(to)));
    message.push_str(&format!(
        "Subject: {}\r\n",
        encode_header_word(&single_line(subject))
    ));
    message.push_str("\r\n");
    message.push_str(body);
    message
}

/// The `raw` field of a Gmail message: the whole message, base64url encoded.
pub fn encode_raw(message: &str) -> String {
    URL_SAFE.encode(message.as_bytes())
}
