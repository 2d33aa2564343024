//! Loopback listener for the authorization redirect
//!
//! Binds a local TCP port, accepts one connection from the user's browser
//! after the provider redirects, and extracts the `code` and `state` query
//! parameters from the request line. The listener does not validate the
//! state; it hands both values to [`crate::flow::advance`], which owns
//! that check.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};

use crate::error::Result;
use crate::flow::RedirectParams;

/// Accepts one browser connection on `listener` and returns the redirect
/// query parameters.
///
/// The request line is parsed as `GET /callback?code=...&state=... HTTP/1.1`.
/// A minimal HTTP 200 page is written back so the browser tab does not
/// spin; both parameters are optional in the result because the provider
/// may redirect with an error instead of a code.
///
/// # Errors
///
/// Returns an error if the connection cannot be accepted or the request
/// cannot be read.
pub async fn accept_redirect(listener: tokio::net::TcpListener) -> Result<RedirectParams> {
    let (stream, _peer) = listener.accept().await?;

    // Blocking std I/O is enough for one request line; no HTTP server needed.
    tokio::task::spawn_blocking(move || -> Result<RedirectParams> {
        let std_stream = stream.into_std()?;
        // into_std leaves the socket nonblocking; switch back so the
        // line reads below block until the browser's request arrives.
        std_stream.set_nonblocking(false)?;
        let mut write_stream = std_stream.try_clone()?;
        let reader = BufReader::new(std_stream);

        let mut request_line = String::new();
        for line in reader.lines() {
            let line = line?;
            // Headers end at the first empty line.
            if line.is_empty() {
                break;
            }
            if request_line.is_empty() {
                request_line = line;
            }
        }

        let response = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\nLogin received. You may close this tab and return to the terminal.";
        let _ = write_stream.write_all(response.as_bytes());

        let path = request_line.split_whitespace().nth(1).unwrap_or("/");
        let query = path.split_once('?').map(|x| x.1).unwrap_or("");
        let params = parse_query_string(query);

        Ok(RedirectParams {
            code: params.get("code").cloned(),
            state: params.get("state").cloned(),
        })
    })
    .await
    .map_err(|e| anyhow::anyhow!("callback task panicked: {e}"))?
}

/// Parses a URL query string into a key-value map.
///
/// Values are percent-decoded. Duplicate keys are overwritten by the last
/// occurrence.
fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pair in query.split('&') {
        let mut iter = pair.splitn(2, '=');
        let key = iter.next().unwrap_or("").to_string();
        let value = iter.next().unwrap_or("").to_string();
        if !key.is_empty() {
            map.insert(key, percent_decode(&value));
        }
    }
    map
}

/// Minimal percent-decoding of a query parameter value: `+` becomes a
/// space and `%XX` sequences become the corresponding byte.
///
/// Decodes into a byte buffer first so multibyte UTF-8 sequences
/// (`%C3%A9` and friends) reassemble correctly; invalid sequences are
/// replaced rather than rejected.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'+' {
            out.push(b' ');
            i += 1;
        } else if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(hex) = std::str::from_utf8(&bytes[i + 1..i + 3]) {
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    out.push(byte);
                    i += 3;
                    continue;
                }
            }
            out.push(bytes[i]);
            i += 1;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
