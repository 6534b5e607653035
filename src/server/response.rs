use http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use http::{HeaderValue, Response, StatusCode};
use std::io::{self, Write};

/// Reason phrase for the status codes the kernel emits.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown"),
    }
}

/// Response with a body and a content type. Invalid statuses fall back to 500.
#[must_use]
pub fn text_response(status: u16, content_type: &str, body: Vec<u8>) -> Response<Vec<u8>> {
    let mut res = Response::new(body);
    *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if let Ok(value) = HeaderValue::from_str(content_type) {
        res.headers_mut().insert(CONTENT_TYPE, value);
    }
    res
}

/// `302 Found` redirect with an empty body.
#[must_use]
pub fn redirect(location: &str) -> Response<Vec<u8>> {
    let mut res = Response::new(Vec::new());
    *res.status_mut() = StatusCode::FOUND;
    if let Ok(value) = HeaderValue::from_str(location) {
        res.headers_mut().insert(LOCATION, value);
    }
    res
}

/// Write `res` as a CGI response: `Status:` line, headers, blank line, body.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_cgi_response<W: Write>(res: &Response<Vec<u8>>, out: &mut W) -> io::Result<()> {
    let status = res.status().as_u16();
    write!(out, "Status: {} {}\r\n", status, status_reason(status))?;
    for (name, value) in res.headers() {
        out.write_all(name.as_str().as_bytes())?;
        out.write_all(b": ")?;
        out.write_all(value.as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    if !res.headers().contains_key(CONTENT_LENGTH) {
        write!(out, "{}: {}\r\n", CONTENT_LENGTH, res.body().len())?;
    }
    out.write_all(b"\r\n")?;
    out.write_all(res.body())?;
    out.flush()
}
