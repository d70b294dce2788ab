use std::io::{self, Write};

use http::header;


/// Writes the headers for a CGI/1.1 document response into the writer.
///
/// `headers` is an iterator over pairs of header names and values. A value
/// must fit on a single line. `status` becomes the `Status` header, which
/// therefore must not appear in `headers` (checked by a debug assertion).
///
/// After this function returns [`Ok(n)`], the caller can immediately start
/// writing the body into the writer.
///
/// # Errors
/// Any errors from [`Write::write_all`] are forwarded to the caller.
pub fn write_headers<'a, W, I>(mut w: W, status: http::StatusCode, headers: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let mut sbuf = *b"Status: \0\0\0 ";
    sbuf[8..11].copy_from_slice(status.as_str().as_bytes());
    let reason: &[u8] = status.canonical_reason().map_or(b"Custom", str::as_bytes);

    w.write_all(&sbuf)?;
    w.write_all(reason)?;
    let mut written = sbuf.len() + reason.len();

    for (name, val) in headers {
        debug_assert!(!name.eq_ignore_ascii_case(b"status"), "header name `Status` is reserved");
        w.write_all(b"\n")?;
        w.write_all(name)?;
        w.write_all(b": ")?;
        w.write_all(val)?;
        written += name.len() + val.len() + 3;
    }

    w.write_all(b"\n\n")?;
    Ok(written + 2)
}

/// Writes a complete CGI/1.1 document response with an in-memory body.
///
/// A `Content-Type` and a `Content-Length` header are always emitted. `extra`
/// headers are appended after them.
///
/// # Errors
/// Any errors from [`Write::write_all`] are forwarded to the caller.
pub fn write_document<'a, W, I>(
    mut w: W, status: http::StatusCode, content_type: &str, extra: I, body: &[u8],
) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let (ctype, clen, len) = (header::CONTENT_TYPE, header::CONTENT_LENGTH, body.len().to_string());
    let mut headers: Vec<(&[u8], &[u8])> = vec![
        (ctype.as_str().as_bytes(), content_type.as_bytes()),
        (clen.as_str().as_bytes(), len.as_bytes()),
    ];
    for (name, val) in extra {
        headers.push((name, val));
    }
    let head = write_headers(&mut w, status, headers)?;
    w.write_all(body)?;
    Ok(head + body.len())
}

/// Writes a plain-text `System Error:` response for a failed request.
///
/// The message is collapsed onto a single line.
///
/// # Errors
/// Any errors from [`Write::write_all`] are forwarded to the caller.
pub fn system_error<'a, W, I>(
    w: W, status: http::StatusCode, extra: I, message: &str,
) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let line: String = message.lines().collect::<Vec<_>>().join(" ");
    let body = format!("System Error: {line}\n");
    write_document(w, status, "text/plain; charset=utf-8", extra, body.as_bytes())
}
