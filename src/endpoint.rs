//! The CGI endpoints and the per-process request runner.

use std::ffi::OsStr;
use std::io::{self, BufWriter, Write};

use http::{header, Method, StatusCode};

use crate::cgi::{self, response};
use crate::config::Config;
use crate::page;
use crate::request::Request;
use crate::upload::{self, FormUpload, UploadError, UploadRequest, Uploader};
use crate::{calc, ExitStatus};


bitflags::bitflags! {
    /// A set of request methods accepted by an [`Endpoint`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Methods: u8 {
        /// `GET`
        const GET = 0x01;
        /// `POST`
        const POST = 0x02;
    }
}

impl Methods {
    /// Tests whether `method` is part of this set.
    #[must_use]
    pub fn allows(self, method: &Method) -> bool {
        let flag = match *method {
            Method::GET => Self::GET,
            Method::POST => Self::POST,
            _ => return false,
        };
        self.contains(flag)
    }

    /// Formats the set as the value of an `Allow` header.
    #[must_use]
    pub fn allow_header(self) -> String {
        self.iter_names().map(|(name, _)| name).collect::<Vec<_>>().join(", ")
    }
}


/// A CGI endpoint.
pub trait Endpoint {
    /// Methods this endpoint responds to. Anything else is answered with
    /// `405 Method Not Allowed` before [`Endpoint::respond`] is called.
    fn methods(&self) -> Methods;

    /// Handles a request with an allowed method and writes a complete
    /// CGI/1.1 response into `out`.
    ///
    /// # Errors
    /// Only errors writing into `out` are returned. Request failures are
    /// reported in the response and through the [`ExitStatus`].
    fn respond<W: Write>(&self, request: &Request, config: &Config, out: W)
        -> io::Result<ExitStatus>;
}


/// Checks the request method, binds the configuration and hands the request
/// to `endpoint`.
///
/// # Errors
/// Only errors writing into `out` are returned.
pub fn dispatch<E, W>(endpoint: &E, request: &Request, mut out: W) -> io::Result<ExitStatus>
where
    E: Endpoint,
    W: Write,
{
    let allowed = endpoint.methods();
    if !allowed.allows(request.method()) {
        tracing::warn!(method = %request.method(), "request method not allowed");
        let (name, allow) = (header::ALLOW, allowed.allow_header());
        let headers: [(&[u8], &[u8]); 1] = [(name.as_str().as_bytes(), allow.as_bytes())];
        let err = UploadError::MethodNotAllowed(request.method().clone());
        response::system_error(&mut out, err.status(), headers, &err.to_string())?;
        return Ok(ExitStatus::FAILURE);
    }

    let config = match Config::from_request(request) {
        Ok(c) => c,
        Err(e) => {
            let error: &dyn std::error::Error = &e;
            tracing::error!(error, "failed to load configuration");
            response::system_error(
                &mut out, StatusCode::INTERNAL_SERVER_ERROR, NO_HEADERS, &e.to_string(),
            )?;
            return Ok(ExitStatus::FAILURE);
        },
    };
    endpoint.respond(request, &config, out)
}

/// Serves the request of the running process and returns its exit status.
///
/// The response goes to standard output; logs go to standard error.
pub fn run<E: Endpoint>(endpoint: &E) -> ExitStatus {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let res = match Request::from_env() {
        Ok(request) => {
            let span = tracing::info_span!("cgi_request", method = %request.method());
            let _enter = span.enter();
            dispatch(endpoint, &request, &mut out)
        },
        Err(e) => {
            let error: &dyn std::error::Error = &e;
            tracing::error!(error, "malformed CGI request");
            response::system_error(&mut out, StatusCode::BAD_REQUEST, NO_HEADERS, &e.to_string())
                .map(|_| ExitStatus::FAILURE)
        },
    };

    match res.and_then(|status| out.flush().and(Ok(status))) {
        Ok(status) => status,
        Err(e) => {
            let error: &dyn std::error::Error = &e;
            tracing::error!(error, "failed to write CGI response");
            ExitStatus::FAILURE
        },
    }
}


const NO_HEADERS: [(&[u8], &[u8]); 0] = [];
const TEXT_HTML: &str = "text/html; charset=utf-8";

fn log_failure(err: &UploadError) {
    let error: &dyn std::error::Error = err;
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(error, %status, "upload request failed");
    } else {
        tracing::warn!(error, %status, "upload request rejected");
    }
}

fn fail<W: Write>(out: W, err: &UploadError) -> io::Result<ExitStatus> {
    log_failure(err);
    response::system_error(out, err.status(), NO_HEADERS, &err.to_string())?;
    Ok(ExitStatus::FAILURE)
}


/// Stores uploaded files (`POST`) and streams them back (`GET`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadEndpoint;

impl UploadEndpoint {
    fn post<W: Write>(request: &Request, config: &Config, mut out: W) -> io::Result<ExitStatus> {
        let uploader = Uploader::from_config(config);
        if upload::is_form_upload(request) {
            return Self::post_form(request, &uploader, out);
        }
        let stored = UploadRequest::from_request(request).and_then(|up| {
            let path = uploader.handle_post(up.payload, up.filename)?;
            Ok((up.filename, path))
        });
        match stored {
            Ok((name, path)) => {
                let body = page::upload_success(name, &path);
                response::write_document(&mut out, StatusCode::OK, TEXT_HTML, NO_HEADERS, body.as_bytes())?;
                Ok(ExitStatus::SUCCESS)
            },
            Err(e) => fail(out, &e),
        }
    }

    /// Browser form uploads get HTML pages for failures as well.
    fn post_form<W: Write>(request: &Request, uploader: &Uploader, mut out: W) -> io::Result<ExitStatus> {
        let stored = FormUpload::from_request(request).and_then(|form| {
            let path = uploader.handle_post(&form.payload, &form.filename)?;
            Ok((form.filename, path))
        });
        let (status, body, exit) = match stored {
            Ok((name, path)) => (StatusCode::OK, page::upload_success(&name, &path), ExitStatus::SUCCESS),
            Err(e) => {
                log_failure(&e);
                (e.status(), page::upload_failure(&e.to_string()), ExitStatus::FAILURE)
            },
        };
        response::write_document(&mut out, status, TEXT_HTML, NO_HEADERS, body.as_bytes())?;
        Ok(exit)
    }

    fn get<W: Write>(request: &Request, config: &Config, mut out: W) -> io::Result<ExitStatus> {
        let source = request.arg(0).or_else(|| {
            request.get_var_str(cgi::FILENAME.into()).filter(|s| !s.is_empty()).map(OsStr::new)
        });
        let opened = source
            .ok_or(UploadError::MissingArgument(upload::SOURCE_ARG))
            .and_then(|raw| Uploader::from_config(config).resolve_source(raw))
            .and_then(|path| Ok((upload::open_source(&path)?, path)));
        let ((mut file, len), path) = match opened {
            Ok(o) => o,
            Err(e) => return fail(out, &e),
        };

        let (ctype, clen, len) = (header::CONTENT_TYPE, header::CONTENT_LENGTH, len.to_string());
        let headers: [(&[u8], &[u8]); 2] = [
            (ctype.as_str().as_bytes(), b"application/octet-stream"),
            (clen.as_str().as_bytes(), len.as_bytes()),
        ];
        response::write_headers(&mut out, StatusCode::OK, headers)?;

        // Headers are out, so a failure here can only be logged
        match io::copy(&mut file, &mut out) {
            Ok(n) => {
                tracing::info!(path = %path.display(), bytes = n, "file sent");
                Ok(ExitStatus::SUCCESS)
            },
            Err(e) => {
                let error: &dyn std::error::Error = &e;
                tracing::error!(error, path = %path.display(), "download interrupted");
                Ok(ExitStatus::FAILURE)
            },
        }
    }
}

impl Endpoint for UploadEndpoint {
    fn methods(&self) -> Methods {
        Methods::GET | Methods::POST
    }

    fn respond<W: Write>(&self, request: &Request, config: &Config, out: W)
        -> io::Result<ExitStatus>
    {
        match *request.method() {
            Method::POST => Self::post(request, config, out),
            Method::GET => Self::get(request, config, out),
            _ => fail(out, &UploadError::MethodNotAllowed(request.method().clone())),
        }
    }
}


/// Renders a calculator result page. Invalid input gets `400 Bad Request`
/// with the same layout.
fn calculator_page<W: Write>(
    mut out: W, title: &str, footer: &str, year: i32, result: Result<String, String>,
) -> io::Result<ExitStatus> {
    let (status, message) = match result {
        Ok(m) => (StatusCode::OK, m),
        Err(m) => {
            tracing::info!(reason = %m, "rejected calculator input");
            (StatusCode::BAD_REQUEST, m)
        },
    };
    let body = page::result_page(title, &message, footer, year);
    response::write_document(&mut out, status, TEXT_HTML, NO_HEADERS, body.as_bytes())?;
    Ok(ExitStatus::SUCCESS)
}


#[derive(Debug, Default, serde::Deserialize)]
struct BmiForm {
    weight: Option<String>,
    height: Option<String>,
}

/// Computes a BMI from the `weight` (kg) and `height` (cm) form fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct BmiEndpoint;

impl Endpoint for BmiEndpoint {
    fn methods(&self) -> Methods {
        Methods::GET | Methods::POST
    }

    fn respond<W: Write>(&self, request: &Request, config: &Config, out: W)
        -> io::Result<ExitStatus>
    {
        let result = match request.form::<BmiForm>() {
            Ok(form) => calc::bmi(form.weight.as_deref(), form.height.as_deref())
                .map(|b| format!("Your BMI is: {b}"))
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        calculator_page(out, "BMI Calculator Result", "BMI Calculator", config.reference_year(), result)
    }
}


#[derive(Debug, Default, serde::Deserialize)]
struct AgeForm {
    year_of_birth: Option<String>,
}

/// Computes an age from the `year_of_birth` form field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgeEndpoint;

impl Endpoint for AgeEndpoint {
    fn methods(&self) -> Methods {
        Methods::GET | Methods::POST
    }

    fn respond<W: Write>(&self, request: &Request, config: &Config, out: W)
        -> io::Result<ExitStatus>
    {
        let year = config.reference_year();
        let result = match request.form::<AgeForm>() {
            Ok(form) => calc::age(form.year_of_birth.as_deref(), year)
                .map(|age| format!("Your age is: {age}"))
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        calculator_page(out, "Age Calculator Result", "Age Calculator", year, result)
    }
}
