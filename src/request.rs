//! The request envelope handed to every endpoint.
//!
//! A gateway passes a CGI request through three channels: meta-variables in
//! the environment, positional process arguments, and the body on standard
//! input. [`Request`] collects all three once, up front, so endpoints never
//! touch the process state themselves.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::{self, Read};

use serde::de::DeserializeOwned;
use smallvec::SmallVec;

use crate::cgi;
use crate::macros::trace;


/// Errors that prevent a [`Request`] from being assembled.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Neither `REQUEST_METHOD` nor a leading argument named a method.
    #[error("request method is missing")]
    MissingMethod,
    /// The request method is not a valid HTTP token.
    #[error("invalid request method {0:?}")]
    InvalidMethod(String),
    /// `CONTENT_LENGTH` is not a decimal integer.
    #[error("invalid CONTENT_LENGTH {0:?}")]
    InvalidContentLength(String),
    /// Standard input ended before `CONTENT_LENGTH` bytes were read.
    #[error("request body ended after {read} of {expected} bytes")]
    ShortBody {
        /// Bytes actually received.
        read: u64,
        /// Bytes announced in `CONTENT_LENGTH`.
        expected: u64,
    },
    /// Reading standard input failed.
    #[error("failed to read request body: {0}")]
    Io(#[from] io::Error),
}

/// Errors from decoding form fields.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormError {
    /// The body is not `application/x-www-form-urlencoded`.
    #[error("unsupported form content type {0:?}")]
    UnsupportedContentType(String),
    /// The form data does not match the expected fields.
    #[error("malformed form data: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}


const SMALLVEC_BASE_SIZE: usize = std::mem::size_of::<SmallVec<[u8; 0]>>();
// Largest inline buffer that keeps SmallVec at its base size
const INLINE_BYTES: usize = SMALLVEC_BASE_SIZE - std::mem::size_of::<usize>();
type SmallBytes = SmallVec<[u8; INLINE_BYTES]>;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";


/// A single CGI request: method, meta-variables, positional arguments and
/// an optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: http::Method,
    params: HashMap<cgi::OwnedVarName, SmallBytes>,
    args: Vec<OsString>,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Creates an empty [`Request`] with the given method.
    #[must_use]
    pub fn new(method: http::Method) -> Self {
        Self { method, params: HashMap::new(), args: Vec::new(), body: None }
    }

    /// Builds the [`Request`] of the running process.
    ///
    /// # Errors
    /// See [`Request::from_parts`].
    pub fn from_env() -> Result<Self, Error> {
        let stdin = io::stdin();
        Self::from_parts(std::env::vars_os(), std::env::args_os().skip(1), stdin.lock())
    }

    /// Assembles a [`Request`] from raw process inputs.
    ///
    /// `args` must not include the program name. The method is taken from
    /// `REQUEST_METHOD`; gateways that pass it as the first argument instead
    /// are supported by consuming that argument when the variable is unset.
    /// If `CONTENT_LENGTH` is set, exactly that many bytes are read from
    /// `stdin` as the body. Without it the request has no body and `stdin`
    /// is left alone.
    ///
    /// # Errors
    /// Returns an error if no valid method is given, if `CONTENT_LENGTH` is
    /// malformed, or if the body cannot be read completely.
    pub fn from_parts<V, A, R>(vars: V, args: A, stdin: R) -> Result<Self, Error>
    where
        V: IntoIterator<Item = (OsString, OsString)>,
        A: IntoIterator<Item = OsString>,
        R: Read,
    {
        let params: HashMap<_, _> = vars
            .into_iter()
            .map(|(n, v)| {
                let name = cgi::OwnedVarName::from_os_str(&n);
                (name, SmallBytes::from_slice(v.as_encoded_bytes()))
            })
            .collect();
        let mut args: Vec<OsString> = args.into_iter().collect();

        let method = match params.get(<&cgi::VarName>::from(cgi::REQUEST_METHOD)) {
            Some(m) if !m.is_empty() => m.to_vec(),
            _ if !args.is_empty() => args.remove(0).into_encoded_bytes(),
            _ => return Err(Error::MissingMethod),
        };
        let method = http::Method::from_bytes(&method)
            .map_err(|_| Error::InvalidMethod(String::from_utf8_lossy(&method).into_owned()))?;

        let mut req = Self { method, params, args, body: None };
        if let Some(len) = req.content_length()? {
            let mut body = Vec::new();
            let read = stdin.take(len).read_to_end(&mut body)? as u64;
            if read != len {
                return Err(Error::ShortBody { read, expected: len });
            }
            trace!(len, "request body read");
            req.body = Some(body);
        }
        Ok(req)
    }

    fn content_length(&self) -> Result<Option<u64>, Error> {
        match self.get_var_str(cgi::CONTENT_LENGTH.into()) {
            None => match self.get_var(cgi::CONTENT_LENGTH.into()) {
                Some(raw) => Err(Error::InvalidContentLength(String::from_utf8_lossy(raw).into())),
                None => Ok(None),
            },
            Some("") => Ok(None),
            Some(s) => s.trim().parse().map(Some)
                .map_err(|_| Error::InvalidContentLength(s.to_owned())),
        }
    }

    /// Sets a meta-variable, replacing any previous value.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<cgi::OwnedVarName>, value: impl AsRef<[u8]>) -> Self {
        self.params.insert(name.into(), SmallBytes::from_slice(value.as_ref()));
        self
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the request method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Retrieves the raw value of a variable, if there is one.
    #[must_use]
    pub fn get_var(&self, name: &cgi::VarName) -> Option<&[u8]> {
        self.params.get(name).map(AsRef::as_ref)
    }

    /// Retrieves the value of a variable as a string.
    ///
    /// Returns [`None`] if the variable is unset *or if its value is not
    /// valid UTF-8*.
    #[must_use]
    pub fn get_var_str(&self, name: &cgi::VarName) -> Option<&str> {
        self.params.get(name).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Returns the positional argument at `idx`.
    #[must_use]
    pub fn arg(&self, idx: usize) -> Option<&OsStr> {
        self.args.get(idx).map(OsString::as_os_str)
    }

    /// Returns the request body, if the gateway sent one.
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Decodes form fields into `T`.
    ///
    /// `GET` and `HEAD` requests are decoded from `QUERY_STRING`. Other
    /// methods use the body, which must be URL-encoded, and fall back to
    /// `QUERY_STRING` if there is no body. Missing input decodes as an
    /// empty form.
    ///
    /// # Errors
    /// Returns an error for a non-form body or if decoding into `T` fails.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        let query = self.get_var(cgi::QUERY_STRING.into()).unwrap_or_default();
        let data = match (&self.method, self.body()) {
            (&http::Method::GET | &http::Method::HEAD, _) | (_, None) => query,
            (_, Some(body)) => {
                let ctype = self.get_var_str(cgi::CONTENT_TYPE.into()).unwrap_or(FORM_URLENCODED);
                let essence = ctype.split(';').next().unwrap_or_default().trim();
                if !essence.eq_ignore_ascii_case(FORM_URLENCODED) {
                    return Err(FormError::UnsupportedContentType(ctype.to_owned()));
                }
                body
            },
        };
        Ok(serde_urlencoded::from_bytes(data)?)
    }
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use http::Method;
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs.iter().map(|&(n, v)| (n.into(), v.into())).collect()
    }

    #[derive(Debug, serde::Deserialize)]
    struct Form {
        weight: Option<String>,
        height: Option<String>,
    }

    #[test]
    fn method_from_env() -> Result<(), Error> {
        let env = vars(&[("REQUEST_METHOD", "GET"), ("Query_String", "a=1")]);
        let req = Request::from_parts(env, [OsString::from("file.txt")], io::empty())?;
        assert_eq!(req.method(), &Method::GET);
        assert_eq!(req.arg(0), Some(OsStr::new("file.txt")));
        assert_eq!(req.get_var_str(cgi::QUERY_STRING.into()), Some("a=1"));
        assert!(req.body().is_none());
        Ok(())
    }

    #[test]
    fn method_from_first_arg() -> Result<(), Error> {
        let args = ["POST", "hello"].map(OsString::from);
        let req = Request::from_parts(vars(&[]), args, io::empty())?;
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.arg(0), Some(OsStr::new("hello")));
        assert_eq!(req.arg(1), None);
        Ok(())
    }

    #[test]
    fn missing_or_bad_method() {
        let none = Request::from_parts(vars(&[]), Vec::new(), io::empty());
        assert!(matches!(none, Err(Error::MissingMethod)));

        let bad = Request::from_parts(vars(&[("REQUEST_METHOD", "GE T")]), Vec::new(), io::empty());
        assert!(matches!(bad, Err(Error::InvalidMethod(m)) if m == "GE T"));
    }

    #[test]
    fn body_uses_content_length() -> Result<(), Error> {
        let env = vars(&[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "5")]);
        let req = Request::from_parts(env, Vec::new(), Cursor::new(b"hello, trailing"))?;
        assert_eq!(req.body(), Some(&b"hello"[..]));

        let env = vars(&[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "0")]);
        let req = Request::from_parts(env, Vec::new(), Cursor::new(b"ignored"))?;
        assert_eq!(req.body(), Some(&b""[..]));
        Ok(())
    }

    #[test]
    fn body_errors() {
        let env = vars(&[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "10")]);
        let short = Request::from_parts(env, Vec::new(), Cursor::new(b"abc"));
        assert!(matches!(short, Err(Error::ShortBody { read: 3, expected: 10 })));

        let env = vars(&[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "-1")]);
        let bad = Request::from_parts(env, Vec::new(), io::empty());
        assert!(matches!(bad, Err(Error::InvalidContentLength(_))));
    }

    #[test]
    fn form_from_query() -> Result<(), FormError> {
        let req = Request::new(Method::GET).with_var(cgi::QUERY_STRING, "weight=70&height=175.5");
        let form: Form = req.form()?;
        assert_eq!(form.weight.as_deref(), Some("70"));
        assert_eq!(form.height.as_deref(), Some("175.5"));

        let empty: Form = Request::new(Method::GET).form()?;
        assert!(empty.weight.is_none() && empty.height.is_none());
        Ok(())
    }

    #[test]
    fn form_from_body() -> Result<(), FormError> {
        let req = Request::new(Method::POST)
            .with_var(cgi::CONTENT_TYPE, "application/x-www-form-urlencoded; charset=UTF-8")
            .with_var(cgi::QUERY_STRING, "weight=1")
            .with_body("weight=80&height=180%2E0");
        let form: Form = req.form()?;
        assert_eq!(form.weight.as_deref(), Some("80"));
        assert_eq!(form.height.as_deref(), Some("180.0"));

        let multipart = Request::new(Method::POST)
            .with_var(cgi::CONTENT_TYPE, "multipart/form-data; boundary=x")
            .with_body("--x--");
        assert!(matches!(
            multipart.form::<Form>(),
            Err(FormError::UnsupportedContentType(_)),
        ));
        Ok(())
    }
}
