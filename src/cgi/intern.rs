use std::fmt;


/// A statically-allocated CGI/1.1 variable name.
///
/// Covers the RFC 3875 meta-variables, the request headers the endpoints
/// look at, and the gateway-specific variables this crate reads. The variants
/// are re-exported as constants on the [`cgi`](crate::cgi) module.
///
/// Conversions into [`VarName`](super::VarName) and
/// [`OwnedVarName`](super::OwnedVarName) are provided through [`From`] impls.
#[allow(missing_docs, non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::EnumString)]
#[cfg_attr(test, derive(strum::EnumIter))]
#[strum(use_phf, serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum StaticVarName {
    // From RFC 3875, Section 4.1 (CGI/1.1)
    AUTH_TYPE,
    CONTENT_LENGTH,
    CONTENT_TYPE,
    GATEWAY_INTERFACE,
    PATH_INFO,
    PATH_TRANSLATED,
    QUERY_STRING,
    REMOTE_ADDR,
    REMOTE_HOST,
    REQUEST_METHOD,
    SCRIPT_NAME,
    SERVER_NAME,
    SERVER_PORT,
    SERVER_PROTOCOL,
    SERVER_SOFTWARE,

    // Common extensions
    DOCUMENT_ROOT,
    REQUEST_URI,
    SCRIPT_FILENAME,

    // Request headers
    HTTP_ACCEPT,
    HTTP_HOST,
    HTTP_USER_AGENT,

    /// Target file name of an upload.
    FILENAME,
    /// Directory uploads are stored in.
    UPLOAD_DIR,
    /// Calendar year the age calculator counts from.
    REFERENCE_YEAR,
}

impl AsRef<str> for StaticVarName {
    #[inline]
    fn as_ref(&self) -> &str {
        self.into()
    }
}

impl fmt::Debug for StaticVarName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self.as_ref(), f)
    }
}

impl fmt::Display for StaticVarName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.as_ref(), f)
    }
}
