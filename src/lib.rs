#![deny(unsafe_code, single_use_lifetimes, unused_lifetimes)]
#![warn(keyword_idents, let_underscore_drop, unreachable_pub, unused_import_braces)]

#![deny(clippy::suspicious)]
#![deny(clippy::exit, clippy::semicolon_inside_block, clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::enum_glob_use, clippy::items_after_statements, clippy::module_name_repetitions)]


mod macros;

/// Helpers for CGI/1.1 variable names and responses.
pub mod cgi;
pub mod request;
pub mod config;

/// Persisting uploaded files and streaming them back.
pub mod upload;
/// BMI and age calculations behind the calculator endpoints.
pub mod calc;
pub mod page;

pub mod endpoint;
pub mod logging;

pub use config::Config;
pub use request::Request;


/// The exit status of a single CGI invocation.
///
/// CGI gateways only distinguish success from failure, so the status is
/// converted into a process [`ExitCode`](std::process::ExitCode) by the
/// binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitStatus(u8);

impl ExitStatus {
    /// The request was handled successfully.
    pub const SUCCESS: Self = Self(0);
    /// The request failed. The response body carries the diagnostic.
    pub const FAILURE: Self = Self(1);

    /// Tests whether this [`ExitStatus`] signals success.
    #[inline]
    #[must_use]
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw process exit code.
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    #[inline]
    fn from(v: ExitStatus) -> Self {
        v.0.into()
    }
}
