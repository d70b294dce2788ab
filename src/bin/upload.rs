//! CGI upload script.
//!
//! `POST` stores the request body (or, for gateways that pass it on the
//! command line, the first argument) as `$UPLOAD_DIR/$FILENAME`. `GET`
//! streams a stored file named by the first argument or `FILENAME`.

use std::process::ExitCode;

use webserv_cgi::endpoint::{self, UploadEndpoint};


fn main() -> ExitCode {
    webserv_cgi::logging::init_tracing();
    endpoint::run(&UploadEndpoint).into()
}
