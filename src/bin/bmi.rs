//! CGI script: Computes a body mass index from the `weight` and `height` form fields.

use std::process::ExitCode;

use webserv_cgi::endpoint::{self, BmiEndpoint};


fn main() -> ExitCode {
    webserv_cgi::logging::init_tracing();
    endpoint::run(&BmiEndpoint).into()
}
