//! CGI script: Computes an age from the `year_of_birth` form field.

use std::process::ExitCode;

use webserv_cgi::endpoint::{self, AgeEndpoint};


fn main() -> ExitCode {
    webserv_cgi::logging::init_tracing();
    endpoint::run(&AgeEndpoint).into()
}
