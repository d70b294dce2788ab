//! Fixed HTML documents rendered by the endpoints.

use std::path::Path;


const STYLE: &str = "\
body { font-family: Arial, sans-serif; background-color: #f4f4f9; color: #333; margin: 0; padding: 20px; text-align: center; }
h1 { color: #007BFF; }
.container { max-width: 600px; margin: 50px auto; padding: 20px; background: #fff; border-radius: 8px; box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1); }
footer { margin-top: 20px; font-size: 14px; color: #666; }";


/// Builds the styled result page shared by the calculators.
///
/// `footer` is prefixed with a copyright sign and `year`.
#[must_use]
pub fn result_page(title: &str, message: &str, footer: &str, year: i32) -> String {
    format!(
        "<html>
<head>
<title>{title}</title>
<style>
{STYLE}
</style>
</head>
<body>
<div class='container'>
<h1>{message}</h1>
</div>
<footer>&copy; {year} {footer}</footer>
</body>
</html>
",
        title = html_escape(title),
        message = html_escape(message),
        footer = html_escape(footer),
    )
}

/// Builds the page confirming a stored upload.
#[must_use]
pub fn upload_success(filename: &str, path: &Path) -> String {
    format!(
        "<html>
<head><title>File Upload Success</title></head>
<body>
<h1>File '{name}' uploaded successfully!</h1>
<p>Saved to: {path}</p>
</body>
</html>
",
        name = html_escape(filename),
        path = html_escape(&path.to_string_lossy()),
    )
}

/// Builds the page reporting a rejected form upload.
#[must_use]
pub fn upload_failure(message: &str) -> String {
    format!(
        "<html>
<head><title>File Upload Failed</title></head>
<body><h1>{message}</h1></body>
</html>
",
        message = html_escape(message),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
