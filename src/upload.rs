use std::convert::Infallible;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::cgi;
use crate::config::Config;
use crate::macros::trace;
use crate::request::Request;


/// What the handler was doing when access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Access {
    /// Creating the upload directory or writing into it.
    #[strum(serialize = "write to")]
    Write,
    /// Opening a stored file.
    #[strum(serialize = "read")]
    Read,
}

/// Error types of the upload handler.
///
/// Every variant maps to a distinct HTTP status through
/// [`UploadError::status`], so callers can tell a missing file from a bad
/// request even though both end up as a one-line `System Error:` response.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UploadError {
    /// A required positional input (payload or source path) is absent.
    #[error("{0} argument is missing.")]
    MissingArgument(&'static str),
    /// A required meta-variable is unset or empty.
    #[error("Environment variable '{0}' is not set.")]
    MissingEnvironment(cgi::StaticVarName),
    /// The file name is not a single, plain path segment, or a download path
    /// points outside the upload directory.
    #[error("Invalid file name {0:?}")]
    InvalidFilename(String),
    /// The filesystem refused access.
    #[error("Permission denied: Unable to {access} {}", .path.display())]
    PermissionDenied {
        /// The directory or file that could not be accessed.
        path: PathBuf,
        /// Whether the handler was reading or writing.
        access: Access,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The requested file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The request method is neither `GET` nor `POST`.
    #[error("Invalid request method.")]
    MethodNotAllowed(http::Method),
    /// Persisting the payload failed for any other reason.
    #[error("Failed to write the file: {0}")]
    WriteFailure(#[source] io::Error),
    /// Reading a stored file failed for any other reason.
    #[error("Failed to read the file: {0}")]
    ReadFailure(#[source] io::Error),
    /// A form upload has no `file` field.
    #[error("No file field in the form!")]
    NoFileField,
    /// The `file` field of a form upload carries no file name.
    #[error("No file uploaded!")]
    NoFileUploaded,
    /// The `multipart/form-data` body could not be decoded.
    #[error("Failed to parse multipart data: {0}")]
    MalformedForm(#[from] multer::Error),
}

impl UploadError {
    /// Returns the HTTP status reported for this error.
    #[must_use]
    pub fn status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::MissingArgument(_)
            | Self::MissingEnvironment(_)
            | Self::InvalidFilename(_)
            | Self::NoFileField
            | Self::NoFileUploaded
            | Self::MalformedForm(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::WriteFailure(_) | Self::ReadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn on_write(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied { path: path.to_owned(), access: Access::Write, source: e }
            },
            _ => Self::WriteFailure(e),
        }
    }

    fn on_read(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_owned()),
            io::ErrorKind::PermissionDenied => {
                Self::PermissionDenied { path: path.to_owned(), access: Access::Read, source: e }
            },
            _ => Self::ReadFailure(e),
        }
    }
}


pub(crate) const PAYLOAD_ARG: &str = "Binary data";
pub(crate) const SOURCE_ARG: &str = "File path";


/// Validates that `name` is a single plain path segment.
///
/// Rejects empty names, `.` and `..`, and anything containing a path
/// separator (`/` or `\`) or a NUL byte.
///
/// # Errors
/// Returns [`UploadError::InvalidFilename`] for rejected names.
pub fn sanitize_filename(name: &str) -> Result<&str, UploadError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(UploadError::InvalidFilename(name.to_owned()));
    }
    Ok(name)
}


/// The inputs of a single upload, borrowed from the [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRequest<'a> {
    /// Target file name, not yet validated.
    pub filename: &'a str,
    /// File contents.
    pub payload: &'a [u8],
}

impl<'a> UploadRequest<'a> {
    /// Extracts an upload from the request envelope.
    ///
    /// The payload is the request body if the gateway sent one, otherwise the
    /// first positional argument. The file name comes from `FILENAME`.
    ///
    /// # Errors
    /// Returns [`UploadError::MissingArgument`] without a payload,
    /// [`UploadError::MissingEnvironment`] without a file name, and
    /// [`UploadError::InvalidFilename`] for a file name that is not UTF-8.
    pub fn from_request(request: &'a Request) -> Result<Self, UploadError> {
        let payload = request.body()
            .or_else(|| request.arg(0).map(OsStr::as_encoded_bytes))
            .ok_or(UploadError::MissingArgument(PAYLOAD_ARG))?;

        let filename = match request.get_var(cgi::FILENAME.into()) {
            None | Some(b"") => return Err(UploadError::MissingEnvironment(cgi::FILENAME)),
            Some(raw) => std::str::from_utf8(raw).map_err(
                |_| UploadError::InvalidFilename(String::from_utf8_lossy(raw).into_owned())
            )?,
        };
        Ok(Self { filename, payload })
    }
}


/// Name of the form field holding the uploaded file.
pub const FORM_FIELD: &str = "file";

/// Tests whether the request body is a `multipart/form-data` form.
#[must_use]
pub fn is_form_upload(request: &Request) -> bool {
    request.get_var_str(cgi::CONTENT_TYPE.into())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// A file submitted through the `file` field of a `multipart/form-data` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUpload {
    /// Base name of the submitted file, validated with [`sanitize_filename`].
    pub filename: String,
    /// File contents.
    pub payload: Vec<u8>,
}

impl FormUpload {
    /// Decodes the request body as a `multipart/form-data` form and extracts
    /// its `file` field.
    ///
    /// The client-side directory part of the submitted name is dropped, so
    /// `C:\Users\me\a.txt` and `docs/a.txt` are both stored as `a.txt`.
    ///
    /// # Errors
    /// Returns [`UploadError::NoFileField`] if the form has no `file` field,
    /// [`UploadError::NoFileUploaded`] if that field has an empty or no file
    /// name, [`UploadError::InvalidFilename`] if the base name is still not
    /// usable, and [`UploadError::MalformedForm`] if the body is not a valid
    /// form.
    pub fn from_request(request: &Request) -> Result<Self, UploadError> {
        let ctype = request.get_var_str(cgi::CONTENT_TYPE.into()).unwrap_or_default();
        let boundary = multer::parse_boundary(ctype)?;
        let Some(body) = request.body() else {
            return Err(UploadError::NoFileField);
        };
        let body = body.to_vec();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(UploadError::ReadFailure)?;
        runtime.block_on(async move {
            let chunks = futures_util::stream::iter([Ok::<_, Infallible>(body)]);
            Self::read_file_field(multer::Multipart::new(chunks, boundary)).await
        })
    }

    async fn read_file_field(mut form: multer::Multipart<'_>) -> Result<Self, UploadError> {
        while let Some(field) = form.next_field().await? {
            if field.name() != Some(FORM_FIELD) {
                trace!(field = ?field.name(), "skipping form field");
                continue;
            }
            let submitted = field.file_name().unwrap_or_default();
            if submitted.is_empty() {
                return Err(UploadError::NoFileUploaded);
            }
            let filename = sanitize_filename(base_name(submitted))?.to_owned();
            let payload = field.bytes().await?.to_vec();
            return Ok(Self { filename, payload });
        }
        Err(UploadError::NoFileField)
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}


/// Stores uploads in, and serves them from, a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploader {
    dir: PathBuf,
}

impl Uploader {
    /// Creates an [`Uploader`] for the given destination directory, with
    /// `.` and `..` components removed.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: crate::config::normalize(&dir.into()) }
    }

    /// Creates an [`Uploader`] for the configured upload directory.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upload_dir())
    }

    /// Returns the destination directory.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persists `payload` as `filename` inside the destination directory and
    /// returns the full path of the stored file.
    ///
    /// The directory is created if necessary. The payload is written to a
    /// temporary file in the same directory, synced, and then renamed over
    /// the target, so the target either keeps its old contents or holds the
    /// complete payload. An existing file of the same name is replaced.
    ///
    /// # Errors
    /// Returns [`UploadError::MissingEnvironment`] for an empty file name,
    /// [`UploadError::InvalidFilename`] if it is not a plain path segment,
    /// [`UploadError::PermissionDenied`] if the directory is not writable, and
    /// [`UploadError::WriteFailure`] for any other I/O error. Nothing is
    /// written in the first two cases.
    pub fn handle_post(&self, payload: &[u8], filename: &str) -> Result<PathBuf, UploadError> {
        if filename.is_empty() {
            return Err(UploadError::MissingEnvironment(cgi::FILENAME));
        }
        let name = sanitize_filename(filename)?;
        let target = self.dir.join(name);

        fs::create_dir_all(&self.dir).map_err(|e| UploadError::on_write(&self.dir, e))?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".upload-")
            .tempfile_in(&self.dir)
            .map_err(|e| UploadError::on_write(&self.dir, e))?;
        trace!(tmp = %tmp.path().display(), len = payload.len(), "writing upload");

        tmp.write_all(payload).map_err(|e| UploadError::on_write(&self.dir, e))?;
        tmp.as_file().sync_all().map_err(|e| UploadError::on_write(&self.dir, e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Temp files are created 0600, stored uploads should look like plain writes
            let perms = fs::Permissions::from_mode(0o644);
            tmp.as_file().set_permissions(perms).map_err(|e| UploadError::on_write(&self.dir, e))?;
        }
        // Dropping the PersistError removes the temporary file
        tmp.persist(&target).map_err(|e| UploadError::on_write(&self.dir, e.error))?;

        tracing::info!(path = %target.display(), len = payload.len(), "File written successfully");
        Ok(target)
    }

    /// Resolves the source of a download to a path inside the destination
    /// directory.
    ///
    /// A bare file name is looked up in the directory. An absolute path is
    /// accepted only if it lies below the directory and has no `..`
    /// components.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidFilename`] for anything else.
    pub fn resolve_source(&self, raw: &OsStr) -> Result<PathBuf, UploadError> {
        let invalid = || UploadError::InvalidFilename(raw.to_string_lossy().into_owned());
        let path = Path::new(raw);
        if path.is_absolute() {
            let escapes = path.components().any(|c| c == Component::ParentDir);
            if escapes || !path.starts_with(&self.dir) || path == self.dir {
                return Err(invalid());
            }
            return Ok(path.to_owned());
        }
        let name = raw.to_str().ok_or_else(invalid)?;
        Ok(self.dir.join(sanitize_filename(name)?))
    }
}


/// Opens a stored file for download and returns it with its length.
///
/// # Errors
/// Returns [`UploadError::NotFound`] if the path does not exist or is a
/// directory, [`UploadError::PermissionDenied`] if it cannot be opened, and
/// [`UploadError::ReadFailure`] for any other I/O error.
pub fn open_source(source: &Path) -> Result<(File, u64), UploadError> {
    let file = File::open(source).map_err(|e| UploadError::on_read(source, e))?;
    let meta = file.metadata().map_err(|e| UploadError::on_read(source, e))?;
    if meta.is_dir() {
        return Err(UploadError::NotFound(source.to_owned()));
    }
    Ok((file, meta.len()))
}

/// Streams the bytes of `source` verbatim into `out`, returning the number
/// of bytes copied.
///
/// # Errors
/// See [`open_source`]. Failures while copying are reported as
/// [`UploadError::ReadFailure`].
pub fn handle_get(source: &Path, mut out: impl Write) -> Result<u64, UploadError> {
    let (mut file, _) = open_source(source)?;
    io::copy(&mut file, &mut out).map_err(UploadError::ReadFailure)
}


#[cfg(test)]
mod tests {
    use std::iter::repeat_with;
    use http::Method;
    use super::*;

    fn tempdir() -> tempfile::TempDir {
        tempfile::tempdir().expect("failed to create temporary directory")
    }

    #[test]
    fn post_then_get() -> Result<(), UploadError> {
        let tmp = tempdir();
        let up = Uploader::new(tmp.path().join("up"));
        let path = up.handle_post(b"hello", "a.txt")?;
        assert_eq!(path, tmp.path().join("up").join("a.txt"));
        assert_eq!(fs::read(&path).map_err(UploadError::ReadFailure)?, b"hello");

        let mut out = Vec::new();
        assert_eq!(handle_get(&path, &mut out)?, 5);
        assert_eq!(out, b"hello");
        Ok(())
    }

    #[test]
    fn roundtrip_binary() -> Result<(), UploadError> {
        let tmp = tempdir();
        let up = Uploader::new(tmp.path());
        for len in [1, 255, 4096, 70_001] {
            let payload: Vec<u8> = repeat_with(|| fastrand::u8(..)).take(len).collect();
            let path = up.handle_post(&payload, "blob.bin")?;
            let mut out = Vec::new();
            handle_get(&path, &mut out)?;
            assert_eq!(out, payload, "payload of {len} bytes changed");
        }
        Ok(())
    }

    #[test]
    fn empty_payload_writes_empty_file() -> Result<(), UploadError> {
        let tmp = tempdir();
        let path = Uploader::new(tmp.path()).handle_post(b"", "empty")?;
        let (_, len) = open_source(&path)?;
        assert_eq!(len, 0);
        Ok(())
    }

    #[test]
    fn overwrite() -> Result<(), UploadError> {
        let tmp = tempdir();
        let up = Uploader::new(tmp.path());
        up.handle_post(b"first version", "same.txt")?;
        let path = up.handle_post(b"second", "same.txt")?;
        let mut out = Vec::new();
        handle_get(&path, &mut out)?;
        assert_eq!(out, b"second");
        Ok(())
    }

    #[test]
    fn no_temp_files_left() -> Result<(), UploadError> {
        let tmp = tempdir();
        let up = Uploader::new(tmp.path());
        up.handle_post(b"x", "one")?;
        up.handle_post(b"y", "two")?;
        let names: Vec<_> = fs::read_dir(tmp.path())
            .map_err(UploadError::ReadFailure)?
            .filter_map(|e| e.ok()?.file_name().into_string().ok())
            .collect();
        assert_eq!(names.len(), 2, "unexpected directory contents {names:?}");
        assert!(names.iter().all(|n| !n.starts_with(".upload-")));
        Ok(())
    }

    #[test]
    fn bad_filenames() {
        let tmp = tempdir();
        let dir = tmp.path().join("never-created");
        let up = Uploader::new(&dir);
        for name in [".", "..", "a/b", "../escape", "..\\x", "nul\0byte", "/etc/passwd"] {
            match up.handle_post(b"data", name) {
                Err(UploadError::InvalidFilename(n)) => assert_eq!(n, name),
                other => panic!("{name:?} returned {other:?}"),
            }
        }
        assert!(matches!(
            up.handle_post(b"data", ""),
            Err(UploadError::MissingEnvironment(cgi::FILENAME)),
        ));
        assert!(!dir.exists(), "rejected uploads touched the filesystem");
    }

    #[test]
    fn sanitize_accepts_plain_names() -> Result<(), UploadError> {
        for name in ["a.txt", "..hidden", "with space.png", "ünïcode", ".profile"] {
            assert_eq!(sanitize_filename(name)?, name);
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn read_only_directory() -> Result<(), UploadError> {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempdir();
        let dir = tmp.path().join("ro");
        fs::create_dir(&dir).map_err(UploadError::WriteFailure)?;
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555))
            .map_err(UploadError::WriteFailure)?;

        // Privileged users ignore directory permissions
        let canary = dir.join("canary");
        if File::create(&canary).is_ok() {
            let _ = fs::remove_file(&canary);
            return Ok(());
        }

        let res = Uploader::new(&dir).handle_post(b"data", "a.txt");
        assert!(matches!(
            res,
            Err(UploadError::PermissionDenied { access: Access::Write, .. }),
        ), "unexpected result {res:?}");
        assert!(!dir.join("a.txt").exists());
        let leftovers = fs::read_dir(&dir).map_err(UploadError::ReadFailure)?.count();
        assert_eq!(leftovers, 0);

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755))
            .map_err(UploadError::WriteFailure)?;
        Ok(())
    }

    #[test]
    fn get_missing_file() {
        let tmp = tempdir();
        let missing = tmp.path().join("nope.txt");
        let mut out = Vec::new();
        match handle_get(&missing, &mut out) {
            Err(UploadError::NotFound(p)) => assert_eq!(p, missing),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(out.is_empty());
        assert!(matches!(handle_get(tmp.path(), &mut out), Err(UploadError::NotFound(_))));
    }

    #[test]
    fn resolve_inside_dir() -> Result<(), UploadError> {
        let up = Uploader::new("/srv/upload");
        assert_eq!(up.resolve_source(OsStr::new("a.txt"))?, Path::new("/srv/upload/a.txt"));
        assert_eq!(
            up.resolve_source(OsStr::new("/srv/upload/a.txt"))?,
            Path::new("/srv/upload/a.txt"),
        );
        for bad in ["/etc/passwd", "/srv/upload/../secret", "/srv/upload", "sub/a.txt", ".."] {
            assert!(
                matches!(up.resolve_source(OsStr::new(bad)), Err(UploadError::InvalidFilename(_))),
                "{bad:?} was accepted",
            );
        }
        Ok(())
    }

    #[test]
    fn request_extraction() -> Result<(), UploadError> {
        let req = Request::new(Method::POST).with_var(cgi::FILENAME, "a.txt").with_arg("hello");
        let up = UploadRequest::from_request(&req)?;
        assert_eq!(up, UploadRequest { filename: "a.txt", payload: b"hello" });

        // The body wins over the legacy argument
        let req = req.with_body(b"\x00\xffbinary".to_vec());
        assert_eq!(UploadRequest::from_request(&req)?.payload, b"\x00\xffbinary");

        let no_name = Request::new(Method::POST).with_arg("hello");
        assert!(matches!(
            UploadRequest::from_request(&no_name),
            Err(UploadError::MissingEnvironment(cgi::FILENAME)),
        ));
        let empty_name = no_name.with_var(cgi::FILENAME, "");
        assert!(matches!(
            UploadRequest::from_request(&empty_name),
            Err(UploadError::MissingEnvironment(cgi::FILENAME)),
        ));
        let no_payload = Request::new(Method::POST).with_var(cgi::FILENAME, "a.txt");
        assert!(matches!(
            UploadRequest::from_request(&no_payload),
            Err(UploadError::MissingArgument(PAYLOAD_ARG)),
        ));
        Ok(())
    }

    const BOUNDARY: &str = "----form-XyZ";

    fn form_part(name: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
        let mut part = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"");
        if let Some(f) = filename {
            part.push_str(&format!("; filename=\"{f}\"\r\nContent-Type: application/octet-stream"));
        }
        part.push_str("\r\n\r\n");
        let mut part = part.into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn form_request(parts: &[Vec<u8>]) -> Request {
        let mut body = parts.concat();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::new(Method::POST)
            .with_var(cgi::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .with_body(body)
    }

    #[test]
    fn form_upload() -> Result<(), UploadError> {
        let payload = b"line one\r\n--not-a-boundary\x00\xff";
        let req = form_request(&[
            form_part("note", None, b"ignored"),
            form_part("file", Some("docs/report.txt"), payload),
        ]);
        assert!(is_form_upload(&req));
        let form = FormUpload::from_request(&req)?;
        assert_eq!(form.filename, "report.txt");
        assert_eq!(form.payload, payload);

        let tmp = tempdir();
        let path = Uploader::new(tmp.path()).handle_post(&form.payload, &form.filename)?;
        assert_eq!(fs::read(path).map_err(UploadError::ReadFailure)?, payload);
        Ok(())
    }

    #[test]
    fn form_without_file() {
        let req = form_request(&[form_part("note", None, b"hello")]);
        assert!(matches!(FormUpload::from_request(&req), Err(UploadError::NoFileField)));

        let req = form_request(&[form_part("file", Some(""), b"")]);
        assert!(matches!(FormUpload::from_request(&req), Err(UploadError::NoFileUploaded)));

        let req = form_request(&[form_part("file", Some("docs/.."), b"x")]);
        assert!(matches!(FormUpload::from_request(&req), Err(UploadError::InvalidFilename(_))));

        let no_body = Request::new(Method::POST)
            .with_var(cgi::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
        assert!(matches!(FormUpload::from_request(&no_body), Err(UploadError::NoFileField)));

        let no_boundary = Request::new(Method::POST)
            .with_var(cgi::CONTENT_TYPE, "multipart/form-data")
            .with_body("whatever");
        assert!(matches!(FormUpload::from_request(&no_boundary), Err(UploadError::MalformedForm(_))));
    }

    #[test]
    fn form_detection() {
        let req = Request::new(Method::POST);
        assert!(!is_form_upload(&req));
        assert!(!is_form_upload(&req.clone().with_var(cgi::CONTENT_TYPE, "application/octet-stream")));
        assert!(is_form_upload(&req.with_var(cgi::CONTENT_TYPE, "Multipart/Form-Data ; boundary=x")));
        assert_eq!(base_name(r"C:\Users\me\a.txt"), "a.txt");
        assert_eq!(base_name("plain"), "plain");
    }

    #[test]
    fn resolve_with_dotted_dir() -> Result<(), UploadError> {
        let tmp = tempdir();
        let up = Uploader::new(tmp.path().join("cgi").join("..").join("upload"));
        assert_eq!(up.dir(), tmp.path().join("upload"));
        let stored = up.handle_post(b"hi", "a.txt")?;
        assert_eq!(up.resolve_source(stored.as_os_str())?, stored);
        Ok(())
    }

    #[test]
    fn statuses() {
        use http::StatusCode;
        assert_eq!(UploadError::MissingArgument(SOURCE_ARG).status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::NotFound(PathBuf::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(UploadError::NoFileField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::NoFileUploaded.to_string(), "No file uploaded!");
        assert_eq!(
            UploadError::MethodNotAllowed(Method::PUT).status(),
            StatusCode::METHOD_NOT_ALLOWED,
        );
        let denied = UploadError::PermissionDenied {
            path: "/srv/upload".into(),
            access: Access::Write,
            source: io::ErrorKind::PermissionDenied.into(),
        };
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
        assert_eq!(denied.to_string(), "Permission denied: Unable to write to /srv/upload");
        assert_eq!(
            UploadError::MissingEnvironment(cgi::FILENAME).to_string(),
            "Environment variable 'FILENAME' is not set.",
        );
    }
}
