/// Emits a trace-level event. Compiled out unless `trace-more` is enabled,
/// since per-byte-range events would flood the gateway's stderr log.
#[cfg(feature = "trace-more")]
macro_rules! trace {
    ($($arg:tt)+) => (::tracing::trace!($($arg)+));
}
/// Emits a trace-level event. Compiled out unless `trace-more` is enabled.
#[cfg(not(feature = "trace-more"))]
macro_rules! trace {
    ($($arg:tt)+) => {};
}
pub(crate) use trace;
