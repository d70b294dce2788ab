use std::borrow::Borrow;
use std::ffi::OsStr;
use std::fmt;
use std::hash::{Hash, Hasher};

use compact_str::CompactString;

mod intern;
/// Writers for CGI/1.1 document responses.
pub mod response;

pub use intern::StaticVarName;
pub use StaticVarName::*;


/// A string wrapper for CGI/1.1 meta-variable names.
///
/// RFC 3875, Section 4.1 specifies variable names as case-insensitive, so
/// equality, ordering and hashing ignore ASCII case. The wrapped string is
/// left untouched.
#[derive(Debug, ref_cast::RefCastCustom)]
#[repr(transparent)]
pub struct VarName(str);

impl VarName {
    /// Wraps a string reference in a [`VarName`].
    #[ref_cast::ref_cast_custom]
    // Unsafe code is generated and checked by ref-cast
    #[allow(unsafe_code, clippy::let_underscore_untyped)]
    #[must_use]
    pub const fn new(s: &str) -> &Self;

    #[inline]
    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_uppercase())
    }

    /// Returns the wrapped string as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a, T: AsRef<str> + ?Sized> From<&'a T> for &'a VarName {
    #[inline]
    fn from(v: &'a T) -> Self {
        VarName::new(v.as_ref())
    }
}

impl From<StaticVarName> for &VarName {
    #[inline]
    fn from(v: StaticVarName) -> Self {
        VarName::new(v.into())
    }
}

impl fmt::Display for VarName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for VarName {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}
impl Eq for VarName {}

impl PartialOrd for VarName {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VarName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(other.folded())
    }
}

impl Hash for VarName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.folded() {
            state.write_u8(byte);
        }
        // Keep hashes prefix-free
        state.write_u8(0xff);
    }
}


/// An owned [`VarName`] for use as a map key.
///
/// Names of well-known variables are stored as a [`StaticVarName`], anything
/// else as a [`CompactString`], which keeps typical variable names inline.
#[derive(Clone)]
pub enum OwnedVarName {
    /// A well-known variable name.
    Static(StaticVarName),
    /// Any other variable name.
    Custom(CompactString),
}

impl OwnedVarName {
    /// Converts a process environment key into an [`OwnedVarName`].
    ///
    /// Keys that are not valid UTF-8 are decoded lossily. Real gateways only
    /// ever pass ASCII names.
    #[must_use]
    pub fn from_os_str(name: &OsStr) -> Self {
        name.to_string_lossy().into_owned().into()
    }

    #[inline]
    fn as_var(&self) -> &VarName {
        self.borrow()
    }
}

impl From<StaticVarName> for OwnedVarName {
    #[inline]
    fn from(v: StaticVarName) -> Self {
        Self::Static(v)
    }
}

impl From<&str> for OwnedVarName {
    fn from(v: &str) -> Self {
        match v.parse() {
            Ok(s) => Self::Static(s),
            Err(_) => Self::Custom(v.into()),
        }
    }
}

impl From<String> for OwnedVarName {
    /// Converts a [`String`] into an [`OwnedVarName`], uppercasing it first
    /// so well-known names hit the static representation.
    fn from(mut v: String) -> Self {
        v.make_ascii_uppercase();
        match v.parse() {
            Ok(s) => Self::Static(s),
            Err(_) => Self::Custom(v.into()),
        }
    }
}

impl AsRef<str> for OwnedVarName {
    #[inline]
    fn as_ref(&self) -> &str {
        match self {
            Self::Static(s) => s.as_ref(),
            Self::Custom(s) => s.as_ref(),
        }
    }
}

impl Borrow<VarName> for OwnedVarName {
    #[inline]
    fn borrow(&self) -> &VarName {
        self.as_ref().into()
    }
}

impl fmt::Debug for OwnedVarName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OwnedVarName({:?})", self.as_ref())
    }
}

impl fmt::Display for OwnedVarName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.as_ref(), f)
    }
}

impl PartialEq for OwnedVarName {
    fn eq(&self, other: &Self) -> bool {
        if let (&Self::Static(s1), &Self::Static(s2)) = (self, other) {
            return s1 == s2;
        }
        self.as_var() == other.as_var()
    }
}
impl Eq for OwnedVarName {}

impl PartialOrd for OwnedVarName {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OwnedVarName {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_var().cmp(other.as_var())
    }
}

impl Hash for OwnedVarName {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_var().hash(state);
    }
}
