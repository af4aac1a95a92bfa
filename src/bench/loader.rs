//! Native library loader.
//!
//! Resolves the shared library serving a codec from an optional search
//! directory and opens it with `dlopen(3)`. Failures are returned, never
//! fatal to the process.
//!
//! The directory string is validated the way a fixed `char[MAX_FILENAME_LEN]`
//! buffer would constrain it: the name, a trailing `/` and the terminating
//! NUL must all fit. A directory of `MAX_FILENAME_LEN - 2` characters without
//! a trailing slash is the longest accepted; one character more is a
//! configuration error unless it already ends in `/`. An empty directory
//! leaves name resolution to the platform's default search path.
//!
//! [`Library`] owns one `dlopen` handle. Dropping it calls `dlclose`; the
//! explicit [`Library::close`] does the same and reports the result.

use std::ffi::{c_void, CStr, CString};
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use crate::cli::constants::{LEVEL_DEBUG, LEVEL_ERR, LEVEL_INFO};
use crate::config::MAX_FILENAME_LEN;
use crate::displaylevel;

use super::adapter::symbol_pair;
use super::codecs::CodecId;
use super::error::BenchError;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
const OPEN_FLAGS: libc::c_int = libc::RTLD_NOW | libc::RTLD_DEEPBIND;
#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
const OPEN_FLAGS: libc::c_int = libc::RTLD_NOW | libc::RTLD_LOCAL;

// ── Library directory ─────────────────────────────────────────────────────────

/// Validated library search directory, normalised to end in `/` unless empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LibraryDir {
    prefix: String,
}

impl LibraryDir {
    /// Validates `dir` against [`MAX_FILENAME_LEN`] and appends a missing
    /// trailing separator.
    pub fn new(dir: &str) -> Result<Self, BenchError> {
        let len = dir.len();
        // name + '\0' must fit
        if len > MAX_FILENAME_LEN - 1 {
            displaylevel!(LEVEL_ERR, "library directory name longer than {} characters\n", MAX_FILENAME_LEN);
            return Err(BenchError::LibraryDirTooLong { len, max: MAX_FILENAME_LEN });
        }
        // name + '/' + '\0' must fit
        if len == MAX_FILENAME_LEN - 1 && !dir.ends_with('/') {
            displaylevel!(
                LEVEL_ERR,
                "library directory name with trailing slash longer than {} characters\n",
                MAX_FILENAME_LEN
            );
            return Err(BenchError::LibraryDirTooLong { len, max: MAX_FILENAME_LEN });
        }

        let mut prefix = dir.to_owned();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Ok(LibraryDir { prefix })
    }

    /// The platform default search path.
    pub fn system_default() -> Self {
        LibraryDir::default()
    }

    /// Normalised directory prefix (empty, or ending in `/`).
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Path handed to `dlopen` for `file`.
    pub fn join(&self, file: &str) -> String {
        format!("{}{}", self.prefix, file)
    }
}

// ── Library handle ────────────────────────────────────────────────────────────

/// Reads and clears the thread's last `dl*` error message.
fn last_dl_error() -> String {
    // SAFETY: dlerror returns either NULL or a NUL-terminated string owned by
    // the loader, valid until the next dl* call on this thread; it is copied
    // out immediately.
    unsafe {
        let msg = libc::dlerror();
        if msg.is_null() {
            "unknown error".to_owned()
        } else {
            CStr::from_ptr(msg).to_string_lossy().into_owned()
        }
    }
}

/// One open shared library.
pub struct Library {
    handle: NonNull<c_void>,
    path: String,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("path", &self.path)
            .field("handle", &self.handle.as_ptr())
            .finish()
    }
}

impl Library {
    /// Opens the library at `path` (a bare file name uses the default search path).
    pub fn open(path: &str) -> Result<Library, BenchError> {
        let c_path = CString::new(path).map_err(|_| BenchError::Load {
            library: path.to_owned(),
            reason: "path contains an interior NUL byte".to_owned(),
        })?;
        // SAFETY: c_path is a valid NUL-terminated string for the duration of
        // the call; dlopen has no other preconditions.
        let raw = unsafe { libc::dlopen(c_path.as_ptr(), OPEN_FLAGS) };
        match NonNull::new(raw) {
            Some(handle) => Ok(Library { handle, path: path.to_owned() }),
            None => Err(BenchError::Load {
                library: path.to_owned(),
                reason: last_dl_error(),
            }),
        }
    }

    /// Path the library was requested under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up `name` and reinterprets its address as `F`.
    ///
    /// # Safety
    /// `F` must be an `extern "C"` function-pointer type matching the
    /// native definition of `name`. The returned value must not be called
    /// after this library is closed.
    pub unsafe fn symbol<F: Copy>(&self, name: &str) -> Result<F, String> {
        debug_assert_eq!(
            mem::size_of::<F>(),
            mem::size_of::<*mut c_void>(),
            "symbol type must be pointer-sized"
        );
        let c_name = CString::new(name).map_err(|_| "symbol name contains NUL".to_owned())?;
        // clear stale state so a NULL result is attributable to this lookup
        libc::dlerror();
        let addr = libc::dlsym(self.handle.as_ptr(), c_name.as_ptr());
        if addr.is_null() {
            return Err(last_dl_error());
        }
        Ok(mem::transmute_copy::<*mut c_void, F>(&addr))
    }

    /// On-disk path of the object defining `symbol`, when the platform can tell.
    #[cfg(any(target_os = "linux", target_os = "android", target_os = "macos", target_os = "freebsd"))]
    pub fn resolved_path(&self, symbol: &str) -> Option<String> {
        let c_name = CString::new(symbol).ok()?;
        // SAFETY: the handle is open; dladdr only reads the address and fills
        // `info`, whose dli_fname points into loader-owned memory that stays
        // valid while the library is loaded. It is copied out before return.
        unsafe {
            let addr = libc::dlsym(self.handle.as_ptr(), c_name.as_ptr());
            if addr.is_null() {
                libc::dlerror();
                return None;
            }
            let mut info: libc::Dl_info = mem::zeroed();
            if libc::dladdr(addr as *const c_void, &mut info) == 0 || info.dli_fname.is_null() {
                return None;
            }
            Some(CStr::from_ptr(info.dli_fname).to_string_lossy().into_owned())
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "android", target_os = "macos", target_os = "freebsd")))]
    pub fn resolved_path(&self, _symbol: &str) -> Option<String> {
        None
    }

    /// Closes the library, reporting a `dlclose` failure.
    pub fn close(self) -> Result<(), String> {
        let handle = self.handle;
        mem::forget(self);
        // SAFETY: handle came from a successful dlopen and, since `self` was
        // consumed without running Drop, is closed exactly once here.
        let rc = unsafe { libc::dlclose(handle.as_ptr()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(last_dl_error())
        }
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        // SAFETY: see `close`; Drop and `close` are mutually exclusive.
        unsafe {
            libc::dlclose(self.handle.as_ptr());
        }
    }
}

// ── Codec → library ───────────────────────────────────────────────────────────

/// Opens the library serving `codec` from `dir`.
///
/// Codecs without a reference library fail with
/// [`BenchError::UnsupportedCodec`] before any load is attempted.
pub fn open_codec_library(dir: &LibraryDir, codec: CodecId) -> Result<Library, BenchError> {
    let file = codec.library_file().ok_or_else(|| {
        displaylevel!(
            LEVEL_ERR,
            "Only supported compression methods are: {}\n",
            super::codecs::supported_names()
        );
        BenchError::UnsupportedCodec(codec)
    })?;
    let path = dir.join(file);
    displaylevel!(LEVEL_DEBUG, "opening [{}] for {}\n", path, codec);

    let lib = Library::open(&path).map_err(|e| {
        displaylevel!(LEVEL_ERR, "{}\n", e);
        e
    })?;

    if let Some(pair) = symbol_pair(codec) {
        if let Some(resolved) = lib.resolved_path(pair.decompress) {
            displaylevel!(LEVEL_INFO, "Library [{}] opened from path: [{}]\n", file, resolved);
        }
    }
    Ok(lib)
}
