//! Per-run codec context: setup, lookup and teardown of library handles.
//!
//! A [`BenchContext`] is scoped to one benchmark invocation and owns every
//! library opened for it. LZ4 and LZ4HC are served by the same file, so their
//! slots alias one [`Library`] through an `Rc`; teardown releases each
//! underlying library exactly once however many slots point at it.

use std::fmt;
use std::rc::Rc;

use crate::cli::constants::{LEVEL_DEBUG, LEVEL_ERR};
use crate::displaylevel;

use super::adapter::EntryPoints;
use super::codecs::{CodecId, CODEC_COUNT};
use super::error::BenchError;
use super::loader::{open_codec_library, Library, LibraryDir};

/// A fully resolved codec: open library plus both entry points.
///
/// Either both entry points resolved or the handle was never created.
pub struct CodecHandle {
    library: Option<Rc<Library>>,
    entry: EntryPoints,
}

impl fmt::Debug for CodecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecHandle")
            .field("codec", &self.entry.codec())
            .field("library", &self.library_path())
            .finish()
    }
}

impl CodecHandle {
    /// Wraps entry points that live in the current process image, such as
    /// test doubles or a statically linked codec. No library is released for
    /// this handle at teardown.
    pub fn in_process(entry: EntryPoints) -> Self {
        CodecHandle { library: None, entry }
    }

    pub fn codec(&self) -> CodecId {
        self.entry.codec()
    }

    #[inline]
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry
    }

    /// Path the backing library was opened under, if any.
    pub fn library_path(&self) -> Option<&str> {
        self.library.as_deref().map(Library::path)
    }

    /// `true` when both handles are backed by the same open library.
    pub fn shares_library_with(&self, other: &CodecHandle) -> bool {
        match (&self.library, &other.library) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Handles for every codec selected by one run.
pub struct BenchContext {
    dir: LibraryDir,
    slots: [Option<CodecHandle>; CODEC_COUNT],
}

impl fmt::Debug for BenchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchContext")
            .field("dir", &self.dir)
            .field("open", &self.open_codecs().collect::<Vec<_>>())
            .finish()
    }
}

impl BenchContext {
    pub fn new(dir: LibraryDir) -> Self {
        BenchContext {
            dir,
            slots: Default::default(),
        }
    }

    pub fn library_dir(&self) -> &LibraryDir {
        &self.dir
    }

    /// Opens and resolves every codec in `codecs`.
    ///
    /// Stops at the first failure. Codecs set up before it stay valid and
    /// are released by [`BenchContext::teardown`]; the failing codec leaves
    /// its slot empty. Already-populated slots are left untouched.
    pub fn setup(&mut self, codecs: &[CodecId]) -> Result<(), BenchError> {
        for &codec in codecs {
            if self.slots[codec.index()].is_some() {
                continue;
            }
            let library = match self.shared_library_for(codec) {
                Some(lib) => {
                    displaylevel!(LEVEL_DEBUG, "{} shares [{}]\n", codec, lib.path());
                    lib
                }
                None => Rc::new(open_codec_library(&self.dir, codec)?),
            };
            let entry = EntryPoints::resolve(&library, codec)?;
            self.slots[codec.index()] = Some(CodecHandle {
                library: Some(library),
                entry,
            });
        }
        Ok(())
    }

    /// An already-open library serving the same file as `codec`.
    fn shared_library_for(&self, codec: CodecId) -> Option<Rc<Library>> {
        let file = codec.library_file()?;
        self.slots
            .iter()
            .flatten()
            .filter(|h| h.codec().library_file() == Some(file))
            .find_map(|h| h.library.clone())
    }

    /// Places a pre-built handle in its codec's slot, replacing any previous one.
    pub fn install(&mut self, handle: CodecHandle) {
        let idx = handle.codec().index();
        self.slots[idx] = Some(handle);
    }

    pub fn handle(&self, codec: CodecId) -> Option<&CodecHandle> {
        self.slots[codec.index()].as_ref()
    }

    #[inline]
    pub fn is_open(&self, codec: CodecId) -> bool {
        self.slots[codec.index()].is_some()
    }

    /// Codecs with a resolved handle, in table order.
    pub fn open_codecs(&self) -> impl Iterator<Item = CodecId> + '_ {
        self.slots.iter().flatten().map(CodecHandle::codec)
    }

    /// Releases every open library once; returns how many were closed.
    ///
    /// Safe after a partial setup and idempotent: empty slots are skipped and
    /// a second call finds nothing left to release.
    pub fn teardown(&mut self) -> usize {
        let mut libraries: Vec<Rc<Library>> = Vec::new();
        for handle in self.slots.iter_mut().filter_map(Option::take) {
            if let Some(lib) = handle.library {
                if !libraries.iter().any(|seen| Rc::ptr_eq(seen, &lib)) {
                    libraries.push(lib);
                }
            }
        }

        let mut closed = 0;
        for lib in libraries {
            match Rc::try_unwrap(lib) {
                Ok(lib) => {
                    let path = lib.path().to_owned();
                    match lib.close() {
                        Ok(()) => {
                            displaylevel!(LEVEL_DEBUG, "closed [{}]\n", path);
                            closed += 1;
                        }
                        Err(reason) => {
                            displaylevel!(LEVEL_ERR, "error closing [{}]: {}\n", path, reason)
                        }
                    }
                }
                // still referenced elsewhere; the last drop closes it
                Err(shared) => drop(shared),
            }
        }
        closed
    }
}

impl Drop for BenchContext {
    fn drop(&mut self) {
        self.teardown();
    }
}
