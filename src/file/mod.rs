//! Script input and the low-level byte readers used to decode it.
//!
//! A compiled script is nothing more than a flat byte sequence of instructions. This module
//! abstracts over where those bytes come from and provides the cursor the decoder walks them
//! with.
//!
//! # Key Components
//!
//! - [`crate::file::Script`] - The bytes of one compiled script, from disk or memory
//! - [`crate::file::Backend`] - Trait for the different data sources
//! - [`crate::file::parser::Parser`] - Forward-only cursor used by the decoder
//! - [`crate::file::io`] - Little-endian primitive reads
//!
//! # Backend Implementations
//! - [`crate::file::physical::Physical`] - Memory-mapped file backend for disk access
//! - [`crate::file::memory::Memory`] - In-memory buffer backend
//!
//! # Examples
//!
//! ```rust,no_run
//! use scmscope::{disassembler::decode_stream, prototypes::PrototypeTable, Script};
//! use std::path::Path;
//!
//! let script = Script::from_file(Path::new("main.scm"))?;
//! let instructions = decode_stream(&mut script.parser(), &PrototypeTable::default())?;
//! println!("{} bytes, {} instructions", script.len(), instructions.len());
//! # Ok::<(), scmscope::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::{Path, PathBuf};

use memory::Memory;
use parser::Parser;
use physical::Physical;

use crate::Result;

/// Backend trait for script data sources.
pub trait Backend {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

/// The bytes of one compiled script.
///
/// `Script` owns its data source and hands out [`Parser`] cursors over it. Nothing is decoded
/// up front; an empty script is valid and decodes to no instructions.
///
/// # Examples
///
/// ```rust
/// use scmscope::Script;
///
/// let script = Script::from_mem(vec![0x00, 0x00]);
/// assert_eq!(script.len(), 2);
/// assert!(script.path().is_none());
/// ```
pub struct Script {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// Where the script was loaded from, if it came from disk.
    path: Option<PathBuf>,
}

impl Script {
    /// Loads a script from the given path, memory-mapping it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn from_file(path: &Path) -> Result<Script> {
        let data: Box<dyn Backend> = if std::fs::metadata(path)?.len() == 0 {
            Box::new(Memory::new(Vec::new()))
        } else {
            Box::new(Physical::new(path)?)
        };

        Ok(Script {
            data,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wraps a script that's already loaded into memory.
    #[must_use]
    pub fn from_mem(data: Vec<u8>) -> Script {
        Script {
            data: Box::new(Memory::new(data)),
            path: None,
        }
    }

    /// Returns the script bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns the script length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the script holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Returns the path the script was loaded from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Creates a fresh [`Parser`] positioned at the start of the script.
    #[must_use]
    pub fn parser(&self) -> Parser<'_> {
        Parser::new(self.data())
    }
}
