use std::fs::File;
use std::path::Path;

use memmap::{Mmap, MmapOptions};

use errors::Result;

/// An in-memory byte buffer that can be used as a slice.
///
/// Level files and shader scripts are both read whole, either by mapping
/// the file or by handing over bytes that are already in memory.  The
/// `bytes()` method will give back the byte slice after the `InputBuffer`
/// is created.
pub enum InputBuffer {
    Owned(Vec<u8>),
    File(Mmap),
}

impl InputBuffer {
    /// Creates an `InputBuffer` by memory-mapping a file
    ///
    /// This will map the specified file into read-only memory.  Empty files
    /// can't be mapped, so they come back as an empty owned buffer instead.
    pub fn new_from_file<P>(path: P) -> Result<InputBuffer>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(InputBuffer::Owned(Vec::new()));
        }
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        Ok(InputBuffer::File(mmap))
    }

    /// Wraps bytes that were produced some other way
    pub fn from_vec(buf: Vec<u8>) -> InputBuffer {
        InputBuffer::Owned(buf)
    }

    /// Gets the stored buffer of bytes
    pub fn bytes(&self) -> &[u8] {
        match *self {
            InputBuffer::Owned(ref v) => &*v,
            InputBuffer::File(ref m) => &*m,
        }
    }
}
