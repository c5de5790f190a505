//! The handful of file operations the shader code needs, behind a trait so the whole thing can be
//! pointed at something other than the real disk.

use std::io::{BufWriter, Write};
use std::path::Path;

use errors::Result;
use input_buffer::InputBuffer;

/// Directory listings stop after this many files.
pub const MAX_FOUND_FILES: usize = 4096;

pub trait ShaderFs {
    /// Names (not paths) of the regular files directly inside `dir` whose names end with
    /// `extension`, ignoring case.  Sorted, so scanning order is repeatable.
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>>;

    /// Read an entire file.
    fn read_file(&self, path: &Path) -> Result<InputBuffer>;

    /// Open a file for appending, creating it if necessary.  Existing contents are never touched.
    fn open_append(&self, path: &Path) -> Result<Box<Write>>;
}

fn has_extension(name: &str, extension: &str) -> bool {
    let name = name.as_bytes();
    let extension = extension.as_bytes();
    name.len() >= extension.len() && name[name.len() - extension.len()..].eq_ignore_ascii_case(extension)
}

/// The real filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiskFs;

impl ShaderFs for DiskFs {
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>> {
        let mut ret = Vec::new();
        for entry in ::std::fs::read_dir(dir)? {
            let entry = entry?;
            // Follow symlinks, and skip anything we can't stat
            let is_file = ::std::fs::metadata(entry.path()).map(|meta| meta.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !has_extension(&name, extension) {
                continue;
            }
            if ret.len() == MAX_FOUND_FILES {
                warn!("too many files in {}, ignoring the rest", dir.display());
                break;
            }
            ret.push(name);
        }
        ret.sort();
        Ok(ret)
    }

    fn read_file(&self, path: &Path) -> Result<InputBuffer> {
        InputBuffer::new_from_file(path)
    }

    fn open_append(&self, path: &Path) -> Result<Box<Write>> {
        let file = ::std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
