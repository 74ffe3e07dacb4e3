//! The compression module drives huff's two directions of travel.
//!
//! Compression happens in two passes over a seekable input:
//! - Count every symbol, build the code tree and table, and work out the archive size.
//! - If the archive is forced or smaller than the input, rewind, write the header, one code per
//!   symbol, and the end-of-stream code.
//!
//! Decompression is a single pass. It reads the header back into a tree, then walks the tree one
//! bit at a time, writing a symbol at each leaf, until it lands on the end-of-stream leaf.
//!

pub mod compress;
pub mod decompress;

/// A path in the temp directory unique to this process and name, cleared of any old file.
#[cfg(test)]
pub(crate) fn scratch_path(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("huff_{}_{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path.to_string_lossy().into_owned()
}
