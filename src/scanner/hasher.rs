//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! [`Hasher`] computes the BLAKE3 digest of a file's full content by feeding
//! it through a running accumulator one [`CHUNK_SIZE`] buffer at a time.
//! Memory use is bounded by a single chunk no matter how large the file is.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest_hex(Path::new("Cargo.toml")).unwrap();
//! assert_eq!(digest.len(), 64);
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// Read buffer size for streaming hashes (1 MiB).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// A 32-byte BLAKE3 digest.
pub type Hash = [u8; 32];

/// Streaming BLAKE3 file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher reading [`CHUNK_SIZE`] bytes at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the read buffer size. Zero is clamped to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Configured read buffer size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the digest of a file's entire content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// for any reason other than an interrupted system call. A failed read
    /// never yields a partial digest.
    pub fn digest(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.digest_reader(path, file)
    }

    /// Compute the digest of a file as a lowercase hex string.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::digest`].
    pub fn digest_hex(&self, path: &Path) -> Result<String, HashError> {
        self.digest(path).map(|hash| hash_to_hex(&hash))
    }

    /// Stream any reader through the accumulator. `path` is used for errors.
    fn digest_reader<R: Read>(&self, path: &Path, mut reader: R) -> Result<Hash, HashError> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Encode a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
