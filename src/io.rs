//! Line-oriented input for dump files.
//!
//! Small files go through a buffered reader; files at or above the mmap
//! threshold are memory-mapped and scanned with memchr. Both paths hand back
//! one `String` per line with the newline (and any trailing `\r`) removed,
//! decoded lossily so undecodable bytes never abort a scan.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;

/// File size at which reads switch to mmap. Pass `u64::MAX` to disable.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Expand a leading `~` to the user's home directory. Paths that are not
/// valid UTF-8 or have no `~` prefix pass through untouched.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// A line iterator over a file, buffered or memory-mapped.
pub enum LineSource {
    Buffered(BufReader<File>),
    Mapped { map: Mmap, pos: usize },
}

impl LineSource {
    /// Open `path`, memory-mapping when the file size reaches
    /// `threshold_bytes`. Empty files cannot be mapped and always buffer.
    pub fn open<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let meta = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?;
        if meta.is_file() && meta.len() > 0 && meta.len() >= threshold_bytes {
            let map = unsafe { Mmap::map(&file) }
                .with_context(|| format!("mmap {}", path.display()))?;
            Ok(Self::Mapped { map, pos: 0 })
        } else {
            Ok(Self::Buffered(BufReader::new(file)))
        }
    }
}

impl Iterator for LineSource {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Buffered(reader) => {
                let mut buf = Vec::new();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => None,
                    Ok(_) => {
                        if buf.last() == Some(&b'\n') {
                            buf.pop();
                        }
                        Some(Ok(decode_line(&buf)))
                    }
                    Err(e) => Some(Err(e)),
                }
            }
            Self::Mapped { map, pos } => {
                let data: &[u8] = map;
                if *pos >= data.len() {
                    return None;
                }
                let start = *pos;
                let end = match memchr::memchr(b'\n', &data[start..]) {
                    Some(off) => {
                        *pos = start + off + 1;
                        start + off
                    }
                    None => {
                        *pos = data.len();
                        data.len()
                    }
                };
                Some(Ok(decode_line(&data[start..end])))
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    // Trim a trailing '\r' (Windows CRLF)
    let bytes = if bytes.ends_with(b"\r") {
        &bytes[..bytes.len() - 1]
    } else {
        bytes
    };
    String::from_utf8_lossy(bytes).into_owned()
}
