use std::fmt::Write;

use sha2::{Digest, Sha256};

pub const FINGERPRINT_LEN: usize = 32;

/// Cache key for a prediction context. `history` is expected to be redacted already.
///
/// Every part is length-prefixed so that different splits of the same bytes
/// (`["git", "status"]` and `["gits", "tatus"]`) hash differently.
pub fn fingerprint(history: &[String], cwd: &str, git_branch: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update((history.len() as u64).to_le_bytes());
    for command in history {
        update_framed(&mut hasher, command);
    }
    update_framed(&mut hasher, cwd);
    update_framed(&mut hasher, git_branch);
    let mut out = hex_digest(&hasher.finalize());
    out.truncate(FINGERPRINT_LEN);
    out
}

fn update_framed(hasher: &mut Sha256, part: &str) {
    hasher.update((part.len() as u64).to_le_bytes());
    hasher.update(part.as_bytes());
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut out, "{:02x}", byte);
    }
    out
}
