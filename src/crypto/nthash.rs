//! NT hash backend: MD4 over the password widened to UTF-16LE.
//!
//! The salt carries no entropy for this format. Whatever follows the
//! `$3$` magic is ignored and the output is always the magic, a second
//! `$`, and the 32 hex digit digest.

use md4::{Digest, Md4};
use zeroize::Zeroize;

pub(crate) const MAGIC: &str = "$3$";

pub(crate) fn hash(pass: &[u8]) -> String {
    // Widen each byte to a little-endian UTF-16 unit. The historical
    // scheme widens bytes as-is; it does not decode the password.
    let mut wide = Vec::with_capacity(pass.len() * 2);
    for &byte in pass {
        wide.push(byte);
        wide.push(0);
    }
    let digest = Md4::digest(&wide);
    wide.zeroize();

    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{MAGIC}${hex}")
}
