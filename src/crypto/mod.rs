//! crypt(3)-style hashing core.
//!
//! This module owns format resolution, argument marshaling and failure
//! mapping; the digest math itself is delegated to the `pwhash` backends
//! and to a local MD4 backend for the NT scheme. Two entry points mirror the
//! classic C pair: [`crypt`] returns an owned string, [`crypt_r`] writes
//! into a caller-held [`CryptContext`] so concurrent callers never share
//! hidden state.

use zeroize::Zeroize;

use crate::error::CryptError;
use crate::format::{self, Format};

mod nthash;
pub mod salt;

/// Scratch size of a default [`CryptContext`], sized to hold any hash
/// the supported formats produce.
pub const SCRATCH_CAPACITY: usize = 256;

/// Caller-owned scratch for the reentrant entry point.
///
/// The context pre-allocates its scratch up front, so [`crypt_r`] itself
/// never allocates for the result. Borrowing rules force callers to copy
/// a returned hash out before the context is reused or released.
pub struct CryptContext {
    buf: Vec<u8>,
}

impl CryptContext {
    /// Creates a context with the default scratch capacity.
    pub fn new() -> Result<Self, CryptError> {
        Self::with_capacity(SCRATCH_CAPACITY)
    }

    /// Creates a context with an explicit scratch capacity.
    ///
    /// Allocation failure is reported as [`CryptError::AllocFailed`]
    /// instead of aborting the process.
    pub fn with_capacity(capacity: usize) -> Result<Self, CryptError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|e| CryptError::AllocFailed(e.to_string()))?;
        Ok(CryptContext { buf })
    }

    /// The hash most recently written into this context, or `""`.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf).unwrap_or("")
    }

    fn put(&mut self, hash: &str) -> Result<(), CryptError> {
        if hash.len() > self.buf.capacity() {
            return Err(CryptError::AllocFailed(format!(
                "hash of {} bytes exceeds scratch capacity {}",
                hash.len(),
                self.buf.capacity()
            )));
        }
        self.buf.zeroize();
        self.buf.extend_from_slice(hash.as_bytes());
        Ok(())
    }
}

impl Drop for CryptContext {
    fn drop(&mut self) {
        // Wipe the scratch so stale hashes do not linger in freed memory.
        self.buf.zeroize();
    }
}

/// Hashes a credential under the format selected by `salt`.
///
/// A salt with a recognizable magic prefix (`$1$`, `$2…`, `$3$`, `$5$`,
/// `$6$` or a leading `_`) picks its format per call; a bare salt hashes
/// under the process default configured with
/// [`set_format`](crate::set_format). Passing a previously produced hash
/// as `salt` recomputes it, so equality with the stored string checks a
/// password.
pub fn crypt(pass: impl AsRef<[u8]>, salt: &str) -> Result<String, CryptError> {
    dispatch(resolve_format(salt), pass.as_ref(), salt)
}

/// Reentrant form of [`crypt`]: the hash is written into `ctx` and
/// borrowed back out.
///
/// Every call site holds its own context, so parallel hashing cannot
/// corrupt results. The borrow returned here keeps `ctx` locked until
/// the caller copies the hash out.
pub fn crypt_r<'a>(
    pass: impl AsRef<[u8]>,
    salt: &str,
    ctx: &'a mut CryptContext,
) -> Result<&'a str, CryptError> {
    let hash = dispatch(resolve_format(salt), pass.as_ref(), salt)?;
    ctx.put(&hash)?;
    Ok(ctx.as_str())
}

/// Checks a credential against a stored hash in constant time.
///
/// Any hashing failure counts as a mismatch.
pub fn verify(pass: impl AsRef<[u8]>, hash: &str) -> bool {
    match crypt(pass, hash) {
        Ok(computed) => constant_time_eq(computed.as_bytes(), hash.as_bytes()),
        Err(_) => false,
    }
}

fn resolve_format(salt: &str) -> Format {
    Format::from_magic(salt).unwrap_or_else(format::get_format)
}

fn dispatch(format: Format, pass: &[u8], salt: &str) -> Result<String, CryptError> {
    let computed = match format {
        Format::Des if salt.starts_with('_') => pwhash::bsdi_crypt::hash_with(salt, pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
        Format::Des => pwhash::unix_crypt::hash_with(salt, pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
        Format::Md5 => pwhash::md5_crypt::hash_with(with_magic("$1$", salt).as_str(), pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
        Format::Blowfish => pwhash::bcrypt::hash_with(salt, pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
        Format::NtHash => nthash::hash(pass),
        Format::Sha256 => pwhash::sha256_crypt::hash_with(with_magic("$5$", salt).as_str(), pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
        Format::Sha512 => pwhash::sha512_crypt::hash_with(with_magic("$6$", salt).as_str(), pass)
            .map_err(|e| CryptError::CryptFailed(e.to_string()))?,
    };
    // A hash is all-or-nothing; nothing partial may escape as success.
    if computed.is_empty() {
        return Err(CryptError::CryptFailed("empty hash from backend".into()));
    }
    Ok(computed)
}

/// Prefixes `salt` with the format magic unless it already carries it,
/// so bare salts hash under the ambient default format.
fn with_magic(magic: &str, salt: &str) -> String {
    if salt.starts_with(magic) {
        salt.to_owned()
    } else {
        format!("{magic}{salt}")
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_spec_keeps_the_salt_prefix() {
        let hash = crypt("hunter2", "$1$abcdefgh").expect("hash should succeed");
        assert!(hash.starts_with("$1$abcdefgh$"));

        // Same input, same output; the scheme is deterministic.
        let again = crypt("hunter2", "$1$abcdefgh").expect("hash should succeed");
        assert_eq!(hash, again);

        // Recomputing against the stored hash reproduces it.
        assert_eq!(crypt("hunter2", &hash).expect("hash should succeed"), hash);

        assert_ne!(
            hash,
            crypt("hunter3", "$1$abcdefgh").expect("hash should succeed")
        );
        assert_ne!(
            hash,
            crypt("hunter2", "$1$hgfedcba").expect("hash should succeed")
        );

        // Empty credentials are hashable input like any other.
        let empty = crypt("", "$1$abcdefgh").expect("hash should succeed");
        assert!(empty.starts_with("$1$abcdefgh$"));
    }

    #[test]
    fn round_trips_each_format() {
        let _guard = crate::test_support::lock_format();
        let previous = format::set_format(Format::Des);

        // DES salts carry no magic, so the ambient default decides.
        assert_eq!(
            crypt("test", "aZ").expect("hash should succeed"),
            "aZGJuE6EXrjEE"
        );
        assert_eq!(
            crypt("password", "xO").expect("hash should succeed"),
            "xOAFZqRz5RduI"
        );
        assert_eq!(
            crypt("test", "aZGJuE6EXrjEE").expect("hash should succeed"),
            "aZGJuE6EXrjEE"
        );

        format::set_format(previous);

        // The prefixed formats round-trip regardless of the default.
        for spec in ["$1$abcdefgh", "$3$", "$5$abcdefgh", "$6$abcdefgh"] {
            let first = crypt("hunter2", spec).expect("hash should succeed");
            let again = crypt("hunter2", &first).expect("hash should succeed");
            assert_eq!(first, again);
        }

        let setting = salt::gensalt(Format::Blowfish, Some(4)).expect("salt should generate");
        let first = crypt("hunter2", &setting).expect("hash should succeed");
        assert_eq!(crypt("hunter2", &first).expect("hash should succeed"), first);
    }

    #[test]
    fn bsdi_extended_des_salts_are_recognized() {
        let hash = crypt("hunter2", "_J9..CCCC").expect("hash should succeed");
        assert!(hash.starts_with("_J9..CCCC"));
        assert_eq!(crypt("hunter2", &hash).expect("hash should succeed"), hash);
    }

    #[test]
    fn parallel_hashing_matches_serial_results() {
        const SPEC: &str = "$1$threads.";
        let passwords: Vec<String> = (0..8).map(|i| format!("credential-{i}")).collect();

        let serial: Vec<String> = passwords
            .iter()
            .map(|p| crypt(p, SPEC).expect("hash should succeed"))
            .collect();

        let handles: Vec<_> = passwords
            .iter()
            .cloned()
            .map(|p| std::thread::spawn(move || crypt(&p, SPEC).expect("hash should succeed")))
            .collect();

        for (handle, expected) in handles.into_iter().zip(serial) {
            assert_eq!(handle.join().expect("thread should finish"), expected);
        }
    }

    #[test]
    fn copies_survive_context_reuse_and_release() {
        let mut ctx = CryptContext::new().expect("context should allocate");

        let first = crypt_r("alpha", "$3$$", &mut ctx)
            .expect("hash should succeed")
            .to_owned();
        // Reuse overwrites the scratch; the copied-out hash must not move.
        let second = crypt_r("beta", "$3$$", &mut ctx)
            .expect("hash should succeed")
            .to_owned();
        assert_ne!(first, second);
        assert_eq!(ctx.as_str(), second);

        drop(ctx);
        assert_eq!(first, crypt("alpha", "$3$$").expect("hash should succeed"));
    }

    #[test]
    fn small_context_reports_malloc_error() {
        let mut small = CryptContext::with_capacity(8).expect("context should allocate");
        let err = crypt_r("hunter2", "$1$abcdefgh", &mut small).unwrap_err();
        assert!(matches!(err, CryptError::AllocFailed(_)));
        assert!(err.to_string().starts_with("malloc error"));
    }

    #[test]
    fn malformed_blowfish_spec_fails_to_crypt() {
        let err = crypt("hunter2", "$2b$99$not-a-valid-setting").unwrap_err();
        assert!(matches!(err, CryptError::CryptFailed(_)));
        assert!(err.to_string().starts_with("fail to crypt"));
    }

    #[test]
    fn bare_salts_use_the_process_default() {
        let _guard = crate::test_support::lock_format();
        let previous = format::set_format(Format::Md5);

        let md5 = crypt("hunter2", "saltstr").expect("hash should succeed");
        assert!(md5.starts_with("$1$saltstr$"));

        format::set_format(Format::Sha256);
        let sha = crypt("hunter2", "saltstr").expect("hash should succeed");
        assert!(sha.starts_with("$5$saltstr$"));

        // Hashing reads the default but never writes it back.
        assert_eq!(format::get_format(), Format::Sha256);

        format::set_format(previous);
    }

    #[test]
    fn nt_hashing_ignores_salt_content() {
        let bare = crypt("password", "$3$").expect("hash should succeed");
        let salted = crypt("password", "$3$$ignored-junk").expect("hash should succeed");
        assert_eq!(bare, salted);
        assert_eq!(bare, "$3$$8846f7eaee8fb117ad06bdd830b7586c");
    }

    #[test]
    fn verify_accepts_only_the_right_password() {
        let hash = crypt("sekrit", "$1$abcdefgh").expect("hash should succeed");
        assert!(verify("sekrit", &hash));
        assert!(!verify("wrong", &hash));
        assert!(!verify("sekrit", "$2b$99$broken-spec"));
    }
}
