//! crypt(3)-style password hashing facade with selectable formats.
//!
//! The crate wraps the classic Unix crypt family behind one typed entry
//! point: the salt's magic prefix picks the format per call, bare salts
//! hash under a process-wide default, and a reentrant variant keeps all
//! scratch state in a caller-owned context. An [`ops`] layer re-exposes
//! the same four calls over dynamic values, for hosts that embed the
//! facade in a scripting or plugin surface.
//!
//! ```
//! let hash = pwcrypt::crypt("hunter2", "$1$abcdefgh")?;
//! assert!(hash.starts_with("$1$abcdefgh$"));
//! assert!(pwcrypt::verify("hunter2", &hash));
//! # Ok::<(), pwcrypt::CryptError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod ops;

pub use crypto::salt::gensalt;
pub use crypto::{crypt, crypt_r, verify, CryptContext, SCRATCH_CAPACITY};
pub use error::CryptError;
pub use format::{get_format, set_format, Format};
