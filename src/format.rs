//! Hash format identities and the process-wide default.
//!
//! A format is selected per call when the salt carries a recognizable
//! magic prefix; bare salts fall back to the ambient default configured
//! with [`set_format`]. The default lives behind a mutex because it is
//! process state shared by every thread that hashes.

use std::sync::Mutex;

/// A password hashing format understood by the facade.
///
/// The numeric ids mirror the digit of each format's `$N$` salt magic,
/// which is why 4 is unassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Des = 0,
    Md5 = 1,
    Blowfish = 2,
    NtHash = 3,
    Sha256 = 5,
    Sha512 = 6,
}

impl Format {
    /// Every format, in id order.
    pub const ALL: [Format; 6] = [
        Format::Des,
        Format::Md5,
        Format::Blowfish,
        Format::NtHash,
        Format::Sha256,
        Format::Sha512,
    ];

    /// Numeric id of this format.
    pub fn id(self) -> i64 {
        self as i64
    }

    /// Short configuration token of this format, e.g. `"blf"`.
    pub fn token(self) -> &'static str {
        match self {
            Format::Des => "des",
            Format::Md5 => "md5",
            Format::Blowfish => "blf",
            Format::NtHash => "nth",
            Format::Sha256 => "sha256",
            Format::Sha512 => "sha512",
        }
    }

    /// Maps a numeric id to its format. Ids with no assigned format
    /// resolve to DES, the scheme with id 0.
    pub fn from_id(id: i64) -> Format {
        match id {
            1 => Format::Md5,
            2 => Format::Blowfish,
            3 => Format::NtHash,
            5 => Format::Sha256,
            6 => Format::Sha512,
            _ => Format::Des,
        }
    }

    /// Parses a configuration token such as `"sha512"`.
    pub fn from_token(token: &str) -> Option<Format> {
        Format::ALL.iter().copied().find(|f| f.token() == token)
    }

    /// Recognizes the magic prefix of a salt or full hash string.
    ///
    /// Returns `None` for bare salts, which hash under the ambient
    /// default instead.
    pub fn from_magic(salt: &str) -> Option<Format> {
        if salt.starts_with("$1$") {
            Some(Format::Md5)
        } else if salt.starts_with("$2") {
            Some(Format::Blowfish)
        } else if salt.starts_with("$3$") {
            Some(Format::NtHash)
        } else if salt.starts_with("$5$") {
            Some(Format::Sha256)
        } else if salt.starts_with("$6$") {
            Some(Format::Sha512)
        } else if salt.starts_with('_') {
            // Extended DES salts mark themselves with an underscore.
            Some(Format::Des)
        } else {
            None
        }
    }
}

static DEFAULT_FORMAT: Mutex<Format> = Mutex::new(Format::Sha512);

fn lock_default() -> std::sync::MutexGuard<'static, Format> {
    // The guarded value is a plain copy type, so a poisoned lock still
    // holds a usable format.
    DEFAULT_FORMAT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replaces the process-wide default format and returns the previous one.
///
/// The default only matters for salts without a magic prefix; calls that
/// pass a prefixed salt are unaffected. Swapping the default while other
/// threads hash bare salts is safe but leaves it unspecified which calls
/// see the old value.
pub fn set_format(format: Format) -> Format {
    let mut current = lock_default();
    std::mem::replace(&mut *current, format)
}

/// Reads the process-wide default format.
pub fn get_format() -> Format {
    *lock_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_ids_follow_the_table() {
        let table = [
            (Format::Des, 0, "des"),
            (Format::Md5, 1, "md5"),
            (Format::Blowfish, 2, "blf"),
            (Format::NtHash, 3, "nth"),
            (Format::Sha256, 5, "sha256"),
            (Format::Sha512, 6, "sha512"),
        ];
        for (format, id, token) in table {
            assert_eq!(format.id(), id);
            assert_eq!(format.token(), token);
            assert_eq!(Format::from_id(id), format);
            assert_eq!(Format::from_token(token), Some(format));
        }
    }

    #[test]
    fn unmapped_ids_resolve_to_des() {
        for id in [4, 7, -1, 1000] {
            assert_eq!(Format::from_id(id), Format::Des);
        }
        assert_eq!(Format::from_token("sha1"), None);
        assert_eq!(Format::from_token(""), None);
    }

    #[test]
    fn magic_prefixes_identify_formats() {
        assert_eq!(Format::from_magic("$1$abcdefgh"), Some(Format::Md5));
        assert_eq!(
            Format::from_magic("$2b$10$abcdefghijklmnopqrstuv"),
            Some(Format::Blowfish)
        );
        assert_eq!(Format::from_magic("$2y$05$x"), Some(Format::Blowfish));
        assert_eq!(
            Format::from_magic("$3$$8846f7eaee8fb117ad06bdd830b7586c"),
            Some(Format::NtHash)
        );
        assert_eq!(Format::from_magic("$5$rounds=5000$salt"), Some(Format::Sha256));
        assert_eq!(Format::from_magic("$6$saltsalt"), Some(Format::Sha512));
        assert_eq!(Format::from_magic("_J9..CCCC"), Some(Format::Des));
        assert_eq!(Format::from_magic("ab"), None);
        assert_eq!(Format::from_magic("$4$nope"), None);
        assert_eq!(Format::from_magic(""), None);
    }

    #[test]
    fn default_format_swaps_and_reports_previous() {
        let _guard = crate::test_support::lock_format();
        let initial = set_format(Format::Sha512);

        for format in Format::ALL {
            set_format(format);
            assert_eq!(get_format(), format);
        }
        assert_eq!(set_format(Format::Md5), Format::Sha512);
        assert_eq!(get_format(), Format::Md5);

        set_format(initial);
    }
}
