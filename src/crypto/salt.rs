//! Salt synthesis for fresh hashes.
//!
//! [`gensalt`] produces a salt string ready to feed to
//! [`crypt`](crate::crypt), shaped for the requested format. The
//! optional `count` tunes the formats with a work factor: bcrypt cost
//! for Blowfish, round count for the SHA formats. The other formats
//! ignore it.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptError;
use crate::format::Format;

/// Hash64 alphabet shared by the DES, MD5 and SHA based formats.
const CRYPT64: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Bcrypt orders the same characters differently; its salts must use this one.
const BCRYPT64: &[u8; 64] =
    b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

const DES_SALT_LEN: usize = 2;
const MD5_SALT_LEN: usize = 8;
const SHA_SALT_LEN: usize = 16;
const BCRYPT_SALT_BYTES: usize = 16;

const SHA_ROUNDS_MIN: u32 = 1_000;
const SHA_ROUNDS_MAX: u32 = 999_999_999;
const BCRYPT_COST_MIN: u32 = 4;
const BCRYPT_COST_MAX: u32 = 31;
const BCRYPT_COST_DEFAULT: u32 = 10;

/// Generates a random salt in the shape the given format expects.
pub fn gensalt(format: Format, count: Option<u32>) -> Result<String, CryptError> {
    match format {
        Format::Des => Ok(random_crypt64(DES_SALT_LEN)),
        Format::Md5 => Ok(format!("$1${}", random_crypt64(MD5_SALT_LEN))),
        // NT hashing is unsalted; the shape is the magic alone.
        Format::NtHash => Ok("$3$$".to_owned()),
        Format::Sha256 => Ok(sha_salt("$5$", count)),
        Format::Sha512 => Ok(sha_salt("$6$", count)),
        Format::Blowfish => bcrypt_salt(count),
    }
}

fn sha_salt(magic: &str, count: Option<u32>) -> String {
    let body = random_crypt64(SHA_SALT_LEN);
    match count {
        // The SHA based formats clamp out-of-range rounds instead of failing.
        Some(rounds) => {
            let rounds = rounds.clamp(SHA_ROUNDS_MIN, SHA_ROUNDS_MAX);
            format!("{magic}rounds={rounds}${body}")
        }
        None => format!("{magic}{body}"),
    }
}

fn bcrypt_salt(count: Option<u32>) -> Result<String, CryptError> {
    let cost = count.unwrap_or(BCRYPT_COST_DEFAULT);
    if !(BCRYPT_COST_MIN..=BCRYPT_COST_MAX).contains(&cost) {
        return Err(CryptError::InvalidSalt(format!(
            "bcrypt cost {cost} outside {BCRYPT_COST_MIN}..={BCRYPT_COST_MAX}"
        )));
    }
    let mut raw = [0u8; BCRYPT_SALT_BYTES];
    OsRng.fill_bytes(&mut raw);
    Ok(format!("$2b${cost:02}${}", bcrypt64_encode(&raw)))
}

fn random_crypt64(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| CRYPT64[(b & 0x3f) as usize] as char)
        .collect()
}

/// Unpadded base64 over the bcrypt alphabet; 16 bytes encode to 22 chars.
fn bcrypt64_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = u32::from(chunk.get(1).copied().unwrap_or(0));
        let b2 = u32::from(chunk.get(2).copied().unwrap_or(0));
        let triple = (b0 << 16) | (b1 << 8) | b2;
        out.push(BCRYPT64[(triple >> 18 & 0x3f) as usize] as char);
        out.push(BCRYPT64[(triple >> 12 & 0x3f) as usize] as char);
        if chunk.len() > 1 {
            out.push(BCRYPT64[(triple >> 6 & 0x3f) as usize] as char);
        }
        if chunk.len() > 2 {
            out.push(BCRYPT64[(triple & 0x3f) as usize] as char);
        }
    }
    out
}
