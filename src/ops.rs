//! Embeddable operation surface.
//!
//! Hosts that expose hashing to a scripting or plugin layer get four
//! named operations over a small dynamic [`Value`] type, each with a
//! strict arity and type contract checked before anything else runs.
//! [`registry`] and [`constants`] carry the tables such a host needs to
//! publish the surface.

use crate::crypto::{self, CryptContext};
use crate::error::CryptError;
use crate::format::{self, Format};

/// Dynamically typed argument and result values for the op surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// Signature shared by every op.
pub type OpFn = fn(&[Value]) -> Result<Value, CryptError>;

/// Hashes `(credential, salt)` and returns the hash string.
pub fn crypt(args: &[Value]) -> Result<Value, CryptError> {
    expect_arity("crypt", args, 2)?;
    let pass = str_arg("crypt", args, 0)?;
    let salt = str_arg("crypt", args, 1)?;
    crypto::crypt(pass, salt).map(Value::Str)
}

/// Like [`crypt`], but runs through a scratch context scoped to this
/// call, mirroring the reentrant C form.
pub fn crypt_r(args: &[Value]) -> Result<Value, CryptError> {
    expect_arity("crypt_r", args, 2)?;
    let pass = str_arg("crypt_r", args, 0)?;
    let salt = str_arg("crypt_r", args, 1)?;

    let mut ctx = CryptContext::new()?;
    let hash = crypto::crypt_r(pass, salt, &mut ctx)?;
    Ok(Value::Str(hash.to_owned()))
}

/// Sets the process default format from a numeric id and returns the
/// token of the format that was previously in effect.
///
/// Ids with no assigned format select DES, so this op cannot fail once
/// its arguments check out.
pub fn set_format(args: &[Value]) -> Result<Value, CryptError> {
    expect_arity("set_format", args, 1)?;
    let id = int_arg("set_format", args, 0)?;

    let previous = format::set_format(Format::from_id(id));
    Ok(Value::Str(previous.token().to_owned()))
}

/// Returns the token of the current process default format.
pub fn get_format(args: &[Value]) -> Result<Value, CryptError> {
    expect_arity("get_format", args, 0)?;
    Ok(Value::Str(format::get_format().token().to_owned()))
}

/// Name-to-function table of every op, in their canonical order.
pub fn registry() -> [(&'static str, OpFn); 4] {
    [
        ("crypt", crypt as OpFn),
        ("crypt_r", crypt_r as OpFn),
        ("set_format", set_format as OpFn),
        ("get_format", get_format as OpFn),
    ]
}

/// Named format ids a host should publish alongside the ops.
pub fn constants() -> [(&'static str, i64); 6] {
    [
        ("DES", Format::Des.id()),
        ("MD5", Format::Md5.id()),
        ("BLOWFISH", Format::Blowfish.id()),
        ("NTHASH", Format::NtHash.id()),
        ("SHA256", Format::Sha256.id()),
        ("SHA512", Format::Sha512.id()),
    ]
}

fn expect_arity(op: &'static str, args: &[Value], expected: usize) -> Result<(), CryptError> {
    if args.len() != expected {
        return Err(CryptError::WrongArity {
            op,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn str_arg<'a>(op: &'static str, args: &'a [Value], index: usize) -> Result<&'a str, CryptError> {
    match &args[index] {
        Value::Str(s) => Ok(s),
        Value::Int(_) => Err(CryptError::BadArgument {
            op,
            index: index + 1,
            expected: "string",
        }),
    }
}

fn int_arg(op: &'static str, args: &[Value], index: usize) -> Result<i64, CryptError> {
    match &args[index] {
        Value::Int(n) => Ok(*n),
        Value::Str(_) => Err(CryptError::BadArgument {
            op,
            index: index + 1,
            expected: "integer",
        }),
    }
}
