//! Minimal CLI over the hashing facade. Commands map one-to-one onto the
//! library calls so operators can exercise each piece in isolation.
//!
//! Set `PWCRYPT_CONFIG` to a JSON config path to preload the process
//! default format and salt work factors.

use std::env;

use pwcrypt::config::{load_config, RuntimeConfig};
use pwcrypt::{crypt, gensalt, get_format, set_format, verify, Format};

fn print_usage() {
    eprintln!("Commands:\n  crypt <password> <salt-or-hash>\n  verify <password> <hash>\n  gensalt <format> [count]\n  set-format <format-or-id>\n  get-format\n  formats");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let config = match env::var("PWCRYPT_CONFIG") {
        Ok(path) => match load_config(&path) {
            Ok(cfg) => {
                cfg.apply();
                Some(cfg)
            }
            Err(err) => return eprintln!("config load failed: {err}"),
        },
        Err(_) => None,
    };

    match args[1].as_str() {
        "crypt" => {
            if args.len() != 4 {
                return print_usage();
            }
            match crypt(&args[2], &args[3]) {
                Ok(hash) => println!("{hash}"),
                Err(err) => eprintln!("crypt failed: {err}"),
            }
        }
        "verify" => {
            if args.len() != 4 {
                return print_usage();
            }
            let matches = verify(&args[2], &args[3]);
            println!("{}", if matches { "match" } else { "no-match" });
        }
        "gensalt" => {
            if args.len() != 3 && args.len() != 4 {
                return print_usage();
            }
            let format = match Format::from_token(&args[2]) {
                Some(f) => f,
                None => return eprintln!("unknown format: {}", args[2]),
            };
            let count = if args.len() == 4 {
                match args[3].parse::<u32>() {
                    Ok(n) => Some(n),
                    Err(_) => return eprintln!("invalid count: {}", args[3]),
                }
            } else {
                configured_count(&config, format)
            };
            match gensalt(format, count) {
                Ok(salt) => println!("{salt}"),
                Err(err) => eprintln!("gensalt failed: {err}"),
            }
        }
        "set-format" => {
            if args.len() != 3 {
                return print_usage();
            }
            let requested = match Format::from_token(&args[2]) {
                Some(f) => f,
                None => match args[2].parse::<i64>() {
                    Ok(id) => Format::from_id(id),
                    Err(_) => return eprintln!("unknown format: {}", args[2]),
                },
            };
            let previous = set_format(requested);
            println!("{}", previous.token());
        }
        "get-format" => {
            if args.len() != 2 {
                return print_usage();
            }
            println!("{}", get_format().token());
        }
        "formats" => {
            if args.len() != 2 {
                return print_usage();
            }
            for format in Format::ALL {
                println!("{:<3} {}", format.id(), format.token());
            }
        }
        _ => print_usage(),
    }
}

/// Work factor for a generated salt when none was given on the command
/// line: bcrypt cost for Blowfish, rounds for the SHA formats.
fn configured_count(config: &Option<RuntimeConfig>, format: Format) -> Option<u32> {
    let config = config.as_ref()?;
    match format {
        Format::Blowfish => config.bcrypt_cost,
        Format::Sha256 | Format::Sha512 => config.sha_crypt_rounds,
        _ => None,
    }
}
