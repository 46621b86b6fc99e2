//! `hashbang-serialize`: encode a JSON object as a URL fragment.
//!
//! Usage:
//!   hashbang-serialize [SEPARATOR]
//!
//! The document is read from stdin and must be an object.

use hashbang::cli::serialize_json;
use std::io::{self, Read, Write};

fn main() {
    let separator = std::env::args().nth(1);

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match serialize_json(buf.trim(), separator.as_deref()) {
        Ok(fragment) => {
            if let Err(e) = writeln!(io::stdout(), "{fragment}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
