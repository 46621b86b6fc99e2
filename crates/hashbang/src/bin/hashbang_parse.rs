//! `hashbang-parse`: decode a URL fragment into JSON.
//!
//! Usage:
//!   hashbang-parse [SEPARATOR]
//!
//! The fragment is read from stdin and the decoded tree is printed to
//! stdout. A fragment that does not start with the separator prints `{}`
//! and exits with status 2.

use hashbang::cli::parse_fragment;
use std::io::{self, Read, Write};

fn main() {
    let separator = std::env::args().nth(1);

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match parse_fragment(buf.trim(), separator.as_deref()) {
        Ok((json, parsed)) => {
            if let Err(e) = writeln!(io::stdout(), "{json}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
            if !parsed {
                eprintln!("Fragment is not in hashbang format.");
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
