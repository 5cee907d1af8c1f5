//! Structured script fuzzer for the statement splitter.
//!
//! Builds well-formed scripts out of words, literals, comments and
//! delimiters. Every such script must split, strip its comments equivalently,
//! and keep its quoted literals byte for byte.

use honggfuzz::fuzz;
use sql_script_splitter::testing::{FuzzScript, check_fuzz_script};

fn main() {
    loop {
        fuzz!(|script: FuzzScript| {
            check_fuzz_script(&script);
        });
    }
}
