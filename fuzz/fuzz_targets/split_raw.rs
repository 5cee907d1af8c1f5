//! Raw script fuzzer for the statement splitter.
//!
//! Feeds arbitrary UTF-8 through `split` and checks the invariants of every
//! successful split: bounded statement count, trimmed non-empty statements,
//! and rejoined statements splitting back into themselves.

use honggfuzz::fuzz;
use sql_script_splitter::testing::check_script;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(script) = std::str::from_utf8(data) {
                check_script(script);
            }
        });
    }
}
