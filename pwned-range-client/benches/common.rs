use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pwned_range_client::hash::{HEX_CHARS, SUFFIX_LEN};

/// Seeded random passwords of 8 to 64 printable ASCII characters.
pub fn generate_random_passwords(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut passwords = Vec::with_capacity(count);
    while passwords.len() < count {
        let len = rng.gen_range(8..=64);
        passwords.push((0..len).map(|_| rng.gen_range(b'!'..=b'~') as char).collect());
    }
    passwords
}

/// Generates a range response body of `lines` random `SUFFIX:COUNT` records,
/// CRLF-terminated like the live API.
pub fn generate_range_body(lines: usize) -> String {
    let mut rng = StdRng::seed_from_u64(7);
    let mut body = String::with_capacity(lines * (SUFFIX_LEN + 10));
    for _ in 0..lines {
        for _ in 0..SUFFIX_LEN {
            body.push(HEX_CHARS[rng.gen_range(0..HEX_CHARS.len())] as char);
        }
        body.push(':');
        body.push_str(&rng.gen_range(1..100_000u64).to_string());
        body.push_str("\r\n");
    }
    body
}
