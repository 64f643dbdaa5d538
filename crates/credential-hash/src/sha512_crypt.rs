//! SHA-512-crypt, compatible with glibc `crypt(3)` `$6$` hashes.
//!
//! Used to check passwords imported from Unix-style stores. New verifiers
//! are CryptL7 unless a caller explicitly asks for this format.
//!
//! Verifier layout: `$6$[rounds=N$]<salt, at most 16 chars>$<86 chars>`.

use rand::Rng;
use sha2::{Digest, Sha512};

use crate::consteq::constant_time_eq;

/// Prefix identifying SHA-512-crypt verifiers.
pub const PREFIX: &str = "$6$";

/// Rounds used when the salt does not specify any.
pub const ROUNDS_DEFAULT: u32 = 5000;

/// Lowest accepted round count; smaller requests are raised to it.
pub const ROUNDS_MIN: u32 = 1000;

/// Highest accepted round count; larger requests are lowered to it.
pub const ROUNDS_MAX: u32 = 999_999_999;

/// Maximum number of salt characters that take part in hashing.
pub const SALT_LEN_MAX: usize = 16;

/// Length of the encoded 64-byte digest.
pub const HASH_LEN: usize = 86;

const ROUNDS_PREFIX: &str = "rounds=";

/// The crypt base64 alphabet, shared by salts and encoded digests.
const CRYPT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Digest byte order for the final encoding, three bytes per 4-char group.
const ENCODE_GROUPS: [(usize, usize, usize); 21] = [
    (0, 21, 42),
    (22, 43, 1),
    (44, 2, 23),
    (3, 24, 45),
    (25, 46, 4),
    (47, 5, 26),
    (6, 27, 48),
    (28, 49, 7),
    (50, 8, 29),
    (9, 30, 51),
    (31, 52, 10),
    (53, 11, 32),
    (12, 33, 54),
    (34, 55, 13),
    (56, 14, 35),
    (15, 36, 57),
    (37, 58, 16),
    (59, 17, 38),
    (18, 39, 60),
    (40, 61, 19),
    (62, 20, 41),
];

/// Parsed `rounds=N$salt` setting.
#[derive(Debug, PartialEq, Eq)]
struct Setting<'a> {
    /// Effective round count after clamping.
    rounds: u32,
    /// Whether the setting named its rounds explicitly.
    custom_rounds: bool,
    /// Salt bytes, cut at the first `$` and at 16 bytes.
    salt: &'a [u8],
}

fn parse_setting(setting: &str) -> Setting<'_> {
    let mut rest = setting.strip_prefix(PREFIX).unwrap_or(setting);
    let mut rounds = ROUNDS_DEFAULT;
    let mut custom_rounds = false;

    if let Some((digits, tail)) = rest
        .strip_prefix(ROUNDS_PREFIX)
        .and_then(|after| after.split_once('$'))
    {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let requested = digits.parse::<u64>().unwrap_or(u64::MAX);
            rounds = requested.clamp(u64::from(ROUNDS_MIN), u64::from(ROUNDS_MAX)) as u32;
            custom_rounds = true;
            rest = tail;
        }
    }

    let salt = rest.as_bytes();
    let end = salt
        .iter()
        .position(|&b| b == b'$')
        .unwrap_or(salt.len())
        .min(SALT_LEN_MAX);

    Setting {
        rounds,
        custom_rounds,
        salt: &salt[..end],
    }
}

/// Generates a salt setting of 16 random crypt-alphabet characters.
///
/// `rounds` is clamped to `[ROUNDS_MIN, ROUNDS_MAX]`; `rounds=N$` is
/// prepended only when the result differs from the default.
pub fn generate_salt<R: Rng>(rng: &mut R, rounds: u32) -> String {
    let salt: String = (0..SALT_LEN_MAX)
        .map(|_| char::from(CRYPT_ALPHABET[rng.gen_range(0..CRYPT_ALPHABET.len())]))
        .collect();

    let rounds = rounds.clamp(ROUNDS_MIN, ROUNDS_MAX);
    if rounds == ROUNDS_DEFAULT {
        salt
    } else {
        format!("{ROUNDS_PREFIX}{rounds}${salt}")
    }
}

/// Hashes `key` with the salt setting `salt`.
///
/// `salt` may be a bare salt, a `rounds=N$salt` setting, or a complete
/// verifier, with or without the `$6$` prefix.
pub fn crypt(key: &[u8], salt: &str) -> String {
    let setting = parse_setting(salt);
    let salt = setting.salt;

    let mut alt = Sha512::new();
    alt.update(key);
    alt.update(salt);
    alt.update(key);
    let alt_result = alt.finalize();

    let mut ctx = Sha512::new();
    ctx.update(key);
    ctx.update(salt);
    let mut cnt = key.len();
    while cnt > 64 {
        ctx.update(&alt_result);
        cnt -= 64;
    }
    ctx.update(&alt_result[..cnt]);

    cnt = key.len();
    while cnt > 0 {
        if cnt & 1 != 0 {
            ctx.update(&alt_result);
        } else {
            ctx.update(key);
        }
        cnt >>= 1;
    }
    let mut digest = ctx.finalize();

    let mut dp = Sha512::new();
    for _ in 0..key.len() {
        dp.update(key);
    }
    let p_bytes = repeat_to_len(&dp.finalize(), key.len());

    let mut ds = Sha512::new();
    for _ in 0..16 + usize::from(digest[0]) {
        ds.update(salt);
    }
    let s_bytes = repeat_to_len(&ds.finalize(), salt.len());

    for round in 0..setting.rounds {
        let mut ctx = Sha512::new();
        if round & 1 != 0 {
            ctx.update(&p_bytes);
        } else {
            ctx.update(&digest);
        }
        if round % 3 != 0 {
            ctx.update(&s_bytes);
        }
        if round % 7 != 0 {
            ctx.update(&p_bytes);
        }
        if round & 1 != 0 {
            ctx.update(&digest);
        } else {
            ctx.update(&p_bytes);
        }
        digest = ctx.finalize();
    }

    let mut out = String::with_capacity(PREFIX.len() + 32 + HASH_LEN);
    out.push_str(PREFIX);
    if setting.custom_rounds {
        out.push_str(&format!("{ROUNDS_PREFIX}{}$", setting.rounds));
    }
    out.push_str(&String::from_utf8_lossy(salt));
    out.push('$');
    encode_digest(&digest, &mut out);
    out
}

/// Checks `key` against a `$6$` verifier, comparing the full text in
/// constant time.
pub fn verify_password(key: &[u8], verifier: &str) -> bool {
    let computed = crypt(key, verifier);
    constant_time_eq(computed.as_bytes(), verifier.as_bytes())
}

/// Structural check of a `$6$` verifier; computes nothing.
pub fn verify_hash_text_format(text: &str) -> bool {
    let Some(mut rest) = text.strip_prefix(PREFIX) else {
        return false;
    };

    if let Some(after) = rest.strip_prefix(ROUNDS_PREFIX) {
        match after.split_once('$') {
            Some((digits, tail))
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                rest = tail;
            }
            _ => return false,
        }
    }

    let Some((salt, hash)) = rest.split_once('$') else {
        return false;
    };

    salt.len() <= SALT_LEN_MAX
        && hash.len() == HASH_LEN
        && hash.bytes().all(|b| CRYPT_ALPHABET.contains(&b))
}

fn repeat_to_len(block: &[u8], len: usize) -> Vec<u8> {
    block.iter().copied().cycle().take(len).collect()
}

fn encode_digest(digest: &[u8], out: &mut String) {
    for &(b2, b1, b0) in &ENCODE_GROUPS {
        push_b64(out, digest[b2], digest[b1], digest[b0], 4);
    }
    push_b64(out, 0, 0, digest[63], 2);
}

fn push_b64(out: &mut String, b2: u8, b1: u8, b0: u8, chars: usize) {
    let mut w = (u32::from(b2) << 16) | (u32::from(b1) << 8) | u32::from(b0);
    for _ in 0..chars {
        out.push(char::from(CRYPT_ALPHABET[(w & 0x3f) as usize]));
        w >>= 6;
    }
}
