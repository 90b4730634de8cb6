//! Random value producers backing the emitted round-trip fixtures.
//!
//! Values are shape-valid, not meaningful. Optional values are always present
//! until [`MAX_FILL_DEPTH`] is reached, which only recursive definitions do.

use std::collections::BTreeMap;

pub use rand::Rng;
use rand::distributions::Alphanumeric;

use super::api_error::{ApiError, RequestParam};

pub const MAX_ARRAY_LENGTH: usize = 3;
/// Strings are strictly shorter than this.
pub const MAX_STRING_LENGTH: usize = 25;
pub const MAX_INTEGER: i64 = 10_000;
pub const MAX_FILL_DEPTH: usize = 8;

/// Fills a value of `Self` with random data.
pub trait RandomFill: Sized {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self;
}

impl RandomFill for String {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, _depth: usize) -> Self {
        let len: usize = rng.gen_range(0..MAX_STRING_LENGTH);
        (0..len)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }
}

impl RandomFill for i64 {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, _depth: usize) -> Self {
        rng.gen_range(0..MAX_INTEGER)
    }
}

/// Standard normal sample (Box-Muller).
impl RandomFill for f64 {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, _depth: usize) -> Self {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

impl RandomFill for bool {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, _depth: usize) -> Self {
        rng.gen_bool(0.5)
    }
}

impl<T: RandomFill> RandomFill for Vec<T> {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        if depth >= MAX_FILL_DEPTH {
            return Vec::new();
        }
        let len: usize = rng.gen_range(0..=MAX_ARRAY_LENGTH);
        (0..len).map(|_| T::random_fill(rng, depth + 1)).collect()
    }
}

impl<T: RandomFill> RandomFill for Option<T> {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        if depth >= MAX_FILL_DEPTH {
            return None;
        }
        Some(T::random_fill(rng, depth + 1))
    }
}

impl<T: RandomFill> RandomFill for Box<T> {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        Box::new(T::random_fill(rng, depth))
    }
}

/// Keys are decimal digit strings, matching the numeric-key pattern.
impl<T: RandomFill> RandomFill for BTreeMap<String, T> {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        if depth >= MAX_FILL_DEPTH {
            return BTreeMap::new();
        }
        let len: usize = rng.gen_range(0..=MAX_ARRAY_LENGTH);
        (0..len)
            .map(|_| {
                let key: String = rng.gen_range(0..MAX_INTEGER).to_string();
                (key, T::random_fill(rng, depth + 1))
            })
            .collect()
    }
}

impl RandomFill for RequestParam {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        Self {
            key: String::random_fill(rng, depth + 1),
            value: String::random_fill(rng, depth + 1),
        }
    }
}

impl RandomFill for ApiError {
    fn random_fill<R: Rng + ?Sized>(rng: &mut R, depth: usize) -> Self {
        Self {
            error_code: rng.gen_range(1..MAX_INTEGER),
            error_subcode: RandomFill::random_fill(rng, depth + 1),
            error_msg: RandomFill::random_fill(rng, depth + 1),
            error_text: RandomFill::random_fill(rng, depth + 1),
            request_params: RandomFill::random_fill(rng, depth + 1),
            redirect_uri: RandomFill::random_fill(rng, depth + 1),
            confirmation_text: RandomFill::random_fill(rng, depth + 1),
            captcha_sid: RandomFill::random_fill(rng, depth + 1),
            captcha_img: RandomFill::random_fill(rng, depth + 1),
        }
    }
}
