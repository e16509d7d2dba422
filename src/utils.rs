// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Sampling and encoding helpers shared across the crate.

use crate::errors::{
    InternalError::{EntropyFailure, RetryFailed},
    Result,
};
use rand::{CryptoRng, RngCore};
use unknown_order::BigNumber;

pub(crate) const CRYPTOGRAPHIC_RETRY_MAX: usize = 500usize;

/// Compute a^e (mod n).
pub(crate) fn modpow(a: &BigNumber, e: &BigNumber, n: &BigNumber) -> BigNumber {
    a.modpow(e, n)
}

/// Sample a number from the range [0, n).
///
/// Draws as many raw bytes as `n` occupies and reduces modulo `n`; any
/// failure of the generator surfaces as [`EntropyFailure`].
pub(crate) fn random_positive_bn<R: RngCore + CryptoRng>(
    rng: &mut R,
    n: &BigNumber,
) -> Result<BigNumber> {
    let mut buf = vec![0u8; n.to_bytes().len()];
    rng.try_fill_bytes(buf.as_mut_slice())
        .map_err(|_| EntropyFailure)?;
    Ok(BigNumber::from_slice(buf.as_slice()) % n)
}

/// Generate a random `BigNumber` that is in the multiplicative group of
/// integers modulo `n`.
///
/// Note: In this application, `n` is typically the product of two primes. If
/// the drawn element is not coprime with `n` and is not `0 mod n`, then the
/// caller has accidentally stumbled upon the factorization of `n`!
/// This is a security issue when `n` is someone else's Paillier modulus, but
/// the chance of this happening is basically 0 and we drop the element anyway.
pub(crate) fn random_bn_in_z_star<R: RngCore + CryptoRng>(
    rng: &mut R,
    n: &BigNumber,
) -> Result<BigNumber> {
    // Try up to `CRYPTOGRAPHIC_RETRY_MAX` times to draw a suitable element.
    // This should virtually never retry at all.
    for _ in 0..CRYPTOGRAPHIC_RETRY_MAX {
        let candidate = random_positive_bn(rng, n)?;
        if candidate != BigNumber::zero() && candidate.gcd(n) == BigNumber::one() {
            return Ok(candidate);
        }
    }
    Err(RetryFailed)
}

/// The bit of `x` at `index`, counting from the least significant bit.
pub(crate) fn bit(x: &BigNumber, index: usize) -> bool {
    let bytes = x.to_bytes();
    let byte = match bytes.len().checked_sub(1 + index / 8) {
        Some(position) => bytes[position],
        None => return false,
    };
    (byte >> (index % 8)) & 1 == 1
}

/// Big-endian encoding of `x`, adjusted to exactly `len` bytes.
///
/// Shorter values are left-padded with zeroes; longer values keep their
/// `len` least significant bytes.
pub(crate) fn to_padded_bytes(x: &BigNumber, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes();
    if bytes.len() >= len {
        bytes[bytes.len() - len..].to_vec()
    } else {
        let mut padded = vec![0u8; len - bytes.len()];
        padded.extend_from_slice(&bytes);
        padded
    }
}

////////////////////////////
// Test Utility Functions //
////////////////////////////
#[cfg(test)]
use rand::{
    rngs::{OsRng, StdRng},
    Rng, SeedableRng,
};
/// Returns an rng to be used for testing. This will print the rng seed
/// to stderr so that if a test fails, the failing seed can be recovered
/// and used for debugging.
#[cfg(test)]
pub(crate) fn get_test_rng() -> StdRng {
    let mut seeder = OsRng;
    let seed = seeder.gen();
    eprintln!("seed: {seed:?}");
    StdRng::from_seed(seed)
}
