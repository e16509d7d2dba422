// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The Paillier additively homomorphic cryptosystem.
//!
//! Keys are generated from scratch: primes come out of a Miller-Rabin test
//! over uniformly sampled candidates, and the decryption parameters are the
//! textbook `lambda = lcm(p-1, q-1)` and `mu = L(g^lambda mod N^2)^-1 mod N`.
//! Ciphertexts multiply to add their plaintexts and exponentiate to scale
//! them.

use crate::errors::Result;
use crate::utils::{modpow, random_bn_in_z_star, random_positive_bn, CRYPTOGRAPHIC_RETRY_MAX};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unknown_order::BigNumber;

/// Paillier-specific errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaillierError {
    #[error("A Paillier plaintext or ciphertext was outside the admissible range")]
    OutOfRange,
    #[error("Failed to create a Paillier decryption key from inputs")]
    CouldNotCreateKey,
}

/// A Paillier ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(pub(crate) BigNumber);

/// The public half of a Paillier keypair: the modulus `N`, the base `g` and
/// the cached square `N^2`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionKey {
    n: BigNumber,
    g: BigNumber,
    nn: BigNumber,
}

impl EncryptionKey {
    /// The modulus `N`.
    pub fn n(&self) -> &BigNumber {
        &self.n
    }

    /// Encrypt `m` under this key.
    ///
    /// The blinding nonce is drawn from `Z*_N` using `rng`. Fails with
    /// [`PaillierError::OutOfRange`] unless `0 <= m < N`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        m: &BigNumber,
    ) -> Result<Ciphertext> {
        if m < &BigNumber::zero() || m >= &self.n {
            Err(PaillierError::OutOfRange)?;
        }
        let nonce = random_bn_in_z_star(rng, &self.n)?;
        // c = g^m * nonce^N mod N^2
        let a = modpow(&self.g, m, &self.nn);
        let b = modpow(&nonce, &self.n, &self.nn);
        Ok(Ciphertext(a.modmul(&b, &self.nn)))
    }

    /// Combine two ciphertexts into one that decrypts to the sum of their
    /// plaintexts modulo `N`.
    pub fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
        Ciphertext(c1.0.modmul(&c2.0, &self.nn))
    }

    /// Raise a ciphertext to a scalar, producing one that decrypts to the
    /// plaintext scaled by `k` modulo `N`.
    pub fn mul(&self, c: &Ciphertext, k: &BigNumber) -> Ciphertext {
        Ciphertext(modpow(&c.0, k, &self.nn))
    }
}

/// The private half of a Paillier keypair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionKey {
    lambda: BigNumber,
    mu: BigNumber,
    n: BigNumber,
    nn: BigNumber,
}

impl DecryptionKey {
    /// Generate a fresh keypair whose modulus is `bits` long.
    ///
    /// Draws two distinct primes of `bits / 2` bits each, then samples the
    /// base `g` until `L(g^lambda mod N^2)` is invertible modulo `N`.
    pub fn new(
        rng: &mut (impl CryptoRng + RngCore),
        bits: usize,
    ) -> Result<(DecryptionKey, EncryptionKey)> {
        let (p, q) = loop {
            let p = prime_gen::random_prime(rng, bits / 2)?;
            let q = prime_gen::random_prime(rng, bits / 2)?;
            if p != q {
                break (p, q);
            }
        };
        let n = &p * &q;
        let nn = &n * &n;
        // lambda = lcm(p-1, q-1)
        let p_minus_one = &p - 1u32;
        let q_minus_one = &q - 1u32;
        let lambda = (&p_minus_one * &q_minus_one) / p_minus_one.gcd(&q_minus_one);

        let mut base_and_mu = None;
        for _ in 0..CRYPTOGRAPHIC_RETRY_MAX {
            let g = random_positive_bn(rng, &nn)?;
            if g.gcd(&nn) != BigNumber::one() {
                continue;
            }
            // mu = L(g^lambda mod N^2)^-1 mod N, when the inverse exists
            if let Some(mu) = l(&modpow(&g, &lambda, &nn), &n).invert(&n) {
                base_and_mu = Some((g, mu));
                break;
            }
        }
        let (g, mu) = base_and_mu.ok_or(PaillierError::CouldNotCreateKey)?;

        let encryption_key = EncryptionKey {
            n: n.clone(),
            g,
            nn: nn.clone(),
        };
        let decryption_key = DecryptionKey { lambda, mu, n, nn };
        Ok((decryption_key, encryption_key))
    }

    /// Decrypt `c`.
    ///
    /// Fails with [`PaillierError::OutOfRange`] unless `0 < c < N^2`.
    pub fn decrypt(&self, c: &Ciphertext) -> Result<BigNumber> {
        if c.0 <= BigNumber::zero() || c.0 >= self.nn {
            Err(PaillierError::OutOfRange)?;
        }
        // m = L(c^lambda mod N^2) * mu mod N
        Ok(l(&modpow(&c.0, &self.lambda, &self.nn), &self.n).modmul(&self.mu, &self.n))
    }
}

/// `L(x) = (x - 1) / N`, defined only for `x = 1 (mod N)`.
fn l(x: &BigNumber, n: &BigNumber) -> BigNumber {
    let numerator = x - 1u32;
    assert!(
        &numerator % n == BigNumber::zero(),
        "L(x) requires x = 1 (mod N)",
    );
    numerator / n
}

// Prime generation for Paillier keys.
pub(crate) mod prime_gen {
    use super::*;
    use crate::parameters::MILLER_RABIN_ROUNDS;
    use crate::utils::bit;

    /// Sample a prime of exactly `bits` bits.
    ///
    /// Candidates are drawn uniformly from `[0, 2^bits)` and kept only when
    /// they have full bit length and pass the primality test. No sieving.
    pub(crate) fn random_prime(
        rng: &mut (impl CryptoRng + RngCore),
        bits: usize,
    ) -> Result<BigNumber> {
        let ceiling = BigNumber::one() << bits;
        loop {
            let candidate = random_positive_bn(rng, &ceiling)?;
            if candidate.bit_length() != bits {
                continue;
            }
            if is_probably_prime(rng, &candidate)? {
                return Ok(candidate);
            }
        }
    }

    /// Miller-Rabin primality test with [`MILLER_RABIN_ROUNDS`] independent
    /// witnesses.
    ///
    /// A composite passes a single witness with probability at most 1/4, so
    /// the overall error bound is `4^-MILLER_RABIN_ROUNDS`.
    pub(crate) fn is_probably_prime(
        rng: &mut (impl CryptoRng + RngCore),
        n: &BigNumber,
    ) -> Result<bool> {
        let one = BigNumber::one();
        let two = BigNumber::from(2);
        if n <= &one {
            return Ok(false);
        }
        if n == &two {
            return Ok(true);
        }
        if !bit(n, 0) {
            return Ok(false);
        }
        // n - 1 = 2^s * d with d odd
        let n_minus_one = n - 1u32;
        let mut d = n_minus_one.clone();
        let mut s = 0usize;
        while !bit(&d, 0) {
            d = d >> 1;
            s += 1;
        }
        'witness: for _ in 0..MILLER_RABIN_ROUNDS {
            // a in [1, n-1]
            let a = random_positive_bn(rng, &n_minus_one)? + 1u32;
            let mut t = modpow(&a, &d, n);
            if t == one {
                continue;
            }
            for _ in 0..s {
                if t == n_minus_one {
                    continue 'witness;
                }
                t = t.modpow(&two, n);
            }
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_test_rng;

    #[test]
    fn miller_rabin_matches_the_known_oracle_set() -> Result<()> {
        let mut rng = get_test_rng();
        let oracle = [
            (252_601u64, false),
            (3_057_601, false),
            (104_717, true),
            (577_757, true),
            (101_089, true),
            (280_001, true),
            (95_721_889, false),
        ];
        for (candidate, expected) in oracle {
            let result = prime_gen::is_probably_prime(&mut rng, &BigNumber::from(candidate))?;
            assert_eq!(result, expected, "wrong verdict for {candidate}");
        }
        Ok(())
    }

    #[test]
    fn miller_rabin_is_deterministic_under_a_fixed_seed() -> Result<()> {
        use rand::{rngs::StdRng, SeedableRng};
        let candidate = BigNumber::from(95_721_889u64);
        let first = prime_gen::is_probably_prime(&mut StdRng::seed_from_u64(7), &candidate)?;
        let second = prime_gen::is_probably_prime(&mut StdRng::seed_from_u64(7), &candidate)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn miller_rabin_handles_the_small_cases() -> Result<()> {
        let mut rng = get_test_rng();
        assert!(!prime_gen::is_probably_prime(&mut rng, &BigNumber::zero())?);
        assert!(!prime_gen::is_probably_prime(&mut rng, &BigNumber::one())?);
        assert!(prime_gen::is_probably_prime(&mut rng, &BigNumber::from(2))?);
        assert!(prime_gen::is_probably_prime(&mut rng, &BigNumber::from(3))?);
        assert!(!prime_gen::is_probably_prime(&mut rng, &BigNumber::from(4))?);
        Ok(())
    }

    #[test]
    fn gcd_matches_the_euclid_worked_examples() {
        assert_eq!(
            BigNumber::from(1071).gcd(&BigNumber::from(1029)),
            BigNumber::from(21),
        );
        assert_eq!(
            BigNumber::from(221).gcd(&BigNumber::from(153)),
            BigNumber::from(17),
        );
        assert_eq!(BigNumber::from(144).gcd(&BigNumber::from(89)), BigNumber::one());
    }

    #[test]
    fn generated_primes_have_the_requested_length() -> Result<()> {
        let mut rng = get_test_rng();
        let prime = prime_gen::random_prime(&mut rng, 64)?;
        assert_eq!(prime.bit_length(), 64);
        assert!(prime.is_prime());
        Ok(())
    }

    #[test]
    fn encryption_round_trips() -> Result<()> {
        let mut rng = get_test_rng();
        let (decryption_key, encryption_key) = DecryptionKey::new(&mut rng, 256)?;
        for _ in 0..4 {
            let m = random_positive_bn(&mut rng, encryption_key.n())?;
            let c = encryption_key.encrypt(&mut rng, &m)?;
            assert_eq!(decryption_key.decrypt(&c)?, m);
        }
        Ok(())
    }

    #[test]
    fn encryption_is_randomized() -> Result<()> {
        let mut rng = get_test_rng();
        let (_, encryption_key) = DecryptionKey::new(&mut rng, 256)?;
        let m = BigNumber::from(42);
        let c1 = encryption_key.encrypt(&mut rng, &m)?;
        let c2 = encryption_key.encrypt(&mut rng, &m)?;
        assert_ne!(c1, c2);
        Ok(())
    }

    #[test]
    fn out_of_range_inputs_are_rejected() -> Result<()> {
        let mut rng = get_test_rng();
        let (decryption_key, encryption_key) = DecryptionKey::new(&mut rng, 256)?;

        let negative = BigNumber::zero() - BigNumber::one();
        assert!(encryption_key.encrypt(&mut rng, &negative).is_err());
        assert!(encryption_key
            .encrypt(&mut rng, encryption_key.n())
            .is_err());

        assert!(decryption_key.decrypt(&Ciphertext(BigNumber::zero())).is_err());
        let modulus_squared = encryption_key.n() * encryption_key.n();
        assert!(decryption_key.decrypt(&Ciphertext(modulus_squared)).is_err());
        Ok(())
    }

    /// Ciphertext products add plaintexts, ciphertext powers scale them.
    #[test]
    fn homomorphic_operations_act_on_the_plaintexts() -> Result<()> {
        let mut rng = get_test_rng();
        let (decryption_key, encryption_key) = DecryptionKey::new(&mut rng, 1024)?;

        let million = BigNumber::from(1_000_000);
        let m1 = random_positive_bn(&mut rng, &million)?;
        let m2 = random_positive_bn(&mut rng, &million)?;

        let c1 = encryption_key.encrypt(&mut rng, &m1)?;
        let c2 = encryption_key.encrypt(&mut rng, &m2)?;
        assert_eq!(decryption_key.decrypt(&c1)?, m1);
        assert_eq!(decryption_key.decrypt(&c2)?, m2);

        let sum = encryption_key.add(&c1, &c2);
        assert_eq!(decryption_key.decrypt(&sum)?, &m1 + &m2);

        let product = encryption_key.mul(&c1, &m2);
        assert_eq!(decryption_key.decrypt(&product)?, &m1 * &m2);
        Ok(())
    }

    #[test]
    fn keys_round_trip_through_serialization() -> Result<()> {
        let mut rng = get_test_rng();
        let (decryption_key, encryption_key) = DecryptionKey::new(&mut rng, 256)?;

        let encoded = bincode::serialize(&encryption_key).unwrap();
        let decoded: EncryptionKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, encryption_key);

        let encoded = bincode::serialize(&decryption_key).unwrap();
        let decoded: DecryptionKey = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, decryption_key);
        Ok(())
    }
}
