// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Deterministic ECDSA over secp256k1.
//!
//! Nonces are derived from the message and the private scalar per RFC 6979
//! with HMAC-SHA-256, so signing is a pure function of its inputs.
//! Signatures are low-`s` normalized and can be serialized to DER.

use crate::curve::{self, CurvePoint, CURVE_ORDER};
use crate::errors::{InternalError::SigningFailure, Result};
use crate::utils::{modpow, to_padded_bytes};
use hmac::Mac;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use unknown_order::BigNumber;

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

/// An ECDSA signature over secp256k1, in scalar form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    r: BigNumber,
    s: BigNumber,
}

impl Signature {
    /// Assemble a signature from its two scalars, normalizing `s` into the
    /// lower half of the group order.
    ///
    /// Fails with [`SigningFailure`] if either scalar is zero or not below
    /// the group order.
    pub fn from_scalars(r: BigNumber, s: BigNumber) -> Result<Self> {
        let n = curve::order();
        let one = BigNumber::one();
        if r < one || r >= n || s < one || s >= n {
            return Err(SigningFailure);
        }
        Ok(Signature { r, s }.normalized())
    }

    /// The `r` scalar.
    pub fn r(&self) -> &BigNumber {
        &self.r
    }

    /// The `s` scalar.
    pub fn s(&self) -> &BigNumber {
        &self.s
    }

    /// Replace `s` with `n - s` when it falls in the upper half of the
    /// group order.
    fn normalized(mut self) -> Self {
        let n = &*CURVE_ORDER;
        let flipped = (n - &self.s) % n;
        if flipped < self.s {
            self.s = flipped;
        }
        self
    }

    /// Serialize as a DER `SEQUENCE` of two `INTEGER`s.
    ///
    /// Each integer is minimal-length two's-complement big-endian: a zero
    /// byte is prepended when the high bit of the unsigned encoding is set.
    pub fn to_der(&self) -> Vec<u8> {
        fn integer_bytes(value: &BigNumber) -> Vec<u8> {
            let mut bytes = value.to_bytes();
            if bytes.is_empty() || bytes[0] & 0x80 != 0 {
                bytes.insert(0, 0x00);
            }
            bytes
        }
        let r = integer_bytes(&self.r);
        let s = integer_bytes(&self.s);
        let mut der = Vec::with_capacity(6 + r.len() + s.len());
        der.push(0x30);
        der.push((4 + r.len() + s.len()) as u8);
        der.push(0x02);
        der.push(r.len() as u8);
        der.extend_from_slice(&r);
        der.push(0x02);
        der.push(s.len() as u8);
        der.extend_from_slice(&s);
        der
    }
}

/// The double SHA-256 hash of a message.
pub fn message_hash(message: &[u8]) -> Vec<u8> {
    let first = Sha256::digest(message);
    Sha256::digest(first).to_vec()
}

/// Interpret bytes as a big-endian integer, right-shifted so that at most
/// `bitlen(n)` bits remain (RFC 6979 §2.3.2).
pub(crate) fn bits2int(bytes: &[u8]) -> BigNumber {
    let qlen = CURVE_ORDER.bit_length();
    let b = BigNumber::from_slice(bytes);
    let excess = b.bit_length().saturating_sub(qlen);
    if excess > 0 {
        b >> excess
    } else {
        b
    }
}

/// Big-endian encoding of `x`, padded to the byte length of the group order
/// (RFC 6979 §2.3.3).
fn int2octets(x: &BigNumber) -> Vec<u8> {
    to_padded_bytes(x, CURVE_ORDER.to_bytes().len())
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(key).expect("hmac can handle keys of any size");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

/// Derive the deterministic nonce for `message` under the private scalar
/// `x`, per RFC 6979 §3.2 with HMAC-SHA-256.
pub(crate) fn nonce_rfc6979(message: &[u8], x: &BigNumber) -> BigNumber {
    let h1 = message_hash(message);
    let key_octets = int2octets(x);
    let mut v = vec![0x01u8; h1.len()];
    let mut k = vec![0x00u8; h1.len()];
    k = hmac_sha256(&k, &[&v, &[0x00], &key_octets, &h1]);
    v = hmac_sha256(&k, &[&v]);
    k = hmac_sha256(&k, &[&v, &[0x01], &key_octets, &h1]);
    v = hmac_sha256(&k, &[&v]);

    let qlen = CURVE_ORDER.bit_length();
    loop {
        let mut t: Vec<u8> = Vec::new();
        while t.len() * 8 < qlen {
            v = hmac_sha256(&k, &[&v]);
            t.extend_from_slice(&v);
        }
        let candidate = bits2int(&t);
        if candidate > BigNumber::zero() && candidate < *CURVE_ORDER {
            return candidate;
        }
        k = hmac_sha256(&k, &[&v, &[0x00]]);
        v = hmac_sha256(&k, &[&v]);
    }
}

/// Produce a deterministic, low-`s` signature over `message` with the
/// private scalar `x`.
pub fn sign(message: &[u8], x: &BigNumber) -> Result<Signature> {
    let n = &*CURVE_ORDER;
    let h = bits2int(&message_hash(message)) % n;
    let k = nonce_rfc6979(message, x);
    let nonce_point = CurvePoint::generator().mul(&k);
    let r = match nonce_point.x() {
        Some(x_coordinate) => x_coordinate.clone(),
        None => return Err(SigningFailure),
    };
    if r == BigNumber::zero() {
        return Err(SigningFailure);
    }
    // s = (h + x*r) * k^(n-2) mod n
    let k_inv = modpow(&k, &(n - 2u32), n);
    let s = h.modadd(&x.modmul(&r, n), n).modmul(&k_inv, n);
    if s == BigNumber::zero() {
        return Err(SigningFailure);
    }
    Ok(Signature { r, s }.normalized())
}

/// Check `signature` over `message` under the public point `public_key`.
pub fn verify(public_key: &CurvePoint, message: &[u8], signature: &Signature) -> bool {
    let n = &*CURVE_ORDER;
    let one = BigNumber::one();
    if signature.r < one || signature.r >= *n {
        return false;
    }
    if signature.s < one || signature.s >= *n {
        return false;
    }
    let e = bits2int(&message_hash(message));
    let w = modpow(&signature.s, &(n - 2u32), n);
    let u1 = e.modmul(&w, n);
    let u2 = signature.r.modmul(&w, n);
    let v = CurvePoint::generator()
        .mul(&u1)
        .add(&public_key.mul(&u2));
    match v.x() {
        Some(x_coordinate) => x_coordinate % n == signature.r,
        None => false,
    }
}
