// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Affine arithmetic on the secp256k1 curve.
//!
//! Points are held in affine coordinates over the field of integers modulo
//! the curve prime, with the point at infinity as a distinguished variant.
//! Slopes are inverted with Fermat's little theorem (`a^(p-2) mod p`), which
//! keeps the group law self-contained at the cost of speed; nothing in this
//! module is constant-time.

use crate::errors::{InternalError::InvalidEncoding, Result};
use crate::utils::{bit, modpow, to_padded_bytes};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use unknown_order::BigNumber;

lazy_static! {
    /// The secp256k1 field prime.
    pub(crate) static ref FIELD_PRIME: BigNumber = BigNumber::from_slice(
        hex::decode("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F")
            .unwrap(),
    );
    /// The order of the subgroup generated by the base point.
    pub(crate) static ref CURVE_ORDER: BigNumber = BigNumber::from_slice(
        hex::decode("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
            .unwrap(),
    );
    /// The standard base point, decoded from its compressed form.
    static ref GENERATOR: CurvePoint = CurvePoint::from_hex(
        "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    )
    .unwrap();
}

/// The order of the subgroup generated by [`CurvePoint::generator`].
pub fn order() -> BigNumber {
    CURVE_ORDER.clone()
}

/// A point on the secp256k1 curve, or the point at infinity.
///
/// Affine coordinates are always stored reduced modulo the field prime, so
/// the derived equality is coordinate-wise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurvePoint {
    /// The group identity.
    Identity,
    /// A point with affine coordinates `(x, y)`.
    Affine {
        /// The affine x-coordinate, in `[0, p)`.
        x: BigNumber,
        /// The affine y-coordinate, in `[0, p)`.
        y: BigNumber,
    },
}

impl CurvePoint {
    /// The standard base point.
    pub fn generator() -> Self {
        GENERATOR.clone()
    }

    /// Construct an affine point, reducing both coordinates into the field.
    ///
    /// The curve equation is not checked here; decoding of caller-supplied
    /// uncompressed bytes takes the coordinates as given.
    pub(crate) fn affine(x: BigNumber, y: BigNumber) -> Self {
        let p = &*FIELD_PRIME;
        CurvePoint::Affine {
            x: x % p,
            y: y % p,
        }
    }

    /// Whether this is the point at infinity.
    pub fn is_identity(&self) -> bool {
        matches!(self, CurvePoint::Identity)
    }

    /// The affine x-coordinate, or `None` for the identity.
    pub fn x(&self) -> Option<&BigNumber> {
        match self {
            CurvePoint::Identity => None,
            CurvePoint::Affine { x, .. } => Some(x),
        }
    }

    /// The affine y-coordinate, or `None` for the identity.
    pub fn y(&self) -> Option<&BigNumber> {
        match self {
            CurvePoint::Identity => None,
            CurvePoint::Affine { y, .. } => Some(y),
        }
    }

    /// The 33-byte compressed encoding `{02|03} || x`, or `None` for the
    /// identity, which has no compressed form.
    pub fn to_compressed(&self) -> Option<Vec<u8>> {
        let (x, y) = match self {
            CurvePoint::Identity => return None,
            CurvePoint::Affine { x, y } => (x, y),
        };
        let field_len = FIELD_PRIME.to_bytes().len();
        let mut bytes = Vec::with_capacity(1 + field_len);
        bytes.push(if bit(y, 0) { 0x03 } else { 0x02 });
        bytes.extend_from_slice(&to_padded_bytes(x, field_len));
        Some(bytes)
    }

    /// Decode a point from its compressed (33-byte) or uncompressed
    /// (65-byte) encoding.
    ///
    /// Uncompressed coordinates are taken as given, without checking the
    /// curve equation. Compressed input recovers `y` as
    /// `(x^3 + 7)^((p+1)/4) mod p`, which is a square root because
    /// `p = 3 (mod 4)`, then negates it if its parity disagrees with the
    /// prefix byte.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let p = &*FIELD_PRIME;
        let field_len = p.to_bytes().len();
        if bytes.len() == 1 + 2 * field_len {
            if bytes[0] != 0x04 {
                return Err(InvalidEncoding(hex::encode(bytes)));
            }
            let x = BigNumber::from_slice(&bytes[1..1 + field_len]);
            let y = BigNumber::from_slice(&bytes[1 + field_len..]);
            return Ok(CurvePoint::affine(x, y));
        }
        if bytes.len() != 1 + field_len {
            return Err(InvalidEncoding(hex::encode(bytes)));
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(InvalidEncoding(hex::encode(bytes)));
        }
        let x = BigNumber::from_slice(&bytes[1..]) % p;
        let x_cubed = modpow(&x, &BigNumber::from(3), p);
        let mut y = modpow(&(x_cubed + 7), &((p + 1) / 4), p);
        let prefix_wants_odd = bytes[0] == 0x03;
        if bit(&y, 0) != prefix_wants_odd {
            y = p - y;
        }
        Ok(CurvePoint::Affine { x, y })
    }

    /// Decode a point from the hex string of one of its byte encodings.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded).map_err(|_| InvalidEncoding(encoded.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// The group law.
    pub fn add(&self, other: &CurvePoint) -> CurvePoint {
        let p = &*FIELD_PRIME;
        let (x_p, y_p) = match self {
            CurvePoint::Identity => return other.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x_q, y_q) = match other {
            CurvePoint::Identity => return self.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };

        // Inverse points sum to the identity.
        if x_p == x_q && *y_p == (p - y_q) % p {
            return CurvePoint::Identity;
        }

        let s = if x_p == x_q && y_p == y_q {
            // tangent slope: (3 * x^2) * (2 * y)^(p - 2)
            let numerator = BigNumber::from(3).modmul(&x_p.modmul(x_p, p), p);
            let denominator = modpow(&BigNumber::from(2).modmul(y_p, p), &(p - 2u32), p);
            numerator.modmul(&denominator, p)
        } else {
            // chord slope: (y_p - y_q) * (x_p - x_q)^(p - 2)
            let numerator = y_p.modsub(y_q, p);
            let denominator = modpow(&x_p.modsub(x_q, p), &(p - 2u32), p);
            numerator.modmul(&denominator, p)
        };

        let x_r = s.modmul(&s, p).modsub(x_p, p).modsub(x_q, p);
        let y_r = s.modmul(&x_p.modsub(&x_r, p), p).modsub(y_p, p);
        CurvePoint::Affine { x: x_r, y: y_r }
    }

    /// Scalar multiplication by double-and-add over the bits of `k`, least
    /// significant first.
    ///
    /// The branch on each bit leaks the scalar through timing; this is a
    /// reference implementation, not a hardened one.
    pub fn mul(&self, k: &BigNumber) -> CurvePoint {
        let mut result = CurvePoint::Identity;
        let mut addend = self.clone();
        for index in 0..k.bit_length() {
            if bit(k, index) {
                result = result.add(&addend);
            }
            addend = addend.add(&addend);
        }
        result
    }
}
