// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The two-party signing protocol.
//!
//! Both parties hold multiplicative shares of the private key and of the
//! one-time nonce: the joint public key is `x_A * x_B * G` and the joint
//! nonce point is `k_A * k_B * G`, but neither scalar product ever exists in
//! one place. The initiator encrypts its key share under a Paillier key it
//! alone can open; the responder folds its own shares and the message into
//! that ciphertext homomorphically, blinded by a multiple of the group
//! order; the initiator decrypts and finishes a standard ECDSA signature.
//!
//! The exchange is sequential: setup points are swapped, then the encrypted
//! key share travels to the responder, then one ciphertext travels back.
//! Transport is the caller's problem.

use crate::curve::{CurvePoint, CURVE_ORDER};
use crate::ecdsa::{bits2int, message_hash, Signature};
use crate::errors::{
    InternalError::{CouldNotInvertBigNumber, SigningFailure},
    Result,
};
use crate::paillier::{Ciphertext, DecryptionKey, EncryptionKey};
use crate::parameters::PAILLIER_BITS;
use crate::utils::random_positive_bn;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use unknown_order::BigNumber;

/// One party's multiplicative share of a scalar, together with the public
/// point it contributes. Used both for the long-lived key share `x_i` and
/// for the per-signature nonce share `k_i`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScalarShare {
    secret: BigNumber,
    public: CurvePoint,
}

impl ScalarShare {
    /// Sample a fresh share and compute its public point.
    pub fn new(rng: &mut (impl CryptoRng + RngCore)) -> Result<Self> {
        let secret = random_positive_bn(rng, &CURVE_ORDER)?;
        let public = CurvePoint::generator().mul(&secret);
        Ok(Self { secret, public })
    }

    /// The public point `secret * G` this share contributes.
    pub fn public(&self) -> &CurvePoint {
        &self.public
    }

    /// The joint point `secret * other`, where `other` is the counterparty's
    /// public contribution. Both parties arrive at the same point.
    pub fn shared_point(&self, other: &CurvePoint) -> CurvePoint {
        other.mul(&self.secret)
    }
}

/// The initiator's opening message: its key share encrypted under a fresh
/// Paillier key, along with that key's public half.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedKeyShare {
    /// The Paillier public key the responder will compute under.
    pub pk: EncryptionKey,
    /// `Enc(x_A)`.
    pub ckey: Ciphertext,
}

/// The x-coordinate of the joint nonce point, reduced into the scalar group.
///
/// Fails with [`SigningFailure`] if the joint point is the identity, which
/// only happens when a nonce share is a multiple of the group order.
pub fn nonce_x_coordinate(
    own_nonce: &ScalarShare,
    other_nonce_public: &CurvePoint,
) -> Result<BigNumber> {
    let joint = own_nonce.shared_point(other_nonce_public);
    match joint.x() {
        Some(x) => Ok(x % &*CURVE_ORDER),
        None => Err(SigningFailure),
    }
}

/// The initiator's step: generate a Paillier keypair and encrypt the key
/// share under it.
///
/// The modulus is [`PAILLIER_BITS`] long so that the responder's blinded
/// plaintext stays far below it.
pub fn encrypt_key_share(
    rng: &mut (impl CryptoRng + RngCore),
    key_share: &ScalarShare,
) -> Result<(DecryptionKey, EncryptedKeyShare)> {
    let (decryption_key, pk) = DecryptionKey::new(rng, PAILLIER_BITS)?;
    let ckey = pk.encrypt(rng, &key_share.secret)?;
    Ok((decryption_key, EncryptedKeyShare { pk, ckey }))
}

/// The responder's step: fold the message, its own shares and a fresh
/// blinding scalar into the encrypted key share.
///
/// Computes `c3 = Enc(k_B^-1 * (m' + r * x_A * x_B) + rho * n)` without ever
/// seeing `x_A`. The blinding term `rho * n` vanishes modulo `n` after the
/// initiator decrypts; that only works while the whole plaintext stays below
/// the Paillier modulus, hence the [`PAILLIER_BITS`] requirement.
pub fn respond(
    rng: &mut (impl CryptoRng + RngCore),
    message: &[u8],
    encrypted_key: &EncryptedKeyShare,
    key_share: &ScalarShare,
    nonce_share: &ScalarShare,
    r: &BigNumber,
) -> Result<Ciphertext> {
    let n = &*CURVE_ORDER;
    let m_prime = bits2int(&message_hash(message)) % n;
    let rho = random_positive_bn(rng, n)?;
    let nonce_inv = nonce_share
        .secret
        .invert(n)
        .ok_or(CouldNotInvertBigNumber)?;

    // c1 = Enc(k_B^-1 * m' + rho * n)
    let blinded = nonce_inv.modmul(&m_prime, n) + &rho * n;
    let c1 = encrypted_key.pk.encrypt(rng, &blinded)?;

    // c2 = Enc(x_A)^(x_B * r * k_B^-1)
    let exponent = key_share.secret.modmul(r, n).modmul(&nonce_inv, n);
    let c2 = encrypted_key.pk.mul(&encrypted_key.ckey, &exponent);

    // c3 = c1 * c2
    Ok(encrypted_key.pk.add(&c1, &c2))
}

/// The initiator's final step: decrypt the responder's ciphertext and
/// finish the signature.
pub fn complete(
    decryption_key: &DecryptionKey,
    nonce_share: &ScalarShare,
    response: &Ciphertext,
    r: &BigNumber,
) -> Result<Signature> {
    let n = &*CURVE_ORDER;
    // s' = k_B^-1 * (m' + r * x_A * x_B) mod n
    let s_prime = decryption_key.decrypt(response)? % n;
    let nonce_inv = nonce_share
        .secret
        .invert(n)
        .ok_or(CouldNotInvertBigNumber)?;
    let s = s_prime.modmul(&nonce_inv, n);
    Signature::from_scalars(r.clone(), s)
}
