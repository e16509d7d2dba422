// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

///////////////
// Constants //
// ========= //
///////////////

/// Number of Miller-Rabin witnesses checked when testing a prime candidate.
///
/// 64 rounds bound the probability of accepting a composite by `4^-64`,
/// which is below the security level of everything else in the scheme.
pub(crate) const MILLER_RABIN_ROUNDS: usize = 64;

/// Bit length of the Paillier modulus used by the two-party protocol.
///
/// The responder's blinded plaintext `k_B^-1 * m' + rho * n` must stay below
/// the modulus `N`, which requires `N >> n^2` for the 256-bit group order
/// `n`. A 2048-bit `N` satisfies this comfortably.
pub(crate) const PAILLIER_BITS: usize = 2048;
