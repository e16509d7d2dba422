// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Two-party ECDSA signing over secp256k1.
//!
//! The building blocks are implemented from primitives on top of an
//! arbitrary-precision integer type: affine curve arithmetic with point
//! compression, deterministic (RFC 6979) ECDSA with DER output, and the
//! Paillier additively homomorphic cryptosystem with its own Miller-Rabin
//! key generation. The [`protocol`] module combines them so that two
//! parties holding multiplicative shares of a key produce an ordinary
//! ECDSA signature without either party ever assembling the private key.
//!
//! Randomness is injected everywhere as `&mut (impl CryptoRng + RngCore)`.
//! The crate spawns no threads, holds no mutable global state and performs
//! no I/O; every value is immutable once constructed.
//!
//! This is a reference implementation: scalar multiplication and modular
//! inversion are not constant-time.

pub mod curve;
pub mod ecdsa;
mod errors;
pub mod paillier;
mod parameters;
pub mod protocol;
mod utils;

pub use errors::{InternalError, Result};
