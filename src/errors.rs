// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! A list of error types which are produced during an execution of the
//! signing protocol and its building blocks.
use thiserror::Error;

use crate::paillier;

/// The default Result type used in this crate
pub type Result<T> = std::result::Result<T, InternalError>;

/// Represents an error in the manipulation of internal cryptographic data
#[derive(Clone, Eq, PartialEq, Error, Debug)]
#[allow(missing_docs)]
pub enum InternalError {
    #[error("Point encoding was malformed: `{0}`")]
    InvalidEncoding(String),
    #[error("The random number generator failed to produce bytes")]
    EntropyFailure,
    #[error("Signature derivation produced an out-of-range scalar")]
    SigningFailure,
    #[error("Could not invert a BigNumber")]
    CouldNotInvertBigNumber,
    #[error("Reached the maximum allowed number of retries")]
    RetryFailed,
    #[error("Paillier error: `{0}`")]
    PaillierError(#[from] paillier::PaillierError),
}
