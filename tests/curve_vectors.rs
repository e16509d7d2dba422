// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Checks scalar multiplication against a published `k * G` vector table.

use serde::Deserialize;
use two_party_ecdsa::curve::CurvePoint;
use unknown_order::BigNumber;

#[derive(Deserialize)]
struct VectorFile {
    title: String,
    curve: String,
    url: String,
    vectors: Vec<Vector>,
}

/// One expected multiple: `k` in decimal, the coordinates in hex.
#[derive(Deserialize)]
struct Vector {
    k: String,
    x: String,
    y: String,
}

fn coordinate(hex_digits: &str) -> BigNumber {
    BigNumber::from_slice(hex::decode(hex_digits).unwrap())
}

#[test]
fn generator_multiples_match_the_published_vectors() {
    let file: VectorFile = serde_json::from_str(include_str!("data/secp256k1.json")).unwrap();
    assert_eq!(file.curve, "secp256k1");
    assert!(!file.title.is_empty());
    assert!(!file.url.is_empty());

    let g = CurvePoint::generator();
    for vector in &file.vectors {
        let k = BigNumber::from(vector.k.parse::<u64>().unwrap());
        let point = g.mul(&k);
        assert_eq!(
            point.x().unwrap(),
            &coordinate(&vector.x),
            "x mismatch for k = {}",
            vector.k,
        );
        assert_eq!(
            point.y().unwrap(),
            &coordinate(&vector.y),
            "y mismatch for k = {}",
            vector.k,
        );
    }
}
