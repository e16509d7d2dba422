// Copyright (c) 2023 Bolt Labs, Inc.
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

#[macro_use]
extern crate criterion;

use criterion::Criterion;

use two_party_ecdsa::curve::{self, CurvePoint};
use unknown_order::BigNumber;

fn modpow(c: &mut Criterion) {
    let num_bits_in_bn: usize = 2048;

    let mut a = BigNumber::random(&(BigNumber::one() << (num_bits_in_bn + 1)));
    let e = BigNumber::random(&(BigNumber::one() << (num_bits_in_bn + 1)));
    let n = BigNumber::random(&(BigNumber::one() << (num_bits_in_bn + 1)));

    c.bench_function(&format!("modpow ({} bits)", num_bits_in_bn), move |b| {
        b.iter(|| {
            a = a.modpow(&e, &n);
        })
    });
}

fn scalar_mul(c: &mut Criterion) {
    let k = BigNumber::random(&curve::order());
    let g = CurvePoint::generator();

    c.bench_function("scalar multiplication", move |b| {
        b.iter(|| g.mul(&k))
    });
}

criterion_group!(
    arithmetic_benches,
    modpow,
    scalar_mul,
);
criterion_main!(arithmetic_benches);
