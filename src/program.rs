// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The circuit front-end interface the prover consumes: the preprocessed
//! selectors and permutation polynomials, the wiring, and the witness.
//!
//! This module defines the trait boundary only — producing a [`Program`]
//! (circuit compilation) is out of scope.

use crate::error::Error;
use crate::poly::{Lagrange, Polynomial};
use ark_ff::PrimeField;
use hashbrown::HashMap;

/// Name of a circuit variable.
pub type VariableName = String;

/// A witness maps variable names to field values. There is no entry for
/// the empty wire: its value is always zero, represented by `Wire`'s
/// `None` fields rather than a sentinel key in this map.
pub type Witness<F> = HashMap<VariableName, F>;

/// One row's three wires. `None` is the empty wire (contributes `0`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wire {
    /// Left wire.
    pub l: Option<VariableName>,
    /// Right wire.
    pub r: Option<VariableName>,
    /// Output wire.
    pub o: Option<VariableName>,
}

impl Wire {
    /// Builds a wire row from three optional variable names.
    pub fn new(
        l: Option<VariableName>,
        r: Option<VariableName>,
        o: Option<VariableName>,
    ) -> Self {
        Self { l, r, o }
    }
}

/// Looks up a wire's value in the witness: the empty wire is `0`, a named
/// wire missing from the witness is an error.
pub fn wire_value<F: PrimeField>(
    witness: &Witness<F>,
    var: &Option<VariableName>,
) -> Result<F, Error> {
    match var {
        None => Ok(F::zero()),
        Some(name) => witness
            .get(name)
            .copied()
            .ok_or_else(|| Error::WitnessValueMissing {
                variable: name.clone(),
            }),
    }
}

/// Selectors `QL, QR, QM, QO, QC` and permutation polynomials `S1, S2, S3`,
/// all `LAGRANGE` of length `n`, plus the group order they were built over.
pub struct CommonPreprocessedInput<F>
where
    F: PrimeField,
{
    n: usize,
    /// Left-wire selector.
    pub q_l: Polynomial<F, Lagrange>,
    /// Right-wire selector.
    pub q_r: Polynomial<F, Lagrange>,
    /// Multiplication selector.
    pub q_m: Polynomial<F, Lagrange>,
    /// Output-wire selector.
    pub q_o: Polynomial<F, Lagrange>,
    /// Constant selector.
    pub q_c: Polynomial<F, Lagrange>,
    /// Left-wire permutation polynomial.
    pub s1: Polynomial<F, Lagrange>,
    /// Right-wire permutation polynomial.
    pub s2: Polynomial<F, Lagrange>,
    /// Output-wire permutation polynomial.
    pub s3: Polynomial<F, Lagrange>,
}

impl<F> CommonPreprocessedInput<F>
where
    F: PrimeField,
{
    /// Builds a `CommonPreprocessedInput`, checking that every polynomial
    /// has length exactly `n`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: usize,
        q_l: Polynomial<F, Lagrange>,
        q_r: Polynomial<F, Lagrange>,
        q_m: Polynomial<F, Lagrange>,
        q_o: Polynomial<F, Lagrange>,
        q_c: Polynomial<F, Lagrange>,
        s1: Polynomial<F, Lagrange>,
        s2: Polynomial<F, Lagrange>,
        s3: Polynomial<F, Lagrange>,
    ) -> Result<Self, Error> {
        for p in [&q_l, &q_r, &q_m, &q_o, &q_c, &s1, &s2, &s3] {
            if p.len() != n {
                return Err(Error::MismatchedPolyLen);
            }
        }
        Ok(Self {
            n,
            q_l,
            q_r,
            q_m,
            q_o,
            q_c,
            s1,
            s2,
            s3,
        })
    }

    /// The domain size `n` these polynomials were built over.
    pub fn n(&self) -> usize {
        self.n
    }
}

/// The preprocessed, circuit-specific input the prover consumes: wiring,
/// the public-input variable list, and the common preprocessed input.
pub trait Program<F>
where
    F: PrimeField,
{
    /// The domain size `n` (a power of two).
    fn group_order(&self) -> usize;

    /// Ordered `(L, R, O)` wire triples, one per row, length `<= n`
    /// (shorter circuits are zero-padded by the prover).
    fn wires(&self) -> &[Wire];

    /// Ordered list of public-input variable names.
    fn public_variables(&self) -> &[VariableName];

    /// Selectors and permutation polynomials.
    fn common_preprocessed_input(&self) -> &CommonPreprocessedInput<F>;
}
