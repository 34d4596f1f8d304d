// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The commitment scheme collaborator: a KZG-style trusted setup that maps
//! a monomial-basis polynomial of degree `< n` to a single group element.
//!
//! The setup ceremony itself, and anything resembling a verifier-facing
//! key, are out of scope; [`KzgSetup`] here exists only so the prover can
//! be exercised end-to-end in tests.

use crate::error::Error;
use crate::poly::{Monomial, Polynomial};
use ark_ec::PairingEngine;
use ark_poly::univariate::DensePolynomial;
use ark_poly_commit::kzg10::{UniversalParams, KZG10};
use rand_core::RngCore;

/// A committing trusted setup: `commit(p) -> G`, linear over `F`.
pub trait Setup<E>
where
    E: PairingEngine,
{
    /// Commits to a monomial-basis polynomial of degree `< n`.
    fn commit(&self, p: &Polynomial<E::Fr, Monomial>) -> Result<E::G1Affine, Error>;
}

/// A KZG setup over `ark_poly_commit::kzg10`. Produced by [`KzgSetup::setup`]
/// for tests and demos only — a real trusted setup's toxic waste must never
/// exist in a single process the way `KZG10::setup`'s does.
pub struct KzgSetup<E>
where
    E: PairingEngine,
{
    params: UniversalParams<E>,
    max_degree: usize,
}

impl<E> KzgSetup<E>
where
    E: PairingEngine,
{
    /// Insecure, in-process trusted setup for degree up to `max_degree`.
    /// Not to be used outside of tests: the toxic waste used to derive the
    /// powers of tau is never destroyed.
    pub fn setup<R: RngCore>(max_degree: usize, rng: &mut R) -> Result<Self, Error> {
        let params =
            KZG10::<E, DensePolynomial<E::Fr>>::setup(max_degree, false, rng)?;
        Ok(Self { params, max_degree })
    }

    /// The maximum degree this setup supports.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }
}

impl<E> Setup<E> for KzgSetup<E>
where
    E: PairingEngine,
{
    fn commit(&self, p: &Polynomial<E::Fr, Monomial>) -> Result<E::G1Affine, Error> {
        let degree = p.degree().map(|d| d + 1).unwrap_or(0);
        if degree > self.max_degree {
            return Err(Error::DegreeTooLargeForCommit {
                degree,
                max_degree: self.max_degree,
            });
        }
        let (powers, _vk) =
            KZG10::<E, DensePolynomial<E::Fr>>::trim(&self.params, self.max_degree)?;
        let dense = DensePolynomial {
            coeffs: p.values().to_vec(),
        };
        let (commitment, _randomness) =
            KZG10::<E, DensePolynomial<E::Fr>>::commit(&powers, &dense, None, None)?;
        Ok(commitment.0)
    }
}
