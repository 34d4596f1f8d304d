// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A small polynomial engine carrying its basis (monomial coefficients,
//! Lagrange evaluations over the size-`n` domain, or Lagrange evaluations
//! over a `4n` coset) as a phantom type parameter, so that combining
//! polynomials of different bases is rejected at compile time rather than
//! with a runtime assertion.

use crate::error::Error;
use ark_ff::{fields::batch_inversion, FftField, FftParameters, Field, PrimeField};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use core::marker::PhantomData;
use core::ops::{Add, Mul, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Monomial {}
    impl Sealed for super::Lagrange {}
    impl Sealed for super::CosetLagrange4 {}
}

/// Marker for the `Σ c_i X^i` coefficient basis.
#[derive(Clone, Copy, Debug)]
pub struct Monomial;

/// Marker for evaluations at `{ω^0, …, ω^{n-1}}`.
#[derive(Clone, Copy, Debug)]
pub struct Lagrange;

/// Marker for evaluations at `{κ·μ^0, …, κ·μ^{4n-1}}`.
#[derive(Clone, Copy, Debug)]
pub struct CosetLagrange4;

/// Sealed trait identifying a basis marker type.
pub trait Basis: sealed::Sealed + Clone {}
impl Basis for Monomial {}
impl Basis for Lagrange {}
impl Basis for CosetLagrange4 {}

/// A polynomial tagged with its basis `B`. Arithmetic between two
/// `Polynomial<F, B>`s of the same `B` is always basis-valid by
/// construction; only their lengths are checked at runtime.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = "F: Clone"), Debug(bound = "F: core::fmt::Debug"))]
pub struct Polynomial<F, B>
where
    F: Field,
    B: Basis,
{
    values: Vec<F>,
    _basis: PhantomData<B>,
}

impl<F, B> Polynomial<F, B>
where
    F: Field,
    B: Basis,
{
    /// Wraps a raw coefficient/evaluation vector under basis `B`.
    pub fn from_vec(values: Vec<F>) -> Self {
        Self {
            values,
            _basis: PhantomData,
        }
    }

    /// The underlying coefficient/evaluation vector.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Number of coefficients/evaluations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether this polynomial carries no coefficients/evaluations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check_len(&self, other: &Self) -> Result<(), Error> {
        if self.values.len() == other.values.len() {
            Ok(())
        } else {
            Err(Error::MismatchedPolyLen)
        }
    }

    /// Pointwise addition.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        self.check_len(other)?;
        Ok(Self::from_vec(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| *a + *b)
                .collect(),
        ))
    }

    /// Pointwise subtraction.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        self.check_len(other)?;
        Ok(Self::from_vec(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| *a - *b)
                .collect(),
        ))
    }

    /// Pointwise (Hadamard) multiplication.
    pub fn mul(&self, other: &Self) -> Result<Self, Error> {
        self.check_len(other)?;
        Ok(Self::from_vec(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| *a * *b)
                .collect(),
        ))
    }

    /// Scale every entry by `s`.
    pub fn scale(&self, s: F) -> Self {
        Self::from_vec(self.values.iter().map(|a| *a * s).collect())
    }

    /// Add a scalar to every entry (useful for `Z - 1` style terms).
    pub fn add_scalar(&self, s: F) -> Self {
        Self::from_vec(self.values.iter().map(|a| *a + s).collect())
    }
}

impl<F, B> Add for &Polynomial<F, B>
where
    F: Field,
    B: Basis,
{
    type Output = Polynomial<F, B>;

    fn add(self, rhs: Self) -> Self::Output {
        Polynomial::add(self, rhs).expect("mismatched polynomial lengths")
    }
}

impl<F, B> Sub for &Polynomial<F, B>
where
    F: Field,
    B: Basis,
{
    type Output = Polynomial<F, B>;

    fn sub(self, rhs: Self) -> Self::Output {
        Polynomial::sub(self, rhs).expect("mismatched polynomial lengths")
    }
}

impl<F, B> Mul for &Polynomial<F, B>
where
    F: Field,
    B: Basis,
{
    type Output = Polynomial<F, B>;

    fn mul(self, rhs: Self) -> Self::Output {
        Polynomial::mul(self, rhs).expect("mismatched polynomial lengths")
    }
}

impl<F> Polynomial<F, Monomial>
where
    F: PrimeField,
{
    /// Evaluates the monomial polynomial at `x` via Horner's method.
    pub fn evaluate(&self, x: F) -> F {
        self.values
            .iter()
            .rev()
            .fold(F::zero(), |acc, c| acc * x + *c)
    }

    /// Highest index carrying a nonzero coefficient, or `None` for the zero
    /// polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.values.iter().rposition(|c| !c.is_zero())
    }
}

impl<F> Polynomial<F, Lagrange>
where
    F: PrimeField,
{
    /// Evaluates the length-`n` Lagrange interpolant at an arbitrary `x`,
    /// handling the case where `x` itself is a domain element by returning
    /// the matching value directly rather than dividing by a zero
    /// denominator.
    pub fn barycentric_eval(&self, domain: &Domain<F>, x: F) -> F {
        let n = self.values.len();
        let group_gen_inv = domain.domain.group_gen_inv();

        let mut denom = Vec::with_capacity(n);
        let mut gi = F::one();
        for _ in 0..n {
            denom.push(gi * x - F::one());
            gi *= group_gen_inv;
        }

        if let Some(idx) = denom.iter().position(|d| d.is_zero()) {
            return self.values[idx];
        }

        batch_inversion(&mut denom);
        let vanishing = domain.domain.evaluate_vanishing_polynomial(x) * domain.domain.size_inv();
        let sum: F = (0..n).map(|i| denom[i] * self.values[i]).sum();
        sum * vanishing
    }
}

impl<F> Polynomial<F, CosetLagrange4>
where
    F: PrimeField,
{
    /// Rotates the evaluation vector left by `k` positions. Used with `k=4`
    /// to obtain `Z(ωX)`'s coset evaluations from `Z(X)`'s.
    pub fn shift(&self, k: usize) -> Self {
        let len = self.values.len();
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(self.values[(i + k) % len]);
        }
        Self::from_vec(out)
    }

    /// Pointwise division, batch-inverting the denominator. Every coset
    /// point is distinct from the domain `H`, but the denominator can
    /// legitimately be zero when dividing by a vanishing-polynomial vector
    /// that was built incorrectly, or (in the opening polynomials) when a
    /// transcript challenge has collided with a coset point.
    pub fn div(&self, other: &Self) -> Result<Self, Error> {
        self.check_len(other)?;
        if other.values.iter().any(|v| v.is_zero()) {
            return Err(Error::DivisionByZero);
        }
        let mut inv = other.values.clone();
        batch_inversion(&mut inv);
        Ok(Self::from_vec(
            self.values
                .iter()
                .zip(inv.iter())
                .map(|(a, b)| *a * *b)
                .collect(),
        ))
    }
}

/// Owns the size-`n` and size-`4n` evaluation domains and implements every
/// basis-conversion operation of the polynomial engine.
pub struct Domain<F>
where
    F: PrimeField,
{
    n: usize,
    domain: GeneralEvaluationDomain<F>,
    domain_4n: GeneralEvaluationDomain<F>,
}

impl<F> Domain<F>
where
    F: PrimeField,
{
    /// Builds the pair of domains for a circuit of size `n` (`n` must be a
    /// power of two dividing the field's two-adicity).
    pub fn new(n: usize) -> Result<Self, Error> {
        let domain = GeneralEvaluationDomain::<F>::new(n).ok_or(Error::InvalidDomainSize {
            log_size_of_group: n.trailing_zeros(),
            adicity: F::FftParams::TWO_ADICITY,
        })?;
        let domain_4n =
            GeneralEvaluationDomain::<F>::new(4 * n).ok_or(Error::InvalidDomainSize {
                log_size_of_group: (4 * n).trailing_zeros(),
                adicity: F::FftParams::TWO_ADICITY,
            })?;
        Ok(Self {
            n: domain.size(),
            domain,
            domain_4n,
        })
    }

    /// The circuit's group order `n`.
    pub fn size(&self) -> usize {
        self.n
    }

    /// `ω`, the generator of the size-`n` domain.
    pub fn group_gen(&self) -> F {
        self.domain.group_gen()
    }

    /// Forward FFT: `MONOMIAL -> LAGRANGE`.
    pub fn fft(&self, p: &Polynomial<F, Monomial>) -> Polynomial<F, Lagrange> {
        let mut coeffs = p.values.clone();
        coeffs.resize(self.n, F::zero());
        Polynomial::from_vec(self.domain.fft(&coeffs))
    }

    /// Inverse FFT: `LAGRANGE -> MONOMIAL`.
    pub fn ifft(&self, p: &Polynomial<F, Lagrange>) -> Polynomial<F, Monomial> {
        Polynomial::from_vec(self.domain.ifft(&p.values))
    }

    /// `MONOMIAL (deg < 4n) -> COSET_LAGRANGE_4`: substitute `X ← κX`, then
    /// a length-`4n` FFT.
    pub fn to_coset_extended(
        &self,
        p: &Polynomial<F, Monomial>,
        kappa: F,
    ) -> Polynomial<F, CosetLagrange4> {
        let mut coeffs = p.values.clone();
        coeffs.resize(4 * self.n, F::zero());
        let mut kpow = F::one();
        for c in coeffs.iter_mut() {
            *c *= kpow;
            kpow *= kappa;
        }
        Polynomial::from_vec(self.domain_4n.fft(&coeffs))
    }

    /// `LAGRANGE -> COSET_LAGRANGE_4`, converting through monomial first.
    pub fn lift(&self, p: &Polynomial<F, Lagrange>, kappa: F) -> Polynomial<F, CosetLagrange4> {
        self.to_coset_extended(&self.ifft(p), kappa)
    }

    /// `COSET_LAGRANGE_4 -> MONOMIAL (deg < 4n)`: inverse FFT, then
    /// substitute `X ← X/κ`.
    pub fn from_coset_extended(
        &self,
        p: &Polynomial<F, CosetLagrange4>,
        kappa: F,
    ) -> Polynomial<F, Monomial> {
        let coeffs = self.domain_4n.ifft(&p.values);
        let kappa_inv = kappa.inverse().expect("fft cofactor must be nonzero");
        let mut kpow = F::one();
        let coeffs: Vec<F> = coeffs
            .into_iter()
            .map(|c| {
                let r = c * kpow;
                kpow *= kappa_inv;
                r
            })
            .collect();
        Polynomial::from_vec(coeffs)
    }

    /// The coset evaluation points `κ·μ^i` for `i < 4n`.
    pub fn coset_points(&self, kappa: F) -> Vec<F> {
        self.domain_4n.elements().map(|mu_i| kappa * mu_i).collect()
    }

    /// The vanishing polynomial `Z_H(X) = X^n - 1`, tabulated pointwise on
    /// the coset (nonzero everywhere there, since `κ ∉ H`).
    pub fn vanishing_on_coset(&self, kappa: F) -> Polynomial<F, CosetLagrange4> {
        let n = self.n as u64;
        let values = self
            .coset_points(kappa)
            .into_iter()
            .map(|x| x.pow([n]) - F::one())
            .collect();
        Polynomial::from_vec(values)
    }

    /// `L0`, the length-`n` Lagrange polynomial `[1, 0, …, 0]`.
    pub fn l0_lagrange(&self) -> Polynomial<F, Lagrange> {
        let mut values = vec![F::zero(); self.n];
        values[0] = F::one();
        Polynomial::from_vec(values)
    }

    /// `L0` lifted to the coset.
    pub fn l0_coset(&self, kappa: F) -> Polynomial<F, CosetLagrange4> {
        self.lift(&self.l0_lagrange(), kappa)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::batch_test;
    use ark_bls12_377::Fr as Bls12377Fr;
    use ark_bls12_381::Fr as Bls12381Fr;
    use ark_ff::UniformRand;
    use rand::thread_rng;

    fn lagrange_fixture<F: PrimeField>(domain: &Domain<F>) -> Polynomial<F, Lagrange> {
        let mut rng = thread_rng();
        Polynomial::from_vec((0..domain.size()).map(|_| F::rand(&mut rng)).collect())
    }

    fn fft_ifft_round_trip<F: PrimeField>() {
        let domain = Domain::<F>::new(8).unwrap();
        let p = lagrange_fixture(&domain);
        let back = domain.fft(&domain.ifft(&p));
        assert_eq!(p.values(), back.values());
    }

    fn coset_round_trip<F: PrimeField>() {
        let domain = Domain::<F>::new(8).unwrap();
        let p = lagrange_fixture(&domain);
        let kappa = F::from(7u64);
        let lifted = domain.lift(&p, kappa);
        let lowered = domain.from_coset_extended(&lifted, kappa);
        let lowered_lagrange = domain.fft(&lowered);
        assert_eq!(p.values(), lowered_lagrange.values());
    }

    fn barycentric_agrees_with_values<F: PrimeField>() {
        let domain = Domain::<F>::new(8).unwrap();
        let p = lagrange_fixture(&domain);
        let omega = domain.group_gen();
        let mut root = F::one();
        for i in 0..domain.size() {
            assert_eq!(p.barycentric_eval(&domain, root), p.values()[i]);
            root *= omega;
        }
    }

    fn shift_rotates_by_k<F: PrimeField>() {
        let domain = Domain::<F>::new(8).unwrap();
        let values: Vec<F> = (0..32u64).map(F::from).collect();
        let p: Polynomial<F, CosetLagrange4> = Polynomial::from_vec(values.clone());
        let shifted = p.shift(4);
        for i in 0..32 {
            assert_eq!(shifted.values()[i], values[(i + 4) % 32]);
        }
    }

    batch_test!(
        [
            fft_ifft_round_trip,
            coset_round_trip,
            barycentric_agrees_with_values,
            shift_rotates_by_k
        ],
        [Bls12377Fr, Bls12381Fr]
    );
}
