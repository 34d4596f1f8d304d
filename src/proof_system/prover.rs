// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The round driver: implements rounds 1-5 and owns the prover's transient
//! algebraic state, threaded forward one record per round rather than held
//! as mutable fields on a long-lived object.

use super::proof::{Message1, Message2, Message3, Message4, Message5, Proof};
use crate::error::Error;
use crate::poly::{CosetLagrange4, Domain, Lagrange, Monomial, Polynomial};
use crate::program::{wire_value, Program, Witness};
use crate::setup::Setup;
use crate::transcript::TranscriptWrapper;
use ark_ec::PairingEngine;
use ark_ff::{fields::batch_inversion, Field, PrimeField, Zero};
use itertools::izip;

#[inline]
fn rlc<F: Field>(term: F, x: F, beta: F, gamma: F) -> F {
    term + beta * x + gamma
}

/// State carried out of round 1: the wire polynomials and the public input
/// polynomial, all `LAGRANGE`.
struct Round1State<F: PrimeField> {
    a: Polynomial<F, Lagrange>,
    b: Polynomial<F, Lagrange>,
    c: Polynomial<F, Lagrange>,
    pi: Polynomial<F, Lagrange>,
}

/// State carried out of round 2: round 1's state plus the permutation
/// accumulator, plus the `(beta, gamma)` challenges it was built with.
struct Round2State<F: PrimeField> {
    prev: Round1State<F>,
    z: Polynomial<F, Lagrange>,
    beta: F,
    gamma: F,
}

/// State carried out of round 3: the quotient chunks (monomial) and every
/// coset-lifted polynomial round 5 needs, so round 5 never has to recompute
/// a lift at the same `κ`.
struct Round3State<F: PrimeField> {
    prev: Round2State<F>,
    alpha: F,
    kappa: F,
    t1: Polynomial<F, Monomial>,
    t2: Polynomial<F, Monomial>,
    t3: Polynomial<F, Monomial>,
    a_big: Polynomial<F, CosetLagrange4>,
    b_big: Polynomial<F, CosetLagrange4>,
    c_big: Polynomial<F, CosetLagrange4>,
    z_big: Polynomial<F, CosetLagrange4>,
    s1_big: Polynomial<F, CosetLagrange4>,
    s2_big: Polynomial<F, CosetLagrange4>,
    s3_big: Polynomial<F, CosetLagrange4>,
    q_l_big: Polynomial<F, CosetLagrange4>,
    q_r_big: Polynomial<F, CosetLagrange4>,
    q_m_big: Polynomial<F, CosetLagrange4>,
    q_o_big: Polynomial<F, CosetLagrange4>,
    q_c_big: Polynomial<F, CosetLagrange4>,
}

/// State carried out of round 4: round 3's state plus the six evaluations
/// and the `ζ` challenge.
struct Round4State<F: PrimeField> {
    prev: Round3State<F>,
    zeta: F,
    a_eval: F,
    b_eval: F,
    c_eval: F,
    s1_eval: F,
    s2_eval: F,
    z_shifted_eval: F,
}

/// The five-round PLONK prover. Immutable once constructed: `prove` is a
/// pure function of `(setup, program, witness)` up to the transcript's
/// deterministic challenge derivation.
pub struct Prover<'p, E, S, P>
where
    E: PairingEngine,
    S: Setup<E>,
    P: Program<E::Fr>,
{
    setup: &'p S,
    program: &'p P,
    domain: Domain<E::Fr>,
}

impl<'p, E, S, P> Prover<'p, E, S, P>
where
    E: PairingEngine,
    S: Setup<E>,
    P: Program<E::Fr>,
{
    /// Builds a prover for `program`, backed by `setup`.
    pub fn new(setup: &'p S, program: &'p P) -> Result<Self, Error> {
        let domain = Domain::new(program.group_order())?;
        Ok(Self {
            setup,
            program,
            domain,
        })
    }

    fn commit(&self, p: &Polynomial<E::Fr, Monomial>) -> Result<E::G1Affine, Error> {
        self.setup.commit(p)
    }

    /// Runs the full five-round protocol and returns the aggregated proof.
    pub fn prove(&self, witness: &Witness<E::Fr>) -> Result<Proof<E>, Error> {
        let pk = self.program.common_preprocessed_input();
        let public_values: Vec<E::Fr> = self
            .program
            .public_variables()
            .iter()
            .map(|v| {
                witness
                    .get(v)
                    .copied()
                    .ok_or_else(|| Error::WitnessValueMissing {
                        variable: v.clone(),
                    })
            })
            .collect::<Result<_, _>>()?;

        let pk_commitments = [
            self.commit(&self.domain.ifft(&pk.q_l))?,
            self.commit(&self.domain.ifft(&pk.q_r))?,
            self.commit(&self.domain.ifft(&pk.q_m))?,
            self.commit(&self.domain.ifft(&pk.q_o))?,
            self.commit(&self.domain.ifft(&pk.q_c))?,
            self.commit(&self.domain.ifft(&pk.s1))?,
            self.commit(&self.domain.ifft(&pk.s2))?,
            self.commit(&self.domain.ifft(&pk.s3))?,
        ];

        let mut transcript: TranscriptWrapper<E> =
            TranscriptWrapper::new(b"plonk", pk, &pk_commitments, &public_values);

        let (msg_1, state_1) = self.round_1(witness)?;
        let (beta, gamma) = transcript.round_1(&msg_1.a_1, &msg_1.b_1, &msg_1.c_1);

        let (msg_2, state_2) = self.round_2(state_1, beta, gamma)?;
        let (alpha, kappa) = transcript.round_2(&msg_2.z_1);

        let (msg_3, state_3) = self.round_3(state_2, alpha, kappa)?;
        let zeta = transcript.round_3(&msg_3.t_lo_1, &msg_3.t_mid_1, &msg_3.t_hi_1);

        let (msg_4, state_4) = self.round_4(state_3, zeta)?;
        let v = transcript.round_4(
            &msg_4.a_eval,
            &msg_4.b_eval,
            &msg_4.c_eval,
            &msg_4.s1_eval,
            &msg_4.s2_eval,
            &msg_4.z_shifted_eval,
        );

        let msg_5 = self.round_5(state_4, v)?;

        Ok(Proof::from_messages(msg_1, msg_2, msg_3, msg_4, msg_5))
    }

    /// Round 1: build the wire polynomials and the public-input polynomial,
    /// check the gate identity holds over `H`, and commit.
    fn round_1(
        &self,
        witness: &Witness<E::Fr>,
    ) -> Result<(Message1<E>, Round1State<E::Fr>), Error> {
        let n = self.domain.size();
        let wires = self.program.wires();
        let pk = self.program.common_preprocessed_input();

        let mut a_values = vec![E::Fr::zero(); n];
        let mut b_values = vec![E::Fr::zero(); n];
        let mut c_values = vec![E::Fr::zero(); n];
        for (i, wire) in wires.iter().enumerate() {
            a_values[i] = wire_value(witness, &wire.l)?;
            b_values[i] = wire_value(witness, &wire.r)?;
            c_values[i] = wire_value(witness, &wire.o)?;
        }

        let public_vars = self.program.public_variables();
        let mut pi_values = vec![E::Fr::zero(); n];
        for (i, v) in public_vars.iter().enumerate() {
            pi_values[i] = -wire_value(witness, &Some(v.clone()))?;
        }

        let a = Polynomial::<E::Fr, Lagrange>::from_vec(a_values);
        let b = Polynomial::<E::Fr, Lagrange>::from_vec(b_values);
        let c = Polynomial::<E::Fr, Lagrange>::from_vec(c_values);
        let pi = Polynomial::<E::Fr, Lagrange>::from_vec(pi_values);

        // Gate sanity check: A.QL + B.QR + A.B.QM + C.QO + PI + QC == 0 over H.
        for i in 0..n {
            let gate = a.values()[i] * pk.q_l.values()[i]
                + b.values()[i] * pk.q_r.values()[i]
                + a.values()[i] * b.values()[i] * pk.q_m.values()[i]
                + c.values()[i] * pk.q_o.values()[i]
                + pi.values()[i]
                + pk.q_c.values()[i];
            if !gate.is_zero() {
                return Err(Error::GateConstraintUnsatisfied { row: i });
            }
        }

        let a_1 = self.commit(&self.domain.ifft(&a))?;
        let b_1 = self.commit(&self.domain.ifft(&b))?;
        let c_1 = self.commit(&self.domain.ifft(&c))?;

        Ok((
            Message1 { a_1, b_1, c_1 },
            Round1State { a, b, c, pi },
        ))
    }

    /// Round 2: the permutation grand-product accumulator.
    fn round_2(
        &self,
        prev: Round1State<E::Fr>,
        beta: E::Fr,
        gamma: E::Fr,
    ) -> Result<(Message2<E>, Round2State<E::Fr>), Error> {
        let n = self.domain.size();
        let pk = self.program.common_preprocessed_input();
        let omega = self.domain.group_gen();
        let k1 = E::Fr::one();
        let k2 = E::Fr::from(2u64);
        let k3 = E::Fr::from(3u64);

        let mut numerators = Vec::with_capacity(n);
        let mut denominators = Vec::with_capacity(n);
        let mut root = E::Fr::one();
        for i in 0..n {
            let num = rlc(prev.a.values()[i], k1 * root, beta, gamma)
                * rlc(prev.b.values()[i], k2 * root, beta, gamma)
                * rlc(prev.c.values()[i], k3 * root, beta, gamma);
            let den = rlc(prev.a.values()[i], pk.s1.values()[i], beta, gamma)
                * rlc(prev.b.values()[i], pk.s2.values()[i], beta, gamma)
                * rlc(prev.c.values()[i], pk.s3.values()[i], beta, gamma);
            numerators.push(num);
            denominators.push(den);
            root *= omega;
        }

        let mut den_inv = denominators.clone();
        batch_inversion(&mut den_inv);

        let mut z = Vec::with_capacity(n + 1);
        z.push(E::Fr::one());
        for i in 0..n {
            let prev_z = *z.last().unwrap();
            z.push(prev_z * numerators[i] * den_inv[i]);
        }
        let z_n = z.pop().unwrap();
        if z_n != E::Fr::one() {
            return Err(Error::PermutationAccumulatorMismatch);
        }

        // Step-by-step local identity: numerators[i] * Z_i == denominators[i] * Z_{i+1}.
        for i in 0..n {
            let lhs = numerators[i] * z[i];
            let rhs = denominators[i] * z[(i + 1) % n];
            if lhs != rhs {
                return Err(Error::PermutationAccumulatorMismatch);
            }
        }

        let z_poly = Polynomial::<E::Fr, Lagrange>::from_vec(z);
        let z_1 = self.commit(&self.domain.ifft(&z_poly))?;

        Ok((
            Message2 { z_1 },
            Round2State {
                prev,
                z: z_poly,
                beta,
                gamma,
            },
        ))
    }

    /// Round 3: the coset-extended quotient polynomial, split into three
    /// degree-`<n` chunks.
    fn round_3(
        &self,
        prev: Round2State<E::Fr>,
        alpha: E::Fr,
        kappa: E::Fr,
    ) -> Result<(Message3<E>, Round3State<E::Fr>), Error> {
        let n = self.domain.size();
        let pk = self.program.common_preprocessed_input();
        let beta = prev.beta;
        let gamma = prev.gamma;

        let a_big = self.domain.lift(&prev.prev.a, kappa);
        let b_big = self.domain.lift(&prev.prev.b, kappa);
        let c_big = self.domain.lift(&prev.prev.c, kappa);
        let pi_big = self.domain.lift(&prev.prev.pi, kappa);
        let z_big = self.domain.lift(&prev.z, kappa);
        let z_shifted_big = z_big.shift(4);
        let q_l_big = self.domain.lift(&pk.q_l, kappa);
        let q_r_big = self.domain.lift(&pk.q_r, kappa);
        let q_m_big = self.domain.lift(&pk.q_m, kappa);
        let q_o_big = self.domain.lift(&pk.q_o, kappa);
        let q_c_big = self.domain.lift(&pk.q_c, kappa);
        let s1_big = self.domain.lift(&pk.s1, kappa);
        let s2_big = self.domain.lift(&pk.s2, kappa);
        let s3_big = self.domain.lift(&pk.s3, kappa);

        let zh_big = self.domain.vanishing_on_coset(kappa);
        let l0_big = self.domain.l0_coset(kappa);
        let coset_points = self.domain.coset_points(kappa);

        let k1 = E::Fr::one();
        let k2 = E::Fr::from(2u64);
        let k3 = E::Fr::from(3u64);
        let alpha_sq = alpha.square();

        let t_numerator: Vec<E::Fr> = izip!(
            a_big.values(),
            b_big.values(),
            c_big.values(),
            q_l_big.values(),
            q_r_big.values(),
            q_m_big.values(),
            q_o_big.values(),
            pi_big.values(),
            q_c_big.values(),
            s1_big.values(),
            s2_big.values(),
            s3_big.values(),
            z_big.values(),
            z_shifted_big.values(),
            l0_big.values(),
            &coset_points,
        )
        .map(
            |(&a_i, &b_i, &c_i, &ql_i, &qr_i, &qm_i, &qo_i, &pi_i, &qc_i, &s1_i, &s2_i, &s3_i, &z_i, &zw_i, &l0_i, &x_i)| {
                let gate = a_i * ql_i + b_i * qr_i + a_i * b_i * qm_i + c_i * qo_i + pi_i + qc_i;
                let perm_num = rlc(a_i, k1 * x_i, beta, gamma)
                    * rlc(b_i, k2 * x_i, beta, gamma)
                    * rlc(c_i, k3 * x_i, beta, gamma);
                let perm_den = rlc(a_i, s1_i, beta, gamma)
                    * rlc(b_i, s2_i, beta, gamma)
                    * rlc(c_i, s3_i, beta, gamma);
                let permutation = perm_num * z_i - perm_den * zw_i;
                let boundary = (z_i - E::Fr::one()) * l0_i;
                gate + alpha * permutation + alpha_sq * boundary
            },
        )
        .collect();

        let t_numerator_big: Polynomial<E::Fr, CosetLagrange4> =
            Polynomial::from_vec(t_numerator);
        let t_big = t_numerator_big.div(&zh_big)?;

        let t_mono = self.domain.from_coset_extended(&t_big, kappa);
        if t_mono.values()[3 * n..].iter().any(|c| !c.is_zero()) {
            return Err(Error::QuotientDegreeOverflow);
        }

        let t1 = Polynomial::<E::Fr, Monomial>::from_vec(t_mono.values()[0..n].to_vec());
        let t2 = Polynomial::<E::Fr, Monomial>::from_vec(t_mono.values()[n..2 * n].to_vec());
        let t3 = Polynomial::<E::Fr, Monomial>::from_vec(t_mono.values()[2 * n..3 * n].to_vec());

        let kappa_n = kappa.pow([n as u64]);
        let kappa_2n = kappa.pow([2 * n as u64]);
        let cross_check = t1.evaluate(kappa) + kappa_n * t2.evaluate(kappa) + kappa_2n * t3.evaluate(kappa);
        if cross_check != t_big.values()[0] {
            return Err(Error::QuotientCrossCheckFailed);
        }

        #[cfg(feature = "trace-print")]
        eprintln!("round 3: generated T1, T2, T3");

        let t_lo_1 = self.commit(&t1)?;
        let t_mid_1 = self.commit(&t2)?;
        let t_hi_1 = self.commit(&t3)?;

        Ok((
            Message3 {
                t_lo_1,
                t_mid_1,
                t_hi_1,
            },
            Round3State {
                prev,
                alpha,
                kappa,
                t1,
                t2,
                t3,
                a_big,
                b_big,
                c_big,
                z_big,
                s1_big,
                s2_big,
                s3_big,
                q_l_big,
                q_r_big,
                q_m_big,
                q_o_big,
                q_c_big,
            },
        ))
    }

    /// Round 4: barycentric evaluations at `ζ` (and `Z` at `ζ·ω`).
    fn round_4(
        &self,
        prev: Round3State<E::Fr>,
        zeta: E::Fr,
    ) -> Result<(Message4<E::Fr>, Round4State<E::Fr>), Error> {
        let pk = self.program.common_preprocessed_input();
        let omega = self.domain.group_gen();

        let a_eval = prev.prev.prev.a.barycentric_eval(&self.domain, zeta);
        let b_eval = prev.prev.prev.b.barycentric_eval(&self.domain, zeta);
        let c_eval = prev.prev.prev.c.barycentric_eval(&self.domain, zeta);
        let s1_eval = pk.s1.barycentric_eval(&self.domain, zeta);
        let s2_eval = pk.s2.barycentric_eval(&self.domain, zeta);
        let z_shifted_eval = prev.prev.z.barycentric_eval(&self.domain, zeta * omega);

        Ok((
            Message4 {
                a_eval,
                b_eval,
                c_eval,
                s1_eval,
                s2_eval,
                z_shifted_eval,
            },
            Round4State {
                prev,
                zeta,
                a_eval,
                b_eval,
                c_eval,
                s1_eval,
                s2_eval,
                z_shifted_eval,
            },
        ))
    }

    /// Round 5: the linearisation polynomial and the two KZG opening
    /// witnesses.
    fn round_5(&self, state: Round4State<E::Fr>, v: E::Fr) -> Result<Message5<E>, Error> {
        let n = self.domain.size();
        let four_n = 4 * n;
        let r3 = &state.prev;
        let r2 = &r3.prev;
        let zeta = state.zeta;
        let kappa = r3.kappa;
        let alpha = r3.alpha;
        let beta = r2.beta;
        let gamma = r2.gamma;
        let omega = self.domain.group_gen();

        let pi_eval = r2.prev.pi.barycentric_eval(&self.domain, zeta);
        let l0_eval = self.domain.l0_lagrange().barycentric_eval(&self.domain, zeta);
        let zeta_n = zeta.pow([n as u64]);
        let zh_eval = zeta_n - E::Fr::one();

        let t1_big = self.domain.to_coset_extended(&r3.t1, kappa);
        let t2_big = self.domain.to_coset_extended(&r3.t2, kappa);
        let t3_big = self.domain.to_coset_extended(&r3.t3, kappa);
        let zeta_2n = zeta_n.square();

        let mut r_values = Vec::with_capacity(four_n);
        for i in 0..four_n {
            let gate_lin = state.a_eval * r3.q_l_big.values()[i]
                + state.b_eval * r3.q_r_big.values()[i]
                + state.a_eval * state.b_eval * r3.q_m_big.values()[i]
                + state.c_eval * r3.q_o_big.values()[i]
                + pi_eval
                + r3.q_c_big.values()[i];

            let perm_lin = (state.a_eval + beta * zeta + gamma)
                * (state.b_eval + beta * E::Fr::from(2u64) * zeta + gamma)
                * (state.c_eval + beta * E::Fr::from(3u64) * zeta + gamma)
                * alpha
                * r3.z_big.values()[i];

            let perm_lin_shifted = (state.a_eval + beta * state.s1_eval + gamma)
                * (state.b_eval + beta * state.s2_eval + gamma)
                * (state.c_eval + beta * r3.s3_big.values()[i] + gamma)
                * alpha
                * state.z_shifted_eval;

            let boundary = (r3.z_big.values()[i] - E::Fr::one()) * l0_eval * alpha.square();

            let quotient_term = (t1_big.values()[i]
                + zeta_n * t2_big.values()[i]
                + zeta_2n * t3_big.values()[i])
                * zh_eval;

            r_values.push(gate_lin + perm_lin - perm_lin_shifted + boundary - quotient_term);
        }
        let r_big: Polynomial<E::Fr, CosetLagrange4> = Polynomial::from_vec(r_values);
        let r_mono_full = self.domain.from_coset_extended(&r_big, kappa);
        let r_mono = Polynomial::<E::Fr, Monomial>::from_vec(r_mono_full.values()[0..n].to_vec());

        if !r_mono.evaluate(zeta).is_zero() {
            return Err(Error::LinearisationNonzeroAtChallenge);
        }

        #[cfg(feature = "trace-print")]
        eprintln!("round 5: generated linearisation polynomial R");

        // Relift the truncated R so the opening polynomial is built from
        // the degree-<n linearisation, not the pre-truncation coset vector.
        let r_big_trunc = self.domain.to_coset_extended(&r_mono, kappa);
        let coset_points = self.domain.coset_points(kappa);

        let v2 = v.square();
        let v3 = v2 * v;
        let v4 = v3 * v;
        let v5 = v4 * v;

        let zeta_w = zeta * omega;
        let mut denom_z = Vec::with_capacity(four_n);
        let mut denom_zw = Vec::with_capacity(four_n);
        for x in &coset_points {
            denom_z.push(*x - zeta);
            denom_zw.push(*x - zeta_w);
        }
        if denom_z.iter().any(|d| d.is_zero()) {
            return Err(Error::ChallengeCollidesWithDomain {
                which: "zeta collides with a coset point",
            });
        }
        if denom_zw.iter().any(|d| d.is_zero()) {
            return Err(Error::ChallengeCollidesWithDomain {
                which: "zeta * omega collides with a coset point",
            });
        }

        let mut w_z_numerator = Vec::with_capacity(four_n);
        for i in 0..four_n {
            w_z_numerator.push(
                r_big_trunc.values()[i]
                    + v * (r3.a_big.values()[i] - state.a_eval)
                    + v2 * (r3.b_big.values()[i] - state.b_eval)
                    + v3 * (r3.c_big.values()[i] - state.c_eval)
                    + v4 * (r3.s1_big.values()[i] - state.s1_eval)
                    + v5 * (r3.s2_big.values()[i] - state.s2_eval),
            );
        }
        let w_z_numerator_big: Polynomial<E::Fr, CosetLagrange4> =
            Polynomial::from_vec(w_z_numerator);
        let denom_z_big: Polynomial<E::Fr, CosetLagrange4> = Polynomial::from_vec(denom_z);
        let w_z_big = w_z_numerator_big.div(&denom_z_big)?;

        let w_z_mono = self.domain.from_coset_extended(&w_z_big, kappa);
        if w_z_mono.values()[n..].iter().any(|c| !c.is_zero()) {
            return Err(Error::OpeningDegreeOverflow);
        }
        let w_z_poly =
            Polynomial::<E::Fr, Monomial>::from_vec(w_z_mono.values()[0..n].to_vec());
        let w_z_1 = self.commit(&w_z_poly)?;

        let mut w_zw_numerator = Vec::with_capacity(four_n);
        for i in 0..four_n {
            w_zw_numerator.push(r3.z_big.values()[i] - state.z_shifted_eval);
        }
        let w_zw_numerator_big: Polynomial<E::Fr, CosetLagrange4> =
            Polynomial::from_vec(w_zw_numerator);
        let denom_zw_big: Polynomial<E::Fr, CosetLagrange4> = Polynomial::from_vec(denom_zw);
        let w_zw_big = w_zw_numerator_big.div(&denom_zw_big)?;

        let w_zw_mono = self.domain.from_coset_extended(&w_zw_big, kappa);
        if w_zw_mono.values()[n..].iter().any(|c| !c.is_zero()) {
            return Err(Error::OpeningDegreeOverflow);
        }
        let w_zw_poly =
            Polynomial::<E::Fr, Monomial>::from_vec(w_zw_mono.values()[0..n].to_vec());
        let w_zw_1 = self.commit(&w_zw_poly)?;

        #[cfg(feature = "trace-print")]
        eprintln!("round 5: generated final opening witnesses");

        Ok(Message5 { w_z_1, w_zw_1 })
    }
}
