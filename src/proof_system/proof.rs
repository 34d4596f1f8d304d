// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A Proof stores every commitment and evaluation needed for a verifier to
//! check that the witness used to build it satisfies the circuit.

use ark_ec::PairingEngine;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// Round 1's outbound message: commitments to the wire polynomials.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Message1<E>
where
    E: PairingEngine,
{
    /// Commitment to the left-wire polynomial.
    pub a_1: E::G1Affine,
    /// Commitment to the right-wire polynomial.
    pub b_1: E::G1Affine,
    /// Commitment to the output-wire polynomial.
    pub c_1: E::G1Affine,
}

/// Round 2's outbound message: commitment to the permutation accumulator.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Message2<E>
where
    E: PairingEngine,
{
    /// Commitment to the permutation grand-product polynomial.
    pub z_1: E::G1Affine,
}

/// Round 3's outbound message: commitments to the three quotient chunks.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Message3<E>
where
    E: PairingEngine,
{
    /// Commitment to the low quotient chunk.
    pub t_lo_1: E::G1Affine,
    /// Commitment to the middle quotient chunk.
    pub t_mid_1: E::G1Affine,
    /// Commitment to the high quotient chunk.
    pub t_hi_1: E::G1Affine,
}

/// Round 4's outbound message: the six evaluations at `ζ` (and `ζ·ω`).
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Copy(bound = ""))]
pub struct Message4<F> {
    /// `A(ζ)`.
    pub a_eval: F,
    /// `B(ζ)`.
    pub b_eval: F,
    /// `C(ζ)`.
    pub c_eval: F,
    /// `S1(ζ)`.
    pub s1_eval: F,
    /// `S2(ζ)`.
    pub s2_eval: F,
    /// `Z(ζ·ω)`.
    pub z_shifted_eval: F,
}

/// Round 5's outbound message: the two KZG opening witnesses.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""))]
pub struct Message5<E>
where
    E: PairingEngine,
{
    /// Opening witness at `ζ`.
    pub w_z_1: E::G1Affine,
    /// Opening witness at `ζ·ω`.
    pub w_zw_1: E::G1Affine,
}

/// The aggregated proof: exactly the fifteen fields of the five round
/// messages, flattened.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), PartialEq(bound = ""))]
pub struct Proof<E>
where
    E: PairingEngine,
{
    /// Commitment to the left-wire polynomial.
    pub a_1: E::G1Affine,
    /// Commitment to the right-wire polynomial.
    pub b_1: E::G1Affine,
    /// Commitment to the output-wire polynomial.
    pub c_1: E::G1Affine,
    /// Commitment to the permutation grand-product polynomial.
    pub z_1: E::G1Affine,
    /// Commitment to the low quotient chunk.
    pub t_lo_1: E::G1Affine,
    /// Commitment to the middle quotient chunk.
    pub t_mid_1: E::G1Affine,
    /// Commitment to the high quotient chunk.
    pub t_hi_1: E::G1Affine,
    /// `A(ζ)`.
    pub a_eval: E::Fr,
    /// `B(ζ)`.
    pub b_eval: E::Fr,
    /// `C(ζ)`.
    pub c_eval: E::Fr,
    /// `S1(ζ)`.
    pub s1_eval: E::Fr,
    /// `S2(ζ)`.
    pub s2_eval: E::Fr,
    /// `Z(ζ·ω)`.
    pub z_shifted_eval: E::Fr,
    /// Opening witness at `ζ`.
    pub w_z_1: E::G1Affine,
    /// Opening witness at `ζ·ω`.
    pub w_zw_1: E::G1Affine,
}

impl<E> Proof<E>
where
    E: PairingEngine,
{
    /// Assembles the final `Proof` from the five round messages.
    pub(crate) fn from_messages(
        msg_1: Message1<E>,
        msg_2: Message2<E>,
        msg_3: Message3<E>,
        msg_4: Message4<E::Fr>,
        msg_5: Message5<E>,
    ) -> Self {
        Self {
            a_1: msg_1.a_1,
            b_1: msg_1.b_1,
            c_1: msg_1.c_1,
            z_1: msg_2.z_1,
            t_lo_1: msg_3.t_lo_1,
            t_mid_1: msg_3.t_mid_1,
            t_hi_1: msg_3.t_hi_1,
            a_eval: msg_4.a_eval,
            b_eval: msg_4.b_eval,
            c_eval: msg_4.c_eval,
            s1_eval: msg_4.s1_eval,
            s2_eval: msg_4.s2_eval,
            z_shifted_eval: msg_4.z_shifted_eval,
            w_z_1: msg_5.w_z_1,
            w_zw_1: msg_5.w_zw_1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::batch_test;
    use ark_bls12_377::Bls12_377;
    use ark_bls12_381::Bls12_381;
    use ark_ff::UniformRand;
    use rand::thread_rng;

    fn serde_round_trip<E: PairingEngine>() {
        let mut rng = thread_rng();
        let proof = Proof::<E> {
            a_1: Default::default(),
            b_1: Default::default(),
            c_1: Default::default(),
            z_1: Default::default(),
            t_lo_1: Default::default(),
            t_mid_1: Default::default(),
            t_hi_1: Default::default(),
            a_eval: E::Fr::rand(&mut rng),
            b_eval: E::Fr::rand(&mut rng),
            c_eval: E::Fr::rand(&mut rng),
            s1_eval: E::Fr::rand(&mut rng),
            s2_eval: E::Fr::rand(&mut rng),
            z_shifted_eval: E::Fr::rand(&mut rng),
            w_z_1: Default::default(),
            w_zw_1: Default::default(),
        };

        let mut bytes = Vec::new();
        proof.serialize(&mut bytes).unwrap();
        let decoded = Proof::<E>::deserialize(bytes.as_slice()).unwrap();
        assert_eq!(proof, decoded);
    }

    batch_test!([serde_round_trip], [Bls12_377, Bls12_381]);
}
