// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! This is an extension over the [Merlin Transcript](Transcript) which adds
//! the round hooks the five-round prover drives.

use crate::program::CommonPreprocessedInput;
use ark_ec::PairingEngine;
use ark_ff::{Field, PrimeField};
use ark_serialize::CanonicalSerialize;
use core::marker::PhantomData;
use merlin::Transcript;

/// Wrapper around [`Transcript`] carrying a field-element type parameter so
/// that `challenge_scalar` can return `E::Fr` directly.
#[derive(derivative::Derivative)]
#[derivative(Clone)]
pub struct TranscriptWrapper<E>
where
    E: PairingEngine,
{
    /// Base Transcript
    transcript: Transcript,

    /// Type Parameter Marker
    __: PhantomData<E>,
}

impl<E> TranscriptWrapper<E>
where
    E: PairingEngine,
{
    /// Builds a new [`TranscriptWrapper`] and immediately absorbs the
    /// circuit's group order, the commitments in its common preprocessed
    /// input, and the public input values.
    ///
    /// Absorbing the preprocessed input and the public inputs here (rather
    /// than never, as `prover.py`'s `FIXME` notes) is what prevents two
    /// different circuits, or two different public input vectors, from
    /// producing the same challenge sequence for the same witness-dependent
    /// messages.
    pub fn new(
        label: &'static [u8],
        pk: &CommonPreprocessedInput<E::Fr>,
        pk_commitments: &[E::G1Affine; 8],
        public_inputs: &[E::Fr],
    ) -> Self {
        let mut wrapper = Self {
            transcript: Transcript::new(label),
            __: PhantomData,
        };
        wrapper.circuit_domain_sep(pk.n() as u64);
        for comm in pk_commitments {
            wrapper.append_point(b"preprocessed", comm);
        }
        for pi in public_inputs {
            wrapper.append_scalar(b"public_input", pi);
        }
        wrapper
    }

    /// Append a group element with the given `label`.
    pub fn append_point(&mut self, label: &'static [u8], point: &E::G1Affine) {
        let mut bytes = Vec::new();
        point.serialize(&mut bytes).unwrap();
        self.transcript.append_message(label, &bytes);
    }

    /// Append a scalar with the given `label`.
    pub fn append_scalar(&mut self, label: &'static [u8], s: &E::Fr) {
        let mut bytes = Vec::new();
        s.serialize(&mut bytes).unwrap();
        self.transcript.append_message(label, &bytes);
    }

    /// Append domain separator for the circuit size.
    fn circuit_domain_sep(&mut self, n: u64) {
        self.transcript.append_message(b"dom-sep", b"circuit_size");
        self.transcript.append_u64(b"n", n);
    }

    /// Squeeze a single nonzero field challenge under `label`, rejection
    /// sampling against both an invalid byte decoding and the zero element.
    pub fn challenge_scalar(&mut self, label: &'static [u8]) -> E::Fr {
        let size = E::Fr::size_in_bits() / 8 + 1;
        let mut attempt: u64 = 0;
        loop {
            let mut buf = vec![0u8; size];
            // Bump the transcript state deterministically on every retry so
            // a rejected sample can never be reproduced by replaying the
            // same label.
            self.transcript.append_u64(b"challenge-retry", attempt);
            self.transcript.challenge_bytes(label, &mut buf);
            if let Some(candidate) = E::Fr::from_random_bytes(&buf) {
                if !candidate.is_zero() {
                    return candidate;
                }
            }
            attempt += 1;
        }
    }

    /// Squeeze `n` nonzero field challenges under `label`, one after
    /// another.
    pub fn challenge_scalars(&mut self, label: &'static [u8], n: usize) -> Vec<E::Fr> {
        (0..n).map(|_| self.challenge_scalar(label)).collect()
    }

    /// Round 1: absorb `(a_1, b_1, c_1)`, return `(beta, gamma)`.
    pub fn round_1(
        &mut self,
        a_1: &E::G1Affine,
        b_1: &E::G1Affine,
        c_1: &E::G1Affine,
    ) -> (E::Fr, E::Fr) {
        self.append_point(b"a_1", a_1);
        self.append_point(b"b_1", b_1);
        self.append_point(b"c_1", c_1);
        let beta = self.challenge_scalar(b"beta");
        let gamma = self.challenge_scalar(b"gamma");
        (beta, gamma)
    }

    /// Round 2: absorb `z_1`, return `(alpha, fft_cofactor)`.
    pub fn round_2(&mut self, z_1: &E::G1Affine) -> (E::Fr, E::Fr) {
        self.append_point(b"z_1", z_1);
        let alpha = self.challenge_scalar(b"alpha");
        let fft_cofactor = self.challenge_scalar(b"fft_cofactor");
        (alpha, fft_cofactor)
    }

    /// Round 3: absorb `(t_lo_1, t_mid_1, t_hi_1)`, return `zeta`.
    pub fn round_3(
        &mut self,
        t_lo_1: &E::G1Affine,
        t_mid_1: &E::G1Affine,
        t_hi_1: &E::G1Affine,
    ) -> E::Fr {
        self.append_point(b"t_lo_1", t_lo_1);
        self.append_point(b"t_mid_1", t_mid_1);
        self.append_point(b"t_hi_1", t_hi_1);
        self.challenge_scalar(b"zeta")
    }

    /// Round 4: absorb the six evaluations, return `v`.
    #[allow(clippy::too_many_arguments)]
    pub fn round_4(
        &mut self,
        a_eval: &E::Fr,
        b_eval: &E::Fr,
        c_eval: &E::Fr,
        s1_eval: &E::Fr,
        s2_eval: &E::Fr,
        z_shifted_eval: &E::Fr,
    ) -> E::Fr {
        self.append_scalar(b"a_eval", a_eval);
        self.append_scalar(b"b_eval", b_eval);
        self.append_scalar(b"c_eval", c_eval);
        self.append_scalar(b"s1_eval", s1_eval);
        self.append_scalar(b"s2_eval", s2_eval);
        self.append_scalar(b"z_shifted_eval", z_shifted_eval);
        self.challenge_scalar(b"v")
    }
}
