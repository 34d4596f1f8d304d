// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! End-to-end scenarios driving `Prover::prove` against small hand-built
//! circuits, with no circuit compiler in the loop.

use ark_bls12_381::{Bls12_381, Fr};
use ark_ec::PairingEngine;
use ark_ff::{One, PrimeField, Zero};
use hashbrown::HashMap;
use plonk_prover::{
    CommonPreprocessedInput, Domain, Error, KzgSetup, Polynomial, Program, Prover, VariableName,
    Wire, Witness,
};
use rand::thread_rng;

/// A hand-built circuit: selectors, permutation, wiring and public inputs,
/// all provided directly rather than compiled from a higher-level language.
struct TestProgram<F: PrimeField> {
    n: usize,
    wires: Vec<Wire>,
    public_variables: Vec<VariableName>,
    pk: CommonPreprocessedInput<F>,
}

impl<F: PrimeField> Program<F> for TestProgram<F> {
    fn group_order(&self) -> usize {
        self.n
    }

    fn wires(&self) -> &[Wire] {
        &self.wires
    }

    fn public_variables(&self) -> &[VariableName] {
        &self.public_variables
    }

    fn common_preprocessed_input(&self) -> &CommonPreprocessedInput<F> {
        &self.pk
    }
}

/// The identity permutation over `n` rows: row `i`'s three wire slots sit at
/// `k1*omega^i`, `k2*omega^i`, `k3*omega^i`.
fn identity_sigmas<F: PrimeField>(domain: &Domain<F>) -> (Vec<F>, Vec<F>, Vec<F>) {
    let omega = domain.group_gen();
    let k1 = F::one();
    let k2 = F::from(2u64);
    let k3 = F::from(3u64);
    let mut s1 = Vec::with_capacity(domain.size());
    let mut s2 = Vec::with_capacity(domain.size());
    let mut s3 = Vec::with_capacity(domain.size());
    let mut root = F::one();
    for _ in 0..domain.size() {
        s1.push(k1 * root);
        s2.push(k2 * root);
        s3.push(k3 * root);
        root *= omega;
    }
    (s1, s2, s3)
}

fn zero_selectors<F: PrimeField>(n: usize) -> (Vec<F>, Vec<F>, Vec<F>, Vec<F>, Vec<F>) {
    (
        vec![F::zero(); n],
        vec![F::zero(); n],
        vec![F::zero(); n],
        vec![F::zero(); n],
        vec![F::zero(); n],
    )
}

/// `a - a = 0` at row 0, every other row an untouched empty gate.
fn identity_circuit<F: PrimeField>() -> TestProgram<F> {
    let n = 8;
    let domain = Domain::<F>::new(n).unwrap();
    let (mut q_l, _, _, mut q_o, _) = zero_selectors::<F>(n);
    q_l[0] = F::one();
    q_o[0] = -F::one();
    let (s1, s2, s3) = identity_sigmas(&domain);

    let mut wires = vec![Wire::new(None, None, None); n];
    wires[0] = Wire::new(Some("a".into()), None, Some("a".into()));

    let pk = CommonPreprocessedInput::new(
        n,
        Polynomial::from_vec(q_l),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(q_o),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(s1),
        Polynomial::from_vec(s2),
        Polynomial::from_vec(s3),
    )
    .unwrap();

    TestProgram {
        n,
        wires,
        public_variables: vec![],
        pk,
    }
}

/// `x + y - z = 0` at row 0.
fn addition_circuit<F: PrimeField>() -> TestProgram<F> {
    let n = 8;
    let domain = Domain::<F>::new(n).unwrap();
    let (mut q_l, mut q_r, _, mut q_o, _) = zero_selectors::<F>(n);
    q_l[0] = F::one();
    q_r[0] = F::one();
    q_o[0] = -F::one();
    let (s1, s2, s3) = identity_sigmas(&domain);

    let mut wires = vec![Wire::new(None, None, None); n];
    wires[0] = Wire::new(
        Some("x".into()),
        Some("y".into()),
        Some("z".into()),
    );

    let pk = CommonPreprocessedInput::new(
        n,
        Polynomial::from_vec(q_l),
        Polynomial::from_vec(q_r),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(q_o),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(s1),
        Polynomial::from_vec(s2),
        Polynomial::from_vec(s3),
    )
    .unwrap();

    TestProgram {
        n,
        wires,
        public_variables: vec![],
        pk,
    }
}

/// Two unconnected rows whose left-wire slots are tied together by the
/// permutation (rather than by sharing a witness variable name), so only
/// the grand-product accumulator can catch an inconsistent witness.
fn permutation_circuit<F: PrimeField>() -> TestProgram<F> {
    let n = 8;
    let domain = Domain::<F>::new(n).unwrap();
    let (q_l, q_r, q_m, q_o, q_c) = zero_selectors::<F>(n);
    let (mut s1, s2, s3) = identity_sigmas(&domain);
    s1.swap(0, 1);

    let mut wires = vec![Wire::new(None, None, None); n];
    wires[0] = Wire::new(Some("a0".into()), None, None);
    wires[1] = Wire::new(Some("a1".into()), None, None);

    let pk = CommonPreprocessedInput::new(
        n,
        Polynomial::from_vec(q_l),
        Polynomial::from_vec(q_r),
        Polynomial::from_vec(q_m),
        Polynomial::from_vec(q_o),
        Polynomial::from_vec(q_c),
        Polynomial::from_vec(s1),
        Polynomial::from_vec(s2),
        Polynomial::from_vec(s3),
    )
    .unwrap();

    TestProgram {
        n,
        wires,
        public_variables: vec![],
        pk,
    }
}

/// Row 0 binds the public input `p` through `PI` alone (`p·QL + PI = 0` is
/// `p - p = 0`, trivially true for any `p`); row 1 pins a second variable
/// `expected` to the constant `42` via `QC`. The permutation ties row 0's
/// left-wire slot to row 1's, so the circuit is only satisfiable when the
/// witness's public input actually equals `42`.
fn public_input_circuit<F: PrimeField>() -> TestProgram<F> {
    let n = 8;
    let domain = Domain::<F>::new(n).unwrap();
    let (mut q_l, _, _, _, mut q_c) = zero_selectors::<F>(n);
    q_l[0] = F::one();
    q_l[1] = F::one();
    q_c[1] = -F::from(42u64);
    let (mut s1, s2, s3) = identity_sigmas(&domain);
    s1.swap(0, 1);

    let mut wires = vec![Wire::new(None, None, None); n];
    wires[0] = Wire::new(Some("p".into()), None, None);
    wires[1] = Wire::new(Some("expected".into()), None, None);

    let pk = CommonPreprocessedInput::new(
        n,
        Polynomial::from_vec(q_l),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(vec![F::zero(); n]),
        Polynomial::from_vec(q_c),
        Polynomial::from_vec(s1),
        Polynomial::from_vec(s2),
        Polynomial::from_vec(s3),
    )
    .unwrap();

    TestProgram {
        n,
        wires,
        public_variables: vec!["p".into()],
        pk,
    }
}

fn witness_of<F: PrimeField>(entries: &[(&str, F)]) -> Witness<F> {
    let mut w: HashMap<VariableName, F> = HashMap::new();
    for (name, value) in entries {
        w.insert((*name).into(), *value);
    }
    w
}

fn kzg_setup<E: PairingEngine>(max_degree: usize) -> KzgSetup<E> {
    KzgSetup::setup(max_degree, &mut thread_rng()).unwrap()
}

#[test]
fn identity_circuit_proves() {
    let program = identity_circuit::<Fr>();
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();
    let witness = witness_of(&[("a", Fr::from(7u64))]);
    prover.prove(&witness).unwrap();
}

#[test]
fn addition_circuit_proves_and_rejects_wrong_witness() {
    let program = addition_circuit::<Fr>();
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();

    let good = witness_of(&[
        ("x", Fr::from(3u64)),
        ("y", Fr::from(5u64)),
        ("z", Fr::from(8u64)),
    ]);
    prover.prove(&good).unwrap();

    let bad = witness_of(&[
        ("x", Fr::from(3u64)),
        ("y", Fr::from(5u64)),
        ("z", Fr::from(9u64)),
    ]);
    let err = prover.prove(&bad).unwrap_err();
    assert!(matches!(err, Error::GateConstraintUnsatisfied { row: 0 }));
}

#[test]
fn permutation_circuit_enforces_copy_constraint() {
    let program = permutation_circuit::<Fr>();
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();

    let consistent = witness_of(&[("a0", Fr::from(5u64)), ("a1", Fr::from(5u64))]);
    prover.prove(&consistent).unwrap();

    let inconsistent = witness_of(&[("a0", Fr::from(5u64)), ("a1", Fr::from(9u64))]);
    let err = prover.prove(&inconsistent).unwrap_err();
    assert!(matches!(err, Error::PermutationAccumulatorMismatch));
}

#[test]
fn public_input_binds_into_the_gate_identity() {
    let program = public_input_circuit::<Fr>();
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();

    let matching = witness_of(&[("p", Fr::from(42u64)), ("expected", Fr::from(42u64))]);
    prover.prove(&matching).unwrap();

    let mismatched = witness_of(&[("p", Fr::from(43u64)), ("expected", Fr::from(42u64))]);
    let err = prover.prove(&mismatched).unwrap_err();
    assert!(matches!(err, Error::PermutationAccumulatorMismatch));
}

#[test]
fn proving_is_deterministic() {
    let program = addition_circuit::<Fr>();
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();
    let witness = witness_of(&[
        ("x", Fr::from(3u64)),
        ("y", Fr::from(5u64)),
        ("z", Fr::from(8u64)),
    ]);

    let proof_1 = prover.prove(&witness).unwrap();
    let proof_2 = prover.prove(&witness).unwrap();
    assert_eq!(proof_1, proof_2);
}

#[test]
fn quotient_and_opening_cross_checks_pass_on_a_larger_circuit() {
    let n = 8;
    let domain = Domain::<Fr>::new(n).unwrap();
    let (mut q_l, mut q_r, mut q_m, mut q_o, mut q_c) = zero_selectors::<Fr>(n);
    // Row 0: x + y = z. Row 1: 2*x*y = w (exercises QM and a nonzero QC-free
    // multiplication gate in the same circuit as an addition gate).
    q_l[0] = Fr::one();
    q_r[0] = Fr::one();
    q_o[0] = -Fr::one();
    q_m[1] = Fr::from(2u64);
    q_o[1] = -Fr::one();
    q_c[1] = Fr::zero();

    let (s1, s2, s3) = identity_sigmas(&domain);
    let mut wires = vec![Wire::new(None, None, None); n];
    wires[0] = Wire::new(Some("x".into()), Some("y".into()), Some("z".into()));
    wires[1] = Wire::new(Some("x".into()), Some("y".into()), Some("w".into()));

    let pk = CommonPreprocessedInput::new(
        n,
        Polynomial::from_vec(q_l),
        Polynomial::from_vec(q_r),
        Polynomial::from_vec(q_m),
        Polynomial::from_vec(q_o),
        Polynomial::from_vec(q_c),
        Polynomial::from_vec(s1),
        Polynomial::from_vec(s2),
        Polynomial::from_vec(s3),
    )
    .unwrap();

    let program = TestProgram {
        n,
        wires,
        public_variables: vec![],
        pk,
    };
    let setup = kzg_setup::<Bls12_381>(16);
    let prover = Prover::new(&setup, &program).unwrap();

    let witness = witness_of(&[
        ("x", Fr::from(3u64)),
        ("y", Fr::from(5u64)),
        ("z", Fr::from(8u64)),
        ("w", Fr::from(30u64)),
    ]);
    // round_3/round_5 run their own cross-checks internally; a successful
    // `prove` here is itself the assertion that they agreed.
    prover.prove(&witness).unwrap();
}
