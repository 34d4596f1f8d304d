// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A collection of all possible errors encountered in the prover.

/// Defines all possible errors that can be encountered while proving.
#[derive(Debug)]
pub enum Error {
    /// The requested evaluation domain size is larger than the field's
    /// two-adicity supports.
    InvalidDomainSize {
        /// log2 of the requested domain size.
        log_size_of_group: u32,
        /// The field's two-adicity.
        adicity: u32,
    },

    /// Two polynomials of the same basis were combined but had different
    /// lengths.
    MismatchedPolyLen,

    /// A pointwise division encountered a zero in the denominator vector.
    DivisionByZero,

    /// `commit` was called on a polynomial whose degree is not smaller
    /// than the setup's supported degree.
    DegreeTooLargeForCommit {
        /// Degree of the offending polynomial.
        degree: usize,
        /// Maximum degree the setup supports.
        max_degree: usize,
    },

    /// A witness variable referenced by a wire has no assignment.
    WitnessValueMissing {
        /// Name of the missing variable.
        variable: std::string::String,
    },

    /// The round-1 gate identity `A.QL + B.QR + A.B.QM + C.QO + PI + QC = 0`
    /// failed to hold at the given row.
    GateConstraintUnsatisfied {
        /// Row (index into the evaluation domain) where the identity
        /// failed.
        row: usize,
    },

    /// The round-2 permutation accumulator did not wrap around to `1`, or
    /// its step-by-step local identity failed somewhere around `H`.
    PermutationAccumulatorMismatch,

    /// The monomial form of the quotient polynomial has a nonzero
    /// coefficient at or above degree `3n`.
    QuotientDegreeOverflow,

    /// The `T1(κ) + κ^n T2(κ) + κ^{2n} T3(κ) = T_big[0]` cross-check from
    /// round 3 failed.
    QuotientCrossCheckFailed,

    /// The linearisation polynomial `R` did not evaluate to zero at `ζ`.
    LinearisationNonzeroAtChallenge,

    /// An opening polynomial (`W_z` or `W_zw`) has a nonzero coefficient
    /// at or above degree `n`.
    OpeningDegreeOverflow,

    /// A transcript challenge collided with a domain element it must be
    /// distinct from (e.g. `κ ∈ H`, or `ζ·ω` equal to a coset point).
    ChallengeCollidesWithDomain {
        /// Which challenge/point pair collided.
        which: &'static str,
    },

    /// Polynomial Commitment errors
    PCError {
        /// Polynomial Commitment errors
        error: ark_poly_commit::Error,
    },
}

impl From<ark_poly_commit::Error> for Error {
    fn from(error: ark_poly_commit::Error) -> Self {
        Self::PCError { error }
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDomainSize {
                log_size_of_group,
                adicity,
            } => write!(
                f,
                "log-size of the evaluation domain group > two-adicity: \
                 {:?} > {:?}",
                log_size_of_group, adicity
            ),
            Self::MismatchedPolyLen => {
                write!(f, "polynomials of the same basis have different lengths")
            }
            Self::DivisionByZero => {
                write!(f, "pointwise division encountered a zero denominator")
            }
            Self::DegreeTooLargeForCommit { degree, max_degree } => write!(
                f,
                "cannot commit to a degree-{} polynomial, setup supports degree {}",
                degree, max_degree
            ),
            Self::WitnessValueMissing { variable } => {
                write!(f, "no witness assignment for variable {:?}", variable)
            }
            Self::GateConstraintUnsatisfied { row } => {
                write!(f, "gate identity unsatisfied at row {}", row)
            }
            Self::PermutationAccumulatorMismatch => {
                write!(f, "permutation accumulator failed to wrap around to 1")
            }
            Self::QuotientDegreeOverflow => {
                write!(f, "quotient polynomial has degree >= 3n")
            }
            Self::QuotientCrossCheckFailed => {
                write!(f, "quotient chunk cross-check at the fft cofactor failed")
            }
            Self::LinearisationNonzeroAtChallenge => {
                write!(f, "linearisation polynomial did not vanish at zeta")
            }
            Self::OpeningDegreeOverflow => {
                write!(f, "opening polynomial has degree >= n")
            }
            Self::ChallengeCollidesWithDomain { which } => {
                write!(f, "transcript challenge collided with a domain element: {}", which)
            }
            Self::PCError { error } => write!(f, "{:?}", error),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
