//! R1CS versions of the circuits the fixtures prove.
//!
//! Public signals are allocated first, so the instance vector lines up with
//! circom's `public.json` (outputs before public inputs).

use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};
use ark_relations::{
    lc,
    r1cs::{ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError, Variable},
};

fn assigned<T>(value: Option<T>) -> Result<T, SynthesisError> {
    value.ok_or(SynthesisError::AssignmentMissing)
}

/// `a · b = c` with `c` public.
#[derive(Clone, Default)]
pub struct Multiplier2 {
    pub a: Option<Fr>,
    pub b: Option<Fr>,
}

impl ConstraintSynthesizer<Fr> for Multiplier2 {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let c = cs.new_input_variable(|| Ok(assigned(self.a)? * assigned(self.b)?))?;
        let a = cs.new_witness_variable(|| assigned(self.a))?;
        let b = cs.new_witness_variable(|| assigned(self.b))?;
        cs.enforce_constraint(lc!() + a, lc!() + b, lc!() + c)
    }
}

/// `c = a · b`, `d = c²` with `d` public.
#[derive(Clone, Default)]
pub struct MultiplierSq {
    pub a: Option<Fr>,
    pub b: Option<Fr>,
}

impl ConstraintSynthesizer<Fr> for MultiplierSq {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let product = self.a.zip(self.b).map(|(a, b)| a * b);
        let d = cs.new_input_variable(|| Ok(assigned(product)?.square()))?;
        let a = cs.new_witness_variable(|| assigned(self.a))?;
        let b = cs.new_witness_variable(|| assigned(self.b))?;
        let c = cs.new_witness_variable(|| assigned(product))?;
        cs.enforce_constraint(lc!() + a, lc!() + b, lc!() + c)?;
        cs.enforce_constraint(lc!() + c, lc!() + c, lc!() + d)
    }
}

pub const ROUNDS: usize = 3;

/// Rock-paper-scissors scoring. Each round is `(opponent, response)` with
/// moves encoded as 0, 1, 2; the response beats the opponent when it is one
/// step ahead mod 3. The public output is the responder's total score:
/// `response + 1`, plus 3 for a draw or 6 for a win.
#[derive(Clone, Default)]
pub struct Advent2 {
    pub rounds: Option<[(u64, u64); ROUNDS]>,
}

impl Advent2 {
    pub fn score(rounds: &[(u64, u64); ROUNDS]) -> u64 {
        rounds
            .iter()
            .map(|&(x, y)| {
                let outcome = if x == y {
                    3
                } else if (y + 3 - x) % 3 == 1 {
                    6
                } else {
                    0
                };
                y + 1 + outcome
            })
            .sum()
    }
}

impl ConstraintSynthesizer<Fr> for Advent2 {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let two = Fr::from(2u64);
        let score = cs.new_input_variable(|| Ok(Fr::from(Self::score(&assigned(self.rounds)?))))?;

        let mut total = lc!();
        for i in 0..ROUNDS {
            let xy = self
                .rounds
                .map(|r| (Fr::from(r[i].0), Fr::from(r[i].1)));
            let x_val = xy.map(|(x, _)| x);
            let y_val = xy.map(|(_, y)| y);
            let x = cs.new_witness_variable(|| assigned(x_val))?;
            let y = cs.new_witness_variable(|| assigned(y_val))?;
            enforce_trit(&cs, x, x_val)?;
            enforce_trit(&cs, y, y_val)?;

            let draw = is_zero(&cs, lc!() + y - x, xy.map(|(x, y)| y - x))?;

            // responder wins iff (y + 2 - x)(y - 1 - x) = 0
            let prod_val = xy.map(|(x, y)| (y + two - x) * (y - Fr::one() - x));
            let prod = cs.new_witness_variable(|| assigned(prod_val))?;
            cs.enforce_constraint(
                lc!() + y - x + (two, Variable::One),
                lc!() + y - x - Variable::One,
                lc!() + prod,
            )?;
            let win = is_zero(&cs, lc!() + prod, prod_val)?;

            total = total + y + Variable::One + (Fr::from(3u64), draw) + (Fr::from(6u64), win);
        }
        cs.enforce_constraint(total, lc!() + Variable::One, lc!() + score)
    }
}

/// `x ∈ {0, 1, 2}` as `x(x - 1) = t`, `t(x - 2) = 0`.
fn enforce_trit(
    cs: &ConstraintSystemRef<Fr>,
    x: Variable,
    value: Option<Fr>,
) -> Result<(), SynthesisError> {
    let t_val = value.map(|v| v * (v - Fr::one()));
    let t = cs.new_witness_variable(|| assigned(t_val))?;
    cs.enforce_constraint(lc!() + x, lc!() + x - Variable::One, lc!() + t)?;
    cs.enforce_constraint(lc!() + t, lc!() + x - (Fr::from(2u64), Variable::One), lc!())
}

/// Returns `out` with `out = 1` iff the combination is zero.
fn is_zero(
    cs: &ConstraintSystemRef<Fr>,
    value_lc: LinearCombination<Fr>,
    value: Option<Fr>,
) -> Result<Variable, SynthesisError> {
    let inv = cs.new_witness_variable(|| Ok(assigned(value)?.inverse().unwrap_or_else(Fr::zero)))?;
    let out = cs.new_witness_variable(|| {
        Ok(if assigned(value)?.is_zero() {
            Fr::one()
        } else {
            Fr::zero()
        })
    })?;
    cs.enforce_constraint(value_lc.clone(), lc!() + inv, lc!() + Variable::One - out)?;
    cs.enforce_constraint(value_lc, lc!() + out, lc!())?;
    Ok(out)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsZeroConstraints {
    /// `in·inv = 1 - out` and `in·out = 0`.
    Complete,
    /// Only `in·inv = 1 - out`. `out = 1` with `inv = 0` then satisfies it
    /// for any input.
    MissingOutputCheck,
}

#[derive(Clone, Copy, Debug)]
pub struct IsZeroWitness {
    pub input: Fr,
    pub inv: Fr,
    pub out: Fr,
}

impl IsZeroWitness {
    pub fn honest(input: Fr) -> Self {
        let (inv, out) = match input.inverse() {
            Some(inv) => (inv, Fr::zero()),
            None => (Fr::zero(), Fr::one()),
        };
        Self { input, inv, out }
    }

    /// Claims `out = 1` for a non-zero input.
    pub fn forged(input: Fr) -> Self {
        Self {
            input,
            inv: Fr::zero(),
            out: Fr::one(),
        }
    }
}

/// `out` public, `in` private.
#[derive(Clone)]
pub struct IsZero {
    pub constraints: IsZeroConstraints,
    pub witness: Option<IsZeroWitness>,
}

impl ConstraintSynthesizer<Fr> for IsZero {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let w = self.witness;
        let out = cs.new_input_variable(|| Ok(assigned(w)?.out))?;
        let input = cs.new_witness_variable(|| Ok(assigned(w)?.input))?;
        let inv = cs.new_witness_variable(|| Ok(assigned(w)?.inv))?;
        cs.enforce_constraint(lc!() + input, lc!() + inv, lc!() + Variable::One - out)?;
        if self.constraints == IsZeroConstraints::Complete {
            cs.enforce_constraint(lc!() + input, lc!() + out, lc!())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;

    fn satisfied<C: ConstraintSynthesizer<Fr>>(circuit: C) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn advent_scores_sample_game() {
        let rounds = [(0, 1), (1, 0), (2, 2)];
        assert_eq!(Advent2::score(&rounds), 15);
        assert!(satisfied(Advent2 {
            rounds: Some(rounds)
        }));
    }

    #[test]
    fn advent_rejects_out_of_range_move() {
        assert!(!satisfied(Advent2 {
            rounds: Some([(0, 3), (1, 0), (2, 2)])
        }));
    }

    #[test]
    fn forged_is_zero_witness_only_fits_the_weak_circuit() {
        let forged = Some(IsZeroWitness::forged(Fr::from(5u64)));
        assert!(satisfied(IsZero {
            constraints: IsZeroConstraints::MissingOutputCheck,
            witness: forged,
        }));
        assert!(!satisfied(IsZero {
            constraints: IsZeroConstraints::Complete,
            witness: forged,
        }));
    }
}
