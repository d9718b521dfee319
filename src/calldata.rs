//! Decoding of the positional `[a, b, c, inputs]` tuple that
//! `snarkjs zkey export soliditycalldata` emits (`solidity-args.json`).

use crate::types::{G1Point, G2Point, Proof, ProofCalldata, Word};
use crate::utils::{parse_word, u64_to_word};
use crate::verifier::VerifyError;
use alloc::{format, vec::Vec};
use serde_json::Value;

impl ProofCalldata {
    /// Shape errors (wrong arity, non-array where an array belongs, a value
    /// that is not a uint256) are errors here. Range and curve checks are
    /// left to [`crate::Groth16Verifier::verify`].
    pub fn from_solidity_args(args: &[Value]) -> Result<Self, VerifyError> {
        let [a, b, c, inputs] = args else {
            return Err(VerifyError::InvalidCalldata(format!(
                "expected 4 positional arguments, found {}",
                args.len()
            )));
        };

        let a = g1(a, "a")?;
        let b = {
            let [x, y] = array::<2>(b, "b")?;
            let [x1, x0] = array::<2>(x, "b[0]")?;
            let [y1, y0] = array::<2>(y, "b[1]")?;
            G2Point {
                x: [word(x1, "b[0][0]")?, word(x0, "b[0][1]")?],
                y: [word(y1, "b[1][0]")?, word(y0, "b[1][1]")?],
            }
        };
        let c = g1(c, "c")?;

        let Value::Array(inputs) = inputs else {
            return Err(VerifyError::InvalidCalldata("inputs: expected an array".into()));
        };
        let public_inputs = inputs
            .iter()
            .map(|v| word(v, "inputs"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProofCalldata {
            proof: Proof { a, b, c },
            public_inputs,
        })
    }
}

fn array<'a, const N: usize>(value: &'a Value, at: &str) -> Result<&'a [Value; N], VerifyError> {
    match value {
        Value::Array(items) => <&[Value; N]>::try_from(items.as_slice()).map_err(|_| {
            VerifyError::InvalidCalldata(format!(
                "{at}: expected {N} elements, found {}",
                items.len()
            ))
        }),
        _ => Err(VerifyError::InvalidCalldata(format!("{at}: expected an array"))),
    }
}

fn g1(value: &Value, at: &str) -> Result<G1Point, VerifyError> {
    let [x, y] = array::<2>(value, at)?;
    Ok(G1Point {
        x: word(x, at)?,
        y: word(y, at)?,
    })
}

fn word(value: &Value, at: &str) -> Result<Word, VerifyError> {
    let parsed = match value {
        Value::String(s) => parse_word(s),
        Value::Number(n) => n.as_u64().map(u64_to_word),
        _ => None,
    };
    parsed.ok_or_else(|| VerifyError::InvalidCalldata(format!("{at}: not a uint256")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zero() -> Value {
        json!("0x0000000000000000000000000000000000000000000000000000000000000000")
    }

    #[test]
    fn g2_words_stay_in_evm_order() {
        let args = json!([
            ["0x1", "0x2"],
            [["0x3", "0x4"], ["0x5", "0x6"]],
            ["0x7", "0x8"],
            ["0x9"]
        ]);
        let calldata = ProofCalldata::from_solidity_args(args.as_array().unwrap()).unwrap();
        assert_eq!(calldata.proof.b.x, [u64_to_word(3), u64_to_word(4)]);
        assert_eq!(calldata.proof.b.y, [u64_to_word(5), u64_to_word(6)]);
        assert_eq!(calldata.public_inputs, vec![u64_to_word(9)]);
    }

    #[test]
    fn wrong_arity_is_an_error() {
        let args = vec![json!([zero(), zero()]), json!([]), json!([zero(), zero()])];
        assert!(matches!(
            ProofCalldata::from_solidity_args(&args),
            Err(VerifyError::InvalidCalldata(_))
        ));
    }

    #[test]
    fn non_numeric_word_is_an_error() {
        let args = json!([
            ["0x1", "0x2"],
            [["0x3", "0x4"], ["0x5", "0x6"]],
            ["0x7", "0x8"],
            ["not a number"]
        ]);
        assert!(ProofCalldata::from_solidity_args(args.as_array().unwrap()).is_err());
    }

    #[test]
    fn out_of_range_word_still_decodes() {
        let max = json!(format!("0x{}", "ff".repeat(32)));
        let args = vec![
            json!([max.clone(), max.clone()]),
            json!([[zero(), zero()], [zero(), zero()]]),
            json!([zero(), zero()]),
            json!([max]),
        ];
        let calldata = ProofCalldata::from_solidity_args(&args).unwrap();
        assert_eq!(calldata.public_inputs, vec![[0xff; 32]]);
    }
}
