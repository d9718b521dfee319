//! Curve decoding, G1 multi-scalar multiplication, and the pairing product check.

use crate::field::{fq_from_be_word, to_be_word};
use crate::types::{G1Point, G2Point};
use ark_bn254::{Bn254, Fq2, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{One, PrimeField};

/// EVM-encoded G1 point → affine. `None` for a coordinate ≥ q, a point off
/// the curve, or one outside the prime-order subgroup. `(0, 0)` is infinity.
pub fn g1_affine(pt: &G1Point) -> Option<G1Affine> {
    if pt.is_infinity() {
        return Some(G1Affine::identity());
    }
    let x = fq_from_be_word(&pt.x)?;
    let y = fq_from_be_word(&pt.y)?;
    let aff = G1Affine::new_unchecked(x, y);
    (aff.is_on_curve() && aff.is_in_correct_subgroup_assuming_on_curve()).then_some(aff)
}

/// EVM-encoded G2 point → affine, same rules as [`g1_affine`]. Words arrive
/// as `[c1, c0]` per coordinate.
pub fn g2_affine(pt: &G2Point) -> Option<G2Affine> {
    if pt.is_infinity() {
        return Some(G2Affine::identity());
    }
    let x = Fq2::new(fq_from_be_word(&pt.x[1])?, fq_from_be_word(&pt.x[0])?);
    let y = Fq2::new(fq_from_be_word(&pt.y[1])?, fq_from_be_word(&pt.y[0])?);
    let aff = G2Affine::new_unchecked(x, y);
    (aff.is_on_curve() && aff.is_in_correct_subgroup_assuming_on_curve()).then_some(aff)
}

pub fn g1_point(aff: &G1Affine) -> G1Point {
    if aff.is_zero() {
        return G1Point::infinity();
    }
    G1Point {
        x: to_be_word(&aff.x),
        y: to_be_word(&aff.y),
    }
}

pub fn g2_point(aff: &G2Affine) -> G2Point {
    if aff.is_zero() {
        return G2Point::infinity();
    }
    G2Point {
        x: [to_be_word(&aff.x.c1), to_be_word(&aff.x.c0)],
        y: [to_be_word(&aff.y.c1), to_be_word(&aff.y.c0)],
    }
}

/// `base + Σ scalars[i]·points[i]`. Lengths are checked by the caller.
pub fn g1_msm(base: &G1Affine, points: &[G1Affine], scalars: &[Fr]) -> G1Affine {
    let mut acc = G1Projective::from(*base);
    for (pt, s) in points.iter().zip(scalars.iter()) {
        acc += G1Projective::from(*pt).mul_bigint(s.into_bigint());
    }
    acc.into_affine()
}

/// `∏ e(g1[i], g2[i]) == 1` in the target group.
pub fn pairing_check(g1: &[G1Affine], g2: &[G2Affine]) -> bool {
    if g1.len() != g2.len() {
        return false;
    }
    let out = Bn254::multi_pairing(g1.iter().copied(), g2.iter().copied());
    out.0.is_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_round_trips_through_evm_encoding() {
        let g1 = G1Affine::generator();
        let g2 = G2Affine::generator();
        assert_eq!(g1_affine(&g1_point(&g1)), Some(g1));
        assert_eq!(g2_affine(&g2_point(&g2)), Some(g2));
    }

    #[test]
    fn off_curve_and_oversized_coordinates_are_rejected() {
        let mut pt = g1_point(&G1Affine::generator());
        pt.y[31] ^= 1;
        assert!(g1_affine(&pt).is_none());

        let oversized = G1Point {
            x: [0xff; 32],
            y: [0xff; 32],
        };
        assert!(g1_affine(&oversized).is_none());
    }

    #[test]
    fn swapped_g2_limbs_do_not_decode() {
        let mut pt = g2_point(&G2Affine::generator());
        pt.x.swap(0, 1);
        pt.y.swap(0, 1);
        assert!(g2_affine(&pt).is_none());
    }

    #[test]
    fn bilinearity_holds_for_negated_pair() {
        let p = G1Affine::generator();
        let q = G2Affine::generator();
        assert!(pairing_check(&[-p, p], &[q, q]));
        assert!(!pairing_check(&[p, p], &[q, q]));
    }
}
