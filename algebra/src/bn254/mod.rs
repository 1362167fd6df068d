/// The number of bytes for a scalar value over BN254.
pub const BN254_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

#[cfg(test)]
mod bn254_groups_test {
    use crate::{
        bn254::{BN254Gt, BN254PairingEngine, BN254Scalar, BN254G1, BN254G2},
        prelude::*,
        traits::group_tests::{run_multiexp_test, test_scalar_operations, test_scalar_serialization},
    };
    use sha2::{Digest, Sha512};

    #[test]
    fn test_scalar_ops() {
        test_scalar_operations::<BN254Scalar>();
    }

    #[test]
    fn scalar_deser() {
        test_scalar_serialization::<BN254Scalar>();
    }

    #[test]
    fn scalar_from_to_bytes() {
        let small_value = BN254Scalar::from(165747u32);
        let small_value_bytes = small_value.to_bytes();
        let expected_small_value_bytes: [u8; 32] = [
            115, 135, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(small_value_bytes, expected_small_value_bytes);

        let small_value_from_bytes = BN254Scalar::from_bytes(&small_value_bytes).unwrap();
        assert_eq!(small_value_from_bytes, small_value);
    }

    #[test]
    fn modulus_wraps_to_zero() {
        let q = BN254Scalar::get_field_size_biguint();
        assert_eq!(BN254Scalar::from(&q), BN254Scalar::zero());
        assert_eq!(BN254Scalar::capacity(), 253);

        let minus_one = BN254Scalar::one().neg();
        assert_eq!(minus_one.into_biguint() + 1u32, q);
    }

    #[test]
    fn hash_to_scalar_is_deterministic() {
        let mut h1 = Sha512::default();
        h1.update(b"zksok");
        let mut h2 = Sha512::default();
        h2.update(b"zksok");
        assert_eq!(BN254Scalar::from_hash(h1), BN254Scalar::from_hash(h2));
    }

    #[test]
    fn multiexp() {
        run_multiexp_test::<BN254G1>();
        run_multiexp_test::<BN254G2>();
    }

    #[test]
    fn hard_coded_group_elements() {
        let base_gt = BN254Gt::get_base();
        let expected_base = BN254PairingEngine::pairing(&BN254G1::get_base(), &BN254G2::get_base());
        assert_eq!(base_gt, expected_base);
    }

    #[test]
    fn bilinear_properties() {
        let identity_g1 = BN254G1::get_identity();
        let identity_g2 = BN254G2::get_identity();
        let identity_gt_computed = BN254PairingEngine::pairing(&identity_g1, &identity_g2);
        assert_eq!(BN254Gt::get_identity(), identity_gt_computed);

        let mut prng = test_rng();

        let s1 = BN254Scalar::from(50 + prng.next_u32() % 50);
        let s2 = BN254Scalar::from(50 + prng.next_u32() % 50);

        let base_g1 = BN254G1::get_base();
        let base_g2 = BN254G2::get_base();

        let s1_base_g1 = base_g1.mul(&s1);
        let s2_base_g2 = base_g2.mul(&s2);

        let gt_mapped_element = BN254PairingEngine::pairing(&s1_base_g1, &s2_base_g2);
        let gt_base = BN254Gt::get_base();

        assert_eq!(
            gt_mapped_element,
            BN254PairingEngine::pairing(&base_g1, &s2_base_g2).mul(&s1)
        );
        assert_eq!(
            gt_mapped_element,
            BN254PairingEngine::pairing(&s1_base_g1, &base_g2).mul(&s2)
        );
        assert_eq!(gt_mapped_element, gt_base.mul(&s1).mul(&s2));
    }

    #[test]
    fn product_of_pairings_cancels() {
        let mut prng = test_rng();
        let s = BN254Scalar::random(&mut prng);
        let a = BN254G1::get_base().mul(&s);
        let b = BN254G2::get_base();

        // e(sG, H) * e(-G, sH) == 1
        let res = BN254PairingEngine::product_of_pairings(
            &[a, BN254G1::get_base().neg()],
            &[b, b.mul(&s)],
        );
        assert_eq!(res, BN254Gt::get_identity());
    }

    #[test]
    fn test_serialization_of_points() {
        let mut prng = test_rng();

        let g1 = BN254G1::random(&mut prng);
        let g1_bytes = g1.to_compressed_bytes();
        assert_eq!(g1_bytes.len(), BN254G1::COMPRESSED_LEN);
        assert_eq!(g1, BN254G1::from_compressed_bytes(&g1_bytes).unwrap());
        assert_eq!(
            g1,
            BN254G1::from_unchecked_bytes(&g1.to_unchecked_bytes()).unwrap()
        );

        let g2 = BN254G2::random(&mut prng);
        let g2_bytes = g2.to_compressed_bytes();
        assert_eq!(g2_bytes.len(), BN254G2::COMPRESSED_LEN);
        assert_eq!(g2, BN254G2::from_compressed_bytes(&g2_bytes).unwrap());

        let gt = BN254Gt::random(&mut prng);
        let gt_bytes = gt.to_compressed_bytes();
        assert_eq!(gt, BN254Gt::from_compressed_bytes(&gt_bytes).unwrap());

        assert!(BN254G1::from_compressed_bytes(&[0xffu8; 32]).is_err());
    }
}
