use rand_chacha::{
    rand_core::{CryptoRng, RngCore, SeedableRng},
    ChaChaRng,
};

/// The seed `test_rng` falls back to when it has to be reproducible.
pub const TEST_RNG_SEED: u64 = 0x7a6b_736f_6b31;

/// A ChaCha20 stream fixed by `seed`. Only for tests and benches.
pub fn test_rng_seeded(seed: u64) -> ChaChaRng {
    ChaChaRng::seed_from_u64(seed)
}

/// Should be used only for tests, not for any real world usage.
#[cfg(not(feature = "std"))]
pub fn test_rng() -> impl RngCore + CryptoRng {
    test_rng_seeded(TEST_RNG_SEED)
}

/// Should be used only for tests, not for any real world usage.
///
/// Fresh entropy on every call, unless `DETERMINISTIC_TEST_RNG=1` in which case every call
/// returns `test_rng_seeded(TEST_RNG_SEED)`.
#[cfg(feature = "std")]
pub fn test_rng() -> impl RngCore + CryptoRng {
    if deterministic_from_env() {
        test_rng_seeded(TEST_RNG_SEED)
    } else {
        ChaChaRng::from_entropy()
    }
}

#[cfg(feature = "std")]
fn deterministic_from_env() -> bool {
    matches!(std::env::var("DETERMINISTIC_TEST_RNG").as_deref(), Ok("1"))
}

#[cfg(test)]
mod test {
    use super::{test_rng_seeded, TEST_RNG_SEED};
    use ark_std::UniformRand;

    #[test]
    fn seeded_streams_repeat() {
        let a = u128::rand(&mut test_rng_seeded(TEST_RNG_SEED));
        let b = u128::rand(&mut test_rng_seeded(TEST_RNG_SEED));
        assert_eq!(a, b);

        let c = u128::rand(&mut test_rng_seeded(TEST_RNG_SEED + 1));
        assert_ne!(a, c);
    }

    #[cfg(feature = "std")]
    #[test]
    fn entropy_streams_differ() {
        if super::deterministic_from_env() {
            return;
        }
        let a = u128::rand(&mut super::test_rng());
        let b = u128::rand(&mut super::test_rng());
        assert_ne!(a, b);
    }
}
