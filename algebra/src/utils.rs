use crate::prelude::*;
use ark_std::{string::String, vec::Vec};
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use digest::generic_array::typenum::U64;
use digest::Digest;
use rand_chacha::ChaCha20Rng;

const BASE64_PADDING_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const BASE64_ENGINE: GeneralPurpose = GeneralPurpose::new(&URL_SAFE, BASE64_PADDING_CONFIG);

/// Convert an 8 byte array (little-endian) into a u64
pub fn u8_le_slice_to_u64(slice: &[u8]) -> u64 {
    let mut a = [0u8; 8];
    a.copy_from_slice(slice);
    u64::from_le_bytes(a)
}

/// Convert a slice into a u32 (little-endian)
pub fn u8_le_slice_to_u32(slice: &[u8]) -> u32 {
    let mut a = [0u8; 4];
    a.copy_from_slice(slice);
    u32::from_le_bytes(a)
}

/// Compute the minimum power of two that is greater or equal to the input
pub fn min_greater_equal_power_of_two(n: usize) -> usize {
    if n <= 1 {
        n
    } else {
        n.next_power_of_two()
    }
}

/// Convert the input into the base64 encoding
pub fn b64enc<T: ?Sized + AsRef<[u8]>>(input: &T) -> String {
    BASE64_ENGINE.encode(input)
}

/// Reconstruct from the base64 encoding
pub fn b64dec<T: ?Sized + AsRef<[u8]>>(input: &T) -> Result<Vec<u8>> {
    BASE64_ENGINE
        .decode(input)
        .map_err(|_| AlgebraError::DeserializationError)
}

/// Derive a ChaCha20Rng PRNG from a digest from a hash function
pub fn derive_prng_from_hash<D>(hash: D) -> ChaCha20Rng
where
    D: Digest<OutputSize = U64> + Default,
{
    const SEED_SIZE: usize = 32;
    let mut seed: [u8; SEED_SIZE] = [0; SEED_SIZE];
    let result = hash.finalize();
    seed.copy_from_slice(&result[0..SEED_SIZE]);
    ChaCha20Rng::from_seed(seed)
}

/// Split off a length-prefixed chunk: a little-endian u32 length followed by that many bytes.
pub fn read_length_prefixed(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    if bytes.len() < 4 {
        return Err(AlgebraError::DeserializationError);
    }
    let len = u8_le_slice_to_u32(&bytes[0..4]) as usize;
    let rest = &bytes[4..];
    if rest.len() < len {
        return Err(AlgebraError::DeserializationError);
    }
    Ok(rest.split_at(len))
}

/// Append a little-endian u32 length prefix followed by the payload.
pub fn write_length_prefixed(out: &mut Vec<u8>, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| AlgebraError::SerializationError)?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

#[cfg(test)]
mod test {
    use ark_std::vec;

    #[test]
    fn min_greater_equal_power_of_two() {
        assert_eq!(16, super::min_greater_equal_power_of_two(16));
        assert_eq!(16, super::min_greater_equal_power_of_two(15));
        assert_eq!(16, super::min_greater_equal_power_of_two(9));
        assert_eq!(8, super::min_greater_equal_power_of_two(8));
        assert_eq!(8, super::min_greater_equal_power_of_two(5));
        assert_eq!(4, super::min_greater_equal_power_of_two(3));
        assert_eq!(2, super::min_greater_equal_power_of_two(2));
        assert_eq!(1, super::min_greater_equal_power_of_two(1));
        assert_eq!(0, super::min_greater_equal_power_of_two(0));
    }

    #[test]
    fn length_prefix() {
        let mut out = vec![];
        super::write_length_prefixed(&mut out, &[7, 8, 9]).unwrap();
        out.push(42);
        assert_eq!(out[..4], [3, 0, 0, 0]);

        let (chunk, rest) = super::read_length_prefixed(&out).unwrap();
        assert_eq!(chunk, &[7, 8, 9]);
        assert_eq!(rest, &[42]);

        assert!(super::read_length_prefixed(&out[..5]).is_err());
        assert!(super::read_length_prefixed(&[1, 0]).is_err());
    }

    #[test]
    fn b64_round_trip() {
        let data = vec![0u8, 1, 2, 250, 251];
        let s = super::b64enc(&data);
        assert_eq!(super::b64dec(&s).unwrap(), data);
        assert!(super::b64dec("not base64!").is_err());
    }
}
