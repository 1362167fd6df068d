use crate::errors::{Groth16Error, Result};
use zksok_algebra::prelude::*;

pub(crate) fn write_point<G: Group>(out: &mut Vec<u8>, point: &G) {
    out.extend(point.to_compressed_bytes());
}

pub(crate) fn write_points<G: Group>(out: &mut Vec<u8>, points: &[G]) -> Result<()> {
    let len = u32::try_from(points.len()).map_err(|_| AlgebraError::SerializationError)?;
    out.extend(len.to_le_bytes());
    for p in points {
        write_point(out, p);
    }
    Ok(())
}

/// Reads compressed points off the front of a byte slice.
pub(crate) struct PointReader<'a> {
    bytes: &'a [u8],
}

impl<'a> PointReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        PointReader { bytes }
    }

    pub(crate) fn point<G: Group>(&mut self) -> Result<G> {
        if self.bytes.len() < G::COMPRESSED_LEN {
            return Err(AlgebraError::DeserializationError.into());
        }
        let (head, tail) = self.bytes.split_at(G::COMPRESSED_LEN);
        self.bytes = tail;
        Ok(G::from_compressed_bytes(head)?)
    }

    pub(crate) fn points<G: Group>(&mut self) -> Result<Vec<G>> {
        if self.bytes.len() < 4 {
            return Err(AlgebraError::DeserializationError.into());
        }
        let len = u8_le_slice_to_u32(&self.bytes[..4]) as usize;
        self.bytes = &self.bytes[4..];
        if len
            .checked_mul(G::COMPRESSED_LEN)
            .map_or(true, |size| size > self.bytes.len())
        {
            return Err(AlgebraError::DeserializationError.into());
        }
        (0..len).map(|_| self.point()).collect()
    }

    /// Fail unless every byte was consumed.
    pub(crate) fn finish(self) -> Result<()> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(Groth16Error::Algebra(AlgebraError::DeserializationError))
        }
    }
}
