use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::SnapshotError;

pub fn encode<T>(value: &T) -> Result<Vec<u8>, SnapshotError>
where
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    rkyv::to_bytes::<Error>(value)
        .map(|bytes| bytes.into_vec())
        .map_err(|_| SnapshotError::Encode)
}

/// Validates the archive before deserializing, so truncated or foreign bytes
/// fail instead of panicking. Input is copied into an aligned buffer first
/// since storage round trips do not preserve alignment.
pub fn decode<T>(bytes: &[u8]) -> Result<T, SnapshotError>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<T, Error>(&aligned).map_err(|_| SnapshotError::Decode)
}
