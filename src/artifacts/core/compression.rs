use crate::error::{Error, Result};
use bytes::Bytes;
use std::io::{Read, Write};

pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).map_err(Error::Compression)?;

    encoder
        .finish()
        .map(Bytes::from)
        .map_err(Error::Compression)
}

pub fn decompress(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(Error::Compression)?;

    Ok(Bytes::from(decompressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_round_trips() {
        let compressed = compress(b"").unwrap();

        assert!(!compressed.is_empty());
        pretty_assertions::assert_eq!(decompress(&compressed).unwrap(), Bytes::new());
    }

    #[test]
    fn garbage_is_a_compression_error() {
        let err = decompress(b"definitely not zlib").unwrap_err();
        assert!(matches!(err, Error::Compression(_)));
    }

    proptest! {
        #[test]
        fn compression_round_trips(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let compressed = compress(&data).unwrap();
            prop_assert_eq!(decompress(&compressed).unwrap().to_vec(), data);
        }
    }
}
