//! zlib codec for the decimal payload of huge values.
//!
//! The compressed buffer is an in-memory representation only; its exact
//! bytes are not stable across versions or compression levels.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Compress `input` into a complete zlib stream.
pub fn compress(input: &[u8], level: Compression) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(input.len() / 8 + 64), level);
    encoder
        .write_all(input)
        .expect("zlib encoding into a Vec cannot fail");
    encoder
        .finish()
        .expect("zlib encoding into a Vec cannot fail")
}

/// Decompress a complete zlib stream.
///
/// Fails with [`Error::DataCorruption`] on invalid data, on a stream that
/// ends before its end marker, and on bytes trailing the stream.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(input.len().saturating_mul(4).max(64));

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut output, FlushDecompress::None)
            .map_err(|err| Error::corrupted_by("invalid zlib stream", err))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if output.len() == output.capacity() {
                    output.reserve(output.capacity());
                } else if inflater.total_in() as usize == consumed
                    && inflater.total_out() == produced
                {
                    return Err(Error::corrupted(format!(
                        "zlib stream truncated after {} bytes",
                        consumed
                    )));
                }
            }
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != input.len() {
        return Err(Error::corrupted(format!(
            "{} trailing bytes after zlib stream",
            input.len() - consumed
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"" ; "empty")]
    #[test_case(b"0" ; "zero")]
    #[test_case(b"-12345678901234567890" ; "negative")]
    fn inverts_compress(input: &[u8]) {
        let packed = compress(input, Compression::default());
        assert_eq!(decompress(&packed).unwrap(), input);
    }

    #[test]
    fn repetitive_digits_shrink() {
        let digits = format!("1{}", "0".repeat(100_000));
        let packed = compress(digits.as_bytes(), Compression::default());
        assert!(packed.len() < 1_000, "packed to {} bytes", packed.len());
        assert_eq!(decompress(&packed).unwrap(), digits.as_bytes());
    }

    #[test]
    fn every_level_round_trips() {
        let digits = "31415926535897932384626433832795028841971".repeat(50);
        for level in 0..=9 {
            let packed = compress(digits.as_bytes(), Compression::new(level));
            assert_eq!(decompress(&packed).unwrap(), digits.as_bytes(), "level {}", level);
        }
    }

    #[test]
    fn high_ratio_payload_round_trips() {
        let digits = format!("1{}", "0".repeat(1_000_000));
        let packed = compress(digits.as_bytes(), Compression::best());
        assert!(digits.len() / packed.len() > 500, "ratio {}", digits.len() / packed.len());
        assert_eq!(decompress(&packed).unwrap(), digits.as_bytes());
    }

    #[test_case(200 ; "two hundred")]
    #[test_case(1_000 ; "one thousand")]
    #[test_case(100_000 ; "hundred thousand")]
    fn output_grows_past_initial_capacity(zeros: usize) {
        let digits = format!("1{}", "0".repeat(zeros));
        let packed = compress(digits.as_bytes(), Compression::default());
        assert_eq!(decompress(&packed).unwrap().len(), zeros + 1);
    }

    #[test]
    fn garbage_is_corruption() {
        let err = decompress(b"definitely not zlib").unwrap_err();
        assert_eq!(err.category(), "data_corruption");
    }

    #[test]
    fn truncation_is_corruption() {
        let digits = "27182818284590452353602874713526624977572".repeat(100);
        let packed = compress(digits.as_bytes(), Compression::default());
        for cut in [1, packed.len() / 2, packed.len() - 1] {
            let err = decompress(&packed[..cut]).unwrap_err();
            assert_eq!(err.category(), "data_corruption", "cut at {}", cut);
        }
    }

    #[test]
    fn trailing_bytes_are_corruption() {
        let mut packed = compress(b"42", Compression::default());
        packed.extend_from_slice(b"junk");
        assert!(matches!(
            decompress(&packed),
            Err(Error::DataCorruption { .. })
        ));
    }
}
