// tests/property_split_invariance_test.rs

//! Property-based tests for the line decoder: however TCP fragments the
//! byte stream, reassembly must produce the same lines.

use bytes::BytesMut;
use proptest::prelude::*;
use tokio_util::codec::Decoder;
use windbridge::core::LineFrameCodec;

/// Feeds `data` to a fresh decoder in the given chunk sizes (any remainder
/// arrives as one final chunk) and collects every decoded line.
fn decode_in_chunks(data: &[u8], chunk_sizes: &[usize]) -> Vec<String> {
    let mut codec = LineFrameCodec;
    let mut buf = BytesMut::new();
    let mut lines = Vec::new();
    let mut offset = 0;
    let mut chunk = 0;
    while offset < data.len() {
        let take = match chunk_sizes.get(chunk) {
            Some(&size) => size.min(data.len() - offset),
            None => data.len() - offset,
        };
        chunk += 1;
        buf.extend_from_slice(&data[offset..offset + take]);
        offset += take;
        while let Some(line) = codec.decode(&mut buf).unwrap() {
            lines.push(line);
        }
    }
    lines
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_decoding_is_split_invariant(
        lines in prop::collection::vec("[ -~]{0,40}", 0..8),
        chunk_sizes in prop::collection::vec(1usize..16, 0..64),
    ) {
        let mut stream = String::new();
        for line in &lines {
            stream.push_str(line);
            stream.push('\n');
        }

        let whole = decode_in_chunks(stream.as_bytes(), &[]);
        let chunked = decode_in_chunks(stream.as_bytes(), &chunk_sizes);
        prop_assert_eq!(&whole, &chunked);

        let expected: Vec<String> = lines.iter().map(|l| l.trim().to_string()).collect();
        prop_assert_eq!(whole, expected);
    }

    #[test]
    fn test_trailing_partial_line_is_never_yielded(
        head in "[ -~]{0,40}",
        tail in "[ -~]{1,40}",
    ) {
        let stream = format!("{head}\n{tail}");
        let lines = decode_in_chunks(stream.as_bytes(), &[]);
        prop_assert_eq!(lines, vec![head.trim().to_string()]);
    }
}
