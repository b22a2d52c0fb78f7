//! End-to-end behaviour of every catalog dialect.

use vnlz_lzss::{
    DecodeMode, Dialect, DialectTable, LzError, MatchingEncoder, SizePrefix,
    SlidingWindowDecoder, Token, decode, decode_exact, decode_prefixed, decode_strict, encode,
    encode_prefixed, lookup,
};
use vnlz_core::traits::Decompress;

mod samples {
    pub fn text(size: usize) -> Vec<u8> {
        let text = b"Sakura petals fall on the school roof. \
                     She said she would wait under the tree. \
                     The bell rings; the bell rings again. ";
        text.iter().copied().cycle().take(size).collect()
    }

    pub fn binary(size: usize) -> Vec<u8> {
        let mut seed: u64 = 0x0DDC_0FFE_E0DD_F00D;
        (0..size)
            .map(|i| {
                if i % 64 < 16 {
                    0
                } else {
                    seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                    (seed >> 40) as u8
                }
            })
            .collect()
    }

    pub fn repetitive(size: usize) -> Vec<u8> {
        b"\x00\x00\xFF\xFF\x80"
            .iter()
            .copied()
            .cycle()
            .take(size)
            .collect()
    }
}

fn literal_stream(table: &DialectTable, literals: &[u8]) -> Vec<u8> {
    let tokens: Vec<Token> = literals.iter().map(|&b| Token::Literal(b)).collect();
    MatchingEncoder::new(table).unwrap().write_tokens(&tokens)
}

#[test]
fn msb_cursor1_single_literal() {
    let table = Dialect::MsbCursor1.table();
    let decoded = decode(&[0x80, 0x41], 1, table).unwrap();
    assert_eq!(decoded.as_bytes(), b"A");
    assert_eq!(decoded.produced(), 1);
}

#[test]
fn literal_only_streams_decode_verbatim() {
    let literals = b"literal only, no references at all!";
    for dialect in Dialect::ALL {
        let table = dialect.table();
        let stream = literal_stream(table, literals);
        let decoded = decode(&stream, literals.len(), table).unwrap();
        assert_eq!(decoded.as_bytes(), literals, "{dialect}");
        assert_eq!(decoded.consumed(), stream.len(), "{dialect}");
    }
}

#[test]
fn overlapping_copy_repeats_pattern() {
    // 'A' then distance 1, length 10, written by hand for every byte-aligned dialect
    for dialect in Dialect::ALL {
        let table = dialect.table();
        let length_field = (10 - table.length_bias) as u32;
        let encoder = MatchingEncoder::new(table).unwrap();

        let offset = match table.offset {
            vnlz_lzss::OffsetMode::Absolute => table.initial_cursor as u32,
            vnlz_lzss::OffsetMode::Relative { bias } => 1 - bias as u32,
        };
        let tokens = [
            Token::Literal(b'A'),
            Token::Match {
                offset,
                length: length_field,
            },
        ];
        let stream = encoder.write_tokens(&tokens);
        let decoded = decode(&stream, 11, table).unwrap();
        assert_eq!(decoded.as_bytes(), b"AAAAAAAAAAA", "{dialect}");
    }
}

#[test]
fn frame_wraparound() {
    for dialect in Dialect::ALL {
        let table = dialect.table();
        let data = samples::text(table.frame_size * 3 + 17);
        let packed = encode(&data, table).unwrap();
        let out = decode_exact(&packed, data.len(), table).unwrap();
        assert_eq!(out, data, "{dialect}");
    }
}

#[test]
fn roundtrip_every_dialect() {
    let inputs = [
        samples::text(5000),
        samples::binary(3000),
        samples::repetitive(2000),
        Vec::new(),
        vec![0x42],
    ];
    for dialect in Dialect::ALL {
        let table = dialect.table();
        for data in &inputs {
            let packed = encode(data, table).unwrap();
            let decoded = decode_strict(&packed, data.len(), table).unwrap();
            assert_eq!(decoded.as_bytes(), &data[..], "{dialect} len {}", data.len());
        }
    }
}

#[test]
fn repetitive_input_compresses() {
    let data = samples::repetitive(4096);
    for dialect in Dialect::ALL {
        let packed = encode(&data, dialect.table()).unwrap();
        assert!(packed.len() < data.len() / 4, "{dialect}: {}", packed.len());
    }
}

#[test]
fn zero_target_is_empty() {
    for dialect in Dialect::ALL {
        let decoded = decode(&[0xFF, 0xFF, 0xFF], 0, dialect.table()).unwrap();
        assert_eq!(decoded.produced(), 0);
        assert_eq!(decoded.consumed(), 0);
        assert!(decoded.padded().is_empty());
    }
}

#[test]
fn output_stops_at_target_length() {
    let table = Dialect::OkumuraZero.table();
    let data = samples::text(300);
    let packed = encode(&data, table).unwrap();
    let decoded = decode(&packed, 100, table).unwrap();
    assert_eq!(decoded.as_bytes(), &data[..100]);
    assert!(decoded.consumed() < packed.len());
}

#[test]
fn truncated_input_lenient_and_strict() {
    let table = Dialect::Lz10.table();
    let data = samples::text(800);
    let packed = encode(&data, table).unwrap();
    let cut = &packed[..packed.len() / 2];

    let partial = decode(cut, data.len(), table).unwrap();
    assert!(partial.produced() < data.len());
    assert_eq!(partial.as_bytes(), &data[..partial.produced()]);
    assert_eq!(partial.padded().len(), data.len());

    match decode_strict(cut, data.len(), table) {
        Err(LzError::TruncatedInput { produced, expected }) => {
            assert_eq!(produced, partial.produced());
            assert_eq!(expected, data.len());
        }
        other => panic!("expected truncation, got {other:?}"),
    }
}

#[test]
fn reference_before_history_is_invalid_token() {
    for dialect in [Dialect::Shin, Dialect::KidBe] {
        let table = dialect.table();
        let stream = MatchingEncoder::new(table).unwrap().write_tokens(&[
            Token::Literal(b'x'),
            // distance 3 with only one byte written
            Token::Match {
                offset: 2,
                length: 0,
            },
        ]);
        let err = decode(&stream, 8, table).unwrap_err();
        assert!(
            matches!(
                err,
                LzError::InvalidToken {
                    position: 1,
                    defined: 1,
                    ..
                }
            ),
            "{dialect}: {err}"
        );
    }
}

#[test]
fn terminators_end_the_stream() {
    let table = Dialect::Cursor1Term.table();
    let packed = encode(b"short", table).unwrap();
    let decoded = decode(&packed, 64, table).unwrap();
    assert_eq!(decoded.as_bytes(), b"short");
    assert!(decoded.terminated());
    assert_eq!(decoded.consumed(), packed.len());
    assert!(matches!(
        decode_strict(&packed, 64, table),
        Err(LzError::TruncatedInput { produced: 5, .. })
    ));

    let table = Dialect::Packed13.table();
    let packed = encode(b"bit packed", table).unwrap();
    let decoded = decode(&packed, 64, table).unwrap();
    assert_eq!(decoded.as_bytes(), b"bit packed");
    assert!(decoded.terminated());
}

#[test]
fn zero_count_is_not_special_without_terminator() {
    // msb-cursor1: length field 0 is a plain 3-byte copy
    let table = Dialect::MsbCursor1.table();
    let stream = MatchingEncoder::new(table).unwrap().write_tokens(&[
        Token::Literal(b'q'),
        Token::Match {
            offset: 1,
            length: 0,
        },
    ]);
    let decoded = decode(&stream, 4, table).unwrap();
    assert_eq!(decoded.as_bytes(), b"qqqq");
    assert!(!decoded.terminated());
}

#[test]
fn graded_fill_is_referencable() {
    // 13 copies of 0x05 start at 5 * 13
    let table = Dialect::OkumuraGraded.table();
    let stream = MatchingEncoder::new(table).unwrap().write_tokens(&[Token::Match {
        offset: 5 * 13,
        length: 10,
    }]);
    let decoded = decode(&stream, 13, table).unwrap();
    assert_eq!(decoded.as_bytes(), &[5u8; 13]);
}

#[test]
fn fc0_fill_stops_at_cursor() {
    // spaces below 0xFC0, zeros from the cursor up
    let table = Dialect::OkumuraFc0.table();
    let stream = MatchingEncoder::new(table).unwrap().write_tokens(&[
        Token::Match {
            offset: 0xFC1,
            length: 0,
        },
        Token::Match {
            offset: 0,
            length: 0,
        },
    ]);
    let decoded = decode_strict(&stream, 6, table).unwrap();
    assert_eq!(decoded.as_bytes(), b"\0\0\0   ");
}

#[test]
fn unknown_tag_is_unsupported() {
    assert!(matches!(
        lookup("arc4"),
        Err(LzError::UnsupportedDialect { .. })
    ));
    assert!(SlidingWindowDecoder::for_tag("arc4").is_err());
}

#[test]
fn broken_table_is_invalid_dialect() {
    let mut table = Dialect::Okumura.table().clone();
    table.frame_size = 3000;
    assert!(matches!(
        decode(&[0xFF, 0x00], 1, &table),
        Err(LzError::InvalidDialect { .. })
    ));
    assert!(matches!(
        encode(b"abc", &table),
        Err(LzError::InvalidDialect { .. })
    ));
}

#[test]
fn custom_dialect_from_json() {
    let json = r#"{
        "name": "custom-lsb",
        "frame_size": 4096,
        "initial_cursor": 4078,
        "initial_fill": { "kind": "byte", "value": 0, "len": 4078 },
        "control": { "order": "lsb-first", "cadence": "counted", "literal_bit": true },
        "token": {
            "kind": "word", "bytes": 2, "endian": "little",
            "offset_shift": 4, "offset_bits": 12, "length_shift": 0, "length_bits": 4
        },
        "offset": { "kind": "absolute" },
        "min_match": 3,
        "length_bias": 3
    }"#;
    let table: DialectTable = serde_json::from_str(json).unwrap();
    table.validate().unwrap();
    assert_eq!(table.terminator, vnlz_lzss::Terminator::None);

    let data = samples::text(2000);
    let packed = encode(&data, &table).unwrap();
    assert_eq!(decode_exact(&packed, data.len(), &table).unwrap(), data);
}

#[test]
fn catalog_tables_survive_json() {
    for dialect in Dialect::ALL {
        let json = serde_json::to_string(dialect.table()).unwrap();
        let back: DialectTable = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, dialect.table());
    }
}

#[test]
fn prefixed_container() {
    let data = samples::binary(1500);
    let packed = encode_prefixed(&data, SizePrefix::Be32, Dialect::HotelDusk.table()).unwrap();
    assert_eq!(&packed[..4], &(data.len() as u32).to_be_bytes());

    let decoded = decode_prefixed(
        &packed,
        SizePrefix::Be32,
        Dialect::HotelDusk.table(),
        DecodeMode::Strict,
    )
    .unwrap();
    assert_eq!(decoded.into_vec(), data);
}

#[test]
fn decoder_through_trait_object() {
    let decoder = SlidingWindowDecoder::for_tag("shin")
        .unwrap()
        .with_mode(DecodeMode::Strict);
    let dynamic: &dyn Decompress = &decoder;
    let packed = encode(b"abcabcabc", decoder.table()).unwrap();
    assert_eq!(dynamic.decode_exact(&packed, 9).unwrap(), b"abcabcabc");
}
