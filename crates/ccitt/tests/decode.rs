use ccitt_t4_t6::{
    bits::BitWriter, decode, try_decode, Coding, Color, DecodeParams, FaxError, FillOrder,
    MAX_BITMAP_BYTES, MAX_COLUMNS,
};

const EOL: &str = "000000000001";

fn stream(codes: &[&str]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    for code in codes {
        writer.write_code(code);
    }
    writer.done()
}

fn params(columns: usize, rows: usize, k: i32) -> DecodeParams {
    DecodeParams {
        columns,
        rows,
        k,
        black_is_1: true,
        ..DecodeParams::default()
    }
}

/// Run lengths of a row, starting with white
fn runs(bitmap: &ccitt_t4_t6::Bitmap, y: usize) -> Vec<usize> {
    let mut runs = vec![0];
    let mut color = Color::White;
    for x in 0..bitmap.width() {
        let c = bitmap.color(x, y);
        if c != color {
            runs.push(0);
            color = c;
        }
        if let Some(last) = runs.last_mut() {
            *last += 1;
        }
    }
    runs
}

#[test]
fn group3_1d_row() {
    let data = stream(&[EOL, "0111", "10", "01000"]);
    let bitmap = decode(&data, &params(16, 1, 0)).unwrap();
    assert_eq!(bitmap.height(), 1);
    assert_eq!(runs(&bitmap, 0), [2, 3, 11]);
    assert_eq!(bitmap.as_bytes(), &[0b0011_1000, 0]);
}

#[test]
fn inverted_output() {
    let data = stream(&[EOL, "0111", "10", "01000"]);
    let params = DecodeParams {
        black_is_1: false,
        ..params(16, 1, 0)
    };
    let bitmap = decode(&data, &params).unwrap();
    assert!(!bitmap.black_is_1());
    assert_eq!(bitmap.as_bytes(), &[0b1100_0111, 0xff]);
    assert_eq!(runs(&bitmap, 0), [2, 3, 11]);
}

#[test]
fn group3_grows_without_rows() {
    let row = ["0111", "10", "1000"];
    let data = stream(&[&row[..], &row[..], &row[..]].concat());
    let bitmap = decode(&data, &params(8, 0, 0)).unwrap();
    assert_eq!(bitmap.height(), 3);
    for y in 0..3 {
        assert_eq!(runs(&bitmap, y), [2, 3, 3]);
    }
}

#[test]
fn group4_eofb() {
    // one row, then three copies of it
    let data = stream(&[
        "001", "0111", "10", "1", "111", "111", "111", "000000000001000000000001",
    ]);
    let bitmap = decode(&data, &params(8, 0, -1)).unwrap();
    assert_eq!(bitmap.height(), 4);
    for y in 0..4 {
        assert_eq!(bitmap.row(y), &[0b0011_1000]);
    }
}

#[test]
fn group4_fixed_rows_stay_white() {
    let data = stream(&["1"]);
    let bitmap = decode(&data, &params(8, 5, -1)).unwrap();
    assert_eq!(bitmap.height(), 5);
    assert!(bitmap.as_bytes().iter().all(|b| *b == 0));
}

#[test]
fn reversed_fill_order() {
    // "001 0111 10 1" with the bits of each byte reversed
    let data = [0b1111_0100, 0b0000_0010];
    let params = DecodeParams {
        fill_order: FillOrder::LsbToMsb,
        ..params(8, 1, -1)
    };
    let bitmap = decode(&data, &params).unwrap();
    assert_eq!(bitmap.row(0), &[0b0011_1000]);
}

#[test]
fn single_column() {
    // H, white 0, black 1, then V0 to the end of the internal row
    let data = stream(&["001", "00110101", "010", "1"]);
    let bitmap = decode(&data, &params(1, 1, -1)).unwrap();
    assert_eq!(bitmap.width(), 1);
    assert_eq!(bitmap.as_bytes(), &[0b1000_0000]);
    assert_eq!(bitmap.color(0, 0), Color::Black);
}

#[test]
fn mixed_without_1d_start_falls_back() {
    let data = stream(&[EOL, "0", "1"]);
    let params = params(8, 1, 2);
    let failure = try_decode(&data, &params, params.coding()).unwrap_err();
    assert_eq!(failure.error, FaxError::FirstRowNot1D);
    assert_eq!(failure.rows, 0);

    let bitmap = decode(&data, &params).unwrap();
    assert_eq!(bitmap.height(), 1);
    assert_eq!(bitmap.row(0), &[0]);
}

#[test]
fn mixed_missing_eol() {
    let data = stream(&["0111", "10", "1000"]);
    let failure = try_decode(&data, &params(8, 0, 1), Coding::Group3TwoD { k: 1 }).unwrap_err();
    assert_eq!(failure.error, FaxError::MissingEol { row: 0 });
    assert_eq!(failure.bitmap.height(), 0);
}

#[test]
fn mixed_with_fill_bits() {
    // every EOL ends on a byte boundary
    let data = stream(&[
        "0000", EOL, "1", "0111", "10", "1000", "0", EOL, "0", "111",
    ]);
    let params = DecodeParams {
        encoded_byte_align: true,
        ..params(8, 0, 2)
    };
    let bitmap = decode(&data, &params).unwrap();
    assert_eq!(bitmap.height(), 2);
    assert_eq!(bitmap.row(0), &[0b0011_1000]);
    assert_eq!(bitmap.row(1), &[0b0011_1000]);
}

#[test]
fn invalid_parameters() {
    assert_eq!(decode(&[], &params(0, 1, 0)), Err(FaxError::ZeroColumns));
    assert!(matches!(
        decode(&[], &params(usize::MAX, 2, 0)),
        Err(FaxError::TooLarge { .. })
    ));
    for k in [-1, 0, 1] {
        assert_eq!(
            decode(&[0xff; 8], &params(usize::MAX, 0, k)),
            Err(FaxError::TooLarge {
                columns: usize::MAX,
                rows: 0
            })
        );
    }
    assert!(matches!(
        decode(&[], &params(MAX_COLUMNS + 1, 0, -1)),
        Err(FaxError::TooLarge { .. })
    ));
    assert!(matches!(
        decode(&[], &params(1728, MAX_BITMAP_BYTES, -1)),
        Err(FaxError::TooLarge { .. })
    ));
}
