//! # Code tables
//!
//! The run length codes of ITU-T T.4 (Tables 2 and 3) and the
//! two-dimensional mode codes of ITU-T T.4 (Table 4) / T.6 (Table 1).
//!
//! Every code is flattened into an array that is indexed by a fixed-width
//! prefix of the input, so a lookup is a single index operation. Each
//! entry says how many bits of the prefix belong to the code; the caller
//! has to give back the rest.
//!
//! | Table            | Prefix                           | Bits |
//! |------------------|----------------------------------|------|
//! | [`WHITE`]        | start of a white run code        | 10   |
//! | [`BLACK_SHORT`]  | start of a black run code        | 4    |
//! | [`BLACK_LONG`]   | after a black `0000`             | 9    |
//! | [`BLACK_TAIL`]   | after a black `0001`             | 2    |
//! | [`EXTENDED`]     | after the makeup prefix `00000001` | 4  |
//! | [`MODES`]        | start of a 2D mode code          | 7    |

/// Width of the prefix for [`WHITE`]
pub const WHITE_BITS: u8 = 10;
/// Width of the prefix for [`BLACK_SHORT`]
pub const BLACK_SHORT_BITS: u8 = 4;
/// Width of the prefix for [`BLACK_LONG`]
pub const BLACK_LONG_BITS: u8 = 9;
/// Width of the prefix for [`BLACK_TAIL`]
pub const BLACK_TAIL_BITS: u8 = 2;
/// Width of the prefix for [`EXTENDED`]
pub const EXTENDED_BITS: u8 = 4;
/// Width of the prefix for [`MODES`]
pub const MODE_BITS: u8 = 7;

/// The end-of-line code `000000000001`
pub const EOL: u32 = 0b0000_0000_0001;
/// Length of [`EOL`]
pub const EOL_BITS: u8 = 12;

/// Meaning of a run length table entry
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunCode {
    /// No code starts with this prefix
    Invalid,
    /// At least eight zero bits, i.e. an EOL or fill
    Eol,
    /// The prefix `00000001` of the makeup codes for 1792 and above,
    /// continue with [`EXTENDED`]
    ExtendedMakeup,
    /// Black `0000`, continue with [`BLACK_LONG`]
    LongBlack,
    /// Black `0001`, continue with [`BLACK_TAIL`]
    ShortBlack,
    /// A makeup code, another code follows
    Makeup(u16),
    /// A terminating code, the run ends here
    Terminating(u16),
}

/// An entry in one of the run length tables
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunEntry {
    /// What was found
    pub code: RunCode,
    /// How many bits of the prefix belong to the code
    pub bits: u8,
}

impl RunEntry {
    const INVALID: Self = Self {
        code: RunCode::Invalid,
        bits: 0,
    };
}

/// A two-dimensional coding mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `0001`
    Pass,
    /// `001`
    Horizontal,
    /// `a1 = b1 + offset`, offset in `-3..=3`
    Vertical(i8),
    /// `0000001`, followed by three bits that select the extension
    Extension,
    /// `0000000`
    Invalid,
}

/// An entry in the [`MODES`] table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeEntry {
    /// The mode
    pub mode: Mode,
    /// How many bits of the prefix belong to the code
    pub bits: u8,
}

#[derive(Debug, Copy, Clone)]
struct CodeWord {
    run: u16,
    code: u32,
    len: u8,
}

const fn cw(run: u16, pattern: &str) -> CodeWord {
    let bytes = pattern.as_bytes();
    let mut code = 0;
    let mut i = 0;
    while i < bytes.len() {
        code = code << 1 | (bytes[i] == b'1') as u32;
        i += 1;
    }
    CodeWord {
        run,
        code,
        len: bytes.len() as u8,
    }
}

#[rustfmt::skip]
const WHITE_CODES: [CodeWord; 91] = [
    cw(0, "00110101"), cw(1, "000111"), cw(2, "0111"), cw(3, "1000"),
    cw(4, "1011"), cw(5, "1100"), cw(6, "1110"), cw(7, "1111"),
    cw(8, "10011"), cw(9, "10100"), cw(10, "00111"), cw(11, "01000"),
    cw(12, "001000"), cw(13, "000011"), cw(14, "110100"), cw(15, "110101"),
    cw(16, "101010"), cw(17, "101011"), cw(18, "0100111"), cw(19, "0001100"),
    cw(20, "0001000"), cw(21, "0010111"), cw(22, "0000011"), cw(23, "0000100"),
    cw(24, "0101000"), cw(25, "0101011"), cw(26, "0010011"), cw(27, "0100100"),
    cw(28, "0011000"), cw(29, "00000010"), cw(30, "00000011"), cw(31, "00011010"),
    cw(32, "00011011"), cw(33, "00010010"), cw(34, "00010011"), cw(35, "00010100"),
    cw(36, "00010101"), cw(37, "00010110"), cw(38, "00010111"), cw(39, "00101000"),
    cw(40, "00101001"), cw(41, "00101010"), cw(42, "00101011"), cw(43, "00101100"),
    cw(44, "00101101"), cw(45, "00000100"), cw(46, "00000101"), cw(47, "00001010"),
    cw(48, "00001011"), cw(49, "01010010"), cw(50, "01010011"), cw(51, "01010100"),
    cw(52, "01010101"), cw(53, "00100100"), cw(54, "00100101"), cw(55, "01011000"),
    cw(56, "01011001"), cw(57, "01011010"), cw(58, "01011011"), cw(59, "01001010"),
    cw(60, "01001011"), cw(61, "00110010"), cw(62, "00110011"), cw(63, "00110100"),
    cw(64, "11011"), cw(128, "10010"), cw(192, "010111"), cw(256, "0110111"),
    cw(320, "00110110"), cw(384, "00110111"), cw(448, "01100100"), cw(512, "01100101"),
    cw(576, "01101000"), cw(640, "01100111"), cw(704, "011001100"), cw(768, "011001101"),
    cw(832, "011010010"), cw(896, "011010011"), cw(960, "011010100"), cw(1024, "011010101"),
    cw(1088, "011010110"), cw(1152, "011010111"), cw(1216, "011011000"), cw(1280, "011011001"),
    cw(1344, "011011010"), cw(1408, "011011011"), cw(1472, "010011000"), cw(1536, "010011001"),
    cw(1600, "010011010"), cw(1664, "011000"), cw(1728, "010011011"),
];

#[rustfmt::skip]
const BLACK_CODES: [CodeWord; 91] = [
    cw(0, "0000110111"), cw(1, "010"), cw(2, "11"), cw(3, "10"),
    cw(4, "011"), cw(5, "0011"), cw(6, "0010"), cw(7, "00011"),
    cw(8, "000101"), cw(9, "000100"), cw(10, "0000100"), cw(11, "0000101"),
    cw(12, "0000111"), cw(13, "00000100"), cw(14, "00000111"), cw(15, "000011000"),
    cw(16, "0000010111"), cw(17, "0000011000"), cw(18, "0000001000"), cw(19, "00001100111"),
    cw(20, "00001101000"), cw(21, "00001101100"), cw(22, "00000110111"), cw(23, "00000101000"),
    cw(24, "00000010111"), cw(25, "00000011000"), cw(26, "000011001010"), cw(27, "000011001011"),
    cw(28, "000011001100"), cw(29, "000011001101"), cw(30, "000001101000"), cw(31, "000001101001"),
    cw(32, "000001101010"), cw(33, "000001101011"), cw(34, "000011010010"), cw(35, "000011010011"),
    cw(36, "000011010100"), cw(37, "000011010101"), cw(38, "000011010110"), cw(39, "000011010111"),
    cw(40, "000001101100"), cw(41, "000001101101"), cw(42, "000011011010"), cw(43, "000011011011"),
    cw(44, "000001010100"), cw(45, "000001010101"), cw(46, "000001010110"), cw(47, "000001010111"),
    cw(48, "000001100100"), cw(49, "000001100101"), cw(50, "000001010010"), cw(51, "000001010011"),
    cw(52, "000000100100"), cw(53, "000000110111"), cw(54, "000000111000"), cw(55, "000000100111"),
    cw(56, "000000101000"), cw(57, "000001011000"), cw(58, "000001011001"), cw(59, "000000101011"),
    cw(60, "000000101100"), cw(61, "000001011010"), cw(62, "000001100110"), cw(63, "000001100111"),
    cw(64, "0000001111"), cw(128, "000011001000"), cw(192, "000011001001"), cw(256, "000001011011"),
    cw(320, "000000110011"), cw(384, "000000110100"), cw(448, "000000110101"), cw(512, "0000001101100"),
    cw(576, "0000001101101"), cw(640, "0000001001010"), cw(704, "0000001001011"), cw(768, "0000001001100"),
    cw(832, "0000001001101"), cw(896, "0000001110010"), cw(960, "0000001110011"), cw(1024, "0000001110100"),
    cw(1088, "0000001110101"), cw(1152, "0000001110110"), cw(1216, "0000001110111"), cw(1280, "0000001010010"),
    cw(1344, "0000001010011"), cw(1408, "0000001010100"), cw(1472, "0000001010101"), cw(1536, "0000001011010"),
    cw(1600, "0000001011011"), cw(1664, "0000001100100"), cw(1728, "0000001100101"),
];

/// Makeup codes shared by both colors
#[rustfmt::skip]
const EXTENDED_CODES: [CodeWord; 13] = [
    cw(1792, "00000001000"), cw(1856, "00000001100"), cw(1920, "00000001101"),
    cw(1984, "000000010010"), cw(2048, "000000010011"), cw(2112, "000000010100"),
    cw(2176, "000000010101"), cw(2240, "000000010110"), cw(2304, "000000010111"),
    cw(2368, "000000011100"), cw(2432, "000000011101"), cw(2496, "000000011110"),
    cw(2560, "000000011111"),
];

/// Put every code that starts with `prefix` (of length `skip`) and fits
/// into the next `width` bits into a table indexed by those bits.
const fn flatten<const N: usize>(
    codes: &[CodeWord],
    prefix: u32,
    skip: u8,
    width: u8,
) -> [RunEntry; N] {
    let mut table = [RunEntry::INVALID; N];
    let mut i = 0;
    while i < codes.len() {
        let word = codes[i];
        if word.len > skip && word.len <= skip + width && word.code >> (word.len - skip) == prefix {
            let rest = word.len - skip;
            let tail = width - rest;
            let first = (word.code & ((1 << rest) - 1)) << tail;
            let code = if word.run < 64 {
                RunCode::Terminating(word.run)
            } else {
                RunCode::Makeup(word.run)
            };
            let mut j = 0;
            while j < (1 << tail) {
                table[(first + j) as usize] = RunEntry { code, bits: rest };
                j += 1;
            }
        }
        i += 1;
    }
    table
}

const fn white_table() -> [RunEntry; 1 << WHITE_BITS] {
    let mut table = flatten(&WHITE_CODES, 0, 0, WHITE_BITS);
    let mut i = 0;
    // 00000000xx
    while i < 4 {
        table[i] = RunEntry {
            code: RunCode::Eol,
            bits: 0,
        };
        i += 1;
    }
    // 00000001xx
    while i < 8 {
        table[i] = RunEntry {
            code: RunCode::ExtendedMakeup,
            bits: 8,
        };
        i += 1;
    }
    table
}

const fn black_short_table() -> [RunEntry; 1 << BLACK_SHORT_BITS] {
    let mut table = flatten(&BLACK_CODES, 0, 0, BLACK_SHORT_BITS);
    table[0] = RunEntry {
        code: RunCode::LongBlack,
        bits: 4,
    };
    table[1] = RunEntry {
        code: RunCode::ShortBlack,
        bits: 4,
    };
    table
}

const fn black_long_table() -> [RunEntry; 1 << BLACK_LONG_BITS] {
    let mut table = flatten(&BLACK_CODES, 0b0000, 4, BLACK_LONG_BITS);
    let mut i = 0;
    // 0000_0000xxxxx
    while i < 32 {
        table[i] = RunEntry {
            code: RunCode::Eol,
            bits: 0,
        };
        i += 1;
    }
    // 0000_0001xxxxx
    while i < 64 {
        table[i] = RunEntry {
            code: RunCode::ExtendedMakeup,
            bits: 4,
        };
        i += 1;
    }
    table
}

#[rustfmt::skip]
const MODE_CODES: [(Mode, &str); 10] = [
    (Mode::Pass, "0001"),
    (Mode::Horizontal, "001"),
    (Mode::Vertical(0), "1"),
    (Mode::Vertical(1), "011"),
    (Mode::Vertical(2), "000011"),
    (Mode::Vertical(3), "0000011"),
    (Mode::Vertical(-1), "010"),
    (Mode::Vertical(-2), "000010"),
    (Mode::Vertical(-3), "0000010"),
    (Mode::Extension, "0000001"),
];

/// The code word of a terminating or makeup run
#[cfg(test)]
pub(crate) fn run_code(color: crate::Color, run: u16) -> (u32, u8) {
    let codes: &[CodeWord] = match color {
        _ if run >= 1792 => &EXTENDED_CODES,
        crate::Color::White => &WHITE_CODES,
        crate::Color::Black => &BLACK_CODES,
    };
    let word = codes.iter().find(|word| word.run == run);
    let word = word.unwrap_or_else(|| panic!("no {:?} code for {}", color, run));
    (word.code, word.len)
}

/// The code word of a 2D mode
#[cfg(test)]
pub(crate) fn mode_code(mode: Mode) -> (u32, u8) {
    let (_, pattern) = MODE_CODES
        .iter()
        .find(|(other, _)| *other == mode)
        .unwrap_or_else(|| panic!("no code for {:?}", mode));
    let word = cw(0, pattern);
    (word.code, word.len)
}

const fn mode_table() -> [ModeEntry; 1 << MODE_BITS] {
    let mut table = [ModeEntry {
        mode: Mode::Invalid,
        bits: 0,
    }; 1 << MODE_BITS];
    let mut i = 0;
    while i < MODE_CODES.len() {
        let (mode, pattern) = MODE_CODES[i];
        let word = cw(0, pattern);
        let tail = MODE_BITS - word.len;
        let first = word.code << tail;
        let mut j = 0;
        while j < (1 << tail) {
            table[(first + j) as usize] = ModeEntry {
                mode,
                bits: word.len,
            };
            j += 1;
        }
        i += 1;
    }
    table
}

/// White run codes by their first 10 bits
pub static WHITE: [RunEntry; 1 << WHITE_BITS] = white_table();
/// Black run codes by their first 4 bits
pub static BLACK_SHORT: [RunEntry; 1 << BLACK_SHORT_BITS] = black_short_table();
/// Black run codes starting with `0000`, by the 9 bits after that
pub static BLACK_LONG: [RunEntry; 1 << BLACK_LONG_BITS] = black_long_table();
/// Black run codes starting with `0001`, by the 2 bits after that
pub static BLACK_TAIL: [RunEntry; 1 << BLACK_TAIL_BITS] =
    flatten(&BLACK_CODES, 0b0001, 4, BLACK_TAIL_BITS);
/// Makeup codes from 1792 to 2560, by the 4 bits after `00000001`
pub static EXTENDED: [RunEntry; 1 << EXTENDED_BITS] =
    flatten(&EXTENDED_CODES, 0b0000_0001, 8, EXTENDED_BITS);
/// Two-dimensional mode codes by their first 7 bits
pub static MODES: [ModeEntry; 1 << MODE_BITS] = mode_table();
