pub const ROWS: usize = 5;
pub const COLS: usize = 5;

/// The matrix labels, row by row, as the scanner reports them.
pub const KEYS: [[char; COLS]; ROWS] = [
    ['A', 'B', 'C', 'D', 'E'],
    ['F', 'G', 'H', 'I', 'J'],
    ['K', 'L', 'M', 'N', 'O'],
    ['P', 'Q', 'R', 'S', 'T'],
    ['U', 'V', 'W', 'X', 'Y'],
];

/// Two chromatic octaves from C4 up, integer hertz, one per key in row major
/// order. 'A' is middle C, 'Y' is C6.
pub const FREQUENCIES: [u16; ROWS * COLS] = [
    262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494, 523, 554, 587, 622, 659, 698, 740,
    784, 831, 880, 932, 988, 1047,
];

/// Key label for a row major scan index.
pub fn key_from_index(index: usize) -> Option<char> {
    if index >= ROWS * COLS {
        return None;
    }

    Some(KEYS[index / COLS][index % COLS])
}

/// Row major position of `key` in the matrix.
pub fn key_index(key: char) -> Option<usize> {
    KEYS.iter()
        .flatten()
        .position(|&candidate| candidate == key)
}

/// The pitch wired to `key`, before the engine's frequency multiplier.
pub fn frequency_for_key(key: char) -> Option<u16> {
    key_index(key).map(|index| FREQUENCIES[index])
}
