//! Roman numerals and subsection letters

const NUMERALS: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Upper-case roman numeral using greedy subtractive pairs.
/// Zero has no roman form.
pub fn roman_numeral(mut n: u32) -> Option<String> {
    if n == 0 {
        return None;
    }

    let mut out = String::new();
    for &(value, symbol) in NUMERALS.iter() {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    Some(out)
}

/// Letter for a 1-based rank: A..Z, then AA, AB, ... (bijective base 26).
/// Rank zero has no letter.
pub fn letter_index(mut rank: usize) -> Option<String> {
    if rank == 0 {
        return None;
    }

    let mut letters = Vec::new();
    while rank > 0 {
        let rem = (rank - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        rank = (rank - 1) / 26;
    }
    Some(letters.iter().rev().collect())
}
