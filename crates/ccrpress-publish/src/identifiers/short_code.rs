use unicode_normalization::UnicodeNormalization;

/// Length of the author code embedded in synthesized DOIs.
pub const DOI_CODE_LENGTH: usize = 4;

/// Turns a name into an ASCII-only, uppercase code of at most `max_len`
/// characters: `"Müller"` becomes `"MULL"` with `max_len = 4`.
pub fn short_code(name: &str, max_len: usize) -> String {
    let mut code = String::with_capacity(name.len());
    for c in name.nfkd() {
        match fold(c) {
            Some(ascii) => code.push_str(ascii),
            None if c.is_ascii_alphanumeric() => code.push(c.to_ascii_uppercase()),
            None => {}
        }
    }
    // ASCII only from here on, so byte truncation is char-safe.
    code.truncate(max_len);
    code
}

/// ASCII stand-ins for letters that compatibility decomposition leaves alone.
fn fold(c: char) -> Option<&'static str> {
    let ascii = match c {
        'ß' | 'ẞ' => "SS",
        'æ' | 'Æ' => "AE",
        'œ' | 'Œ' => "OE",
        'ø' | 'Ø' => "O",
        'ł' | 'Ł' => "L",
        'đ' | 'Đ' | 'ð' | 'Ð' => "D",
        'þ' | 'Þ' => "TH",
        'ı' => "I",
        _ => return None,
    };
    Some(ascii)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_uppercased_and_truncated() {
        assert_eq!(short_code("Smith", 4), "SMIT");
        assert_eq!(short_code("Li", 4), "LI");
    }

    #[test]
    fn diacritics_are_stripped() {
        assert_eq!(short_code("Müller", 4), "MULL");
        assert_eq!(short_code("Ångström", 8), "ANGSTROM");
        assert_eq!(short_code("Çelik", 4), "CELI");
    }

    #[test]
    fn non_decomposing_letters_are_folded() {
        assert_eq!(short_code("Łukasiewicz", 4), "LUKA");
        assert_eq!(short_code("Strauß", 6), "STRAUS");
        assert_eq!(short_code("Ørsted", 4), "ORST");
        assert_eq!(short_code("Þórsdóttir", 4), "THOR");
    }

    #[test]
    fn punctuation_and_spaces_are_removed() {
        assert_eq!(short_code("O'Brien", 4), "OBRI");
        assert_eq!(short_code("van der Berg", 6), "VANDER");
        assert_eq!(short_code("Smith-Jones", 8), "SMITHJON");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(short_code("R2-D2", 4), "R2D2");
    }

    #[test]
    fn unmappable_scripts_vanish() {
        assert_eq!(short_code("王", 4), "");
        assert_eq!(short_code("", 4), "");
    }

    #[test]
    fn truncation_applies_after_folding() {
        assert_eq!(short_code("Weiß", 4), "WEIS");
    }
}
