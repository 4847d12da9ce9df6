use rand::Rng;

/// Character set the glyph fields draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Alphabet {
    /// `0` and `1` only.
    #[default]
    #[value(name = "binary")]
    Binary,
    /// Half-width katakana plus digits.
    #[value(name = "katakana")]
    Katakana,
    /// Printable ASCII without space.
    #[value(name = "ascii")]
    Ascii,
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::Binary => write!(f, "binary"),
            Alphabet::Katakana => write!(f, "katakana"),
            Alphabet::Ascii => write!(f, "ascii"),
        }
    }
}

/// Owned, non-empty list of glyphs to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSource {
    chars: Vec<char>,
}

impl GlyphSource {
    pub fn new(alphabet: Alphabet) -> Self {
        let chars: Vec<char> = match alphabet {
            Alphabet::Binary => vec!['0', '1'],
            Alphabet::Katakana => ('\u{FF66}'..='\u{FF9D}').chain('0'..='9').collect(),
            Alphabet::Ascii => ('!'..='~').collect(),
        };
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Glyph at `index`, wrapping around the alphabet.
    pub fn get(&self, index: usize) -> char {
        self.chars[index % self.chars.len()]
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.chars[rng.gen_range(0..self.chars.len())]
    }
}

impl Default for GlyphSource {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn alphabets_are_non_empty() {
        assert_eq!(GlyphSource::new(Alphabet::Binary).len(), 2);
        assert_eq!(GlyphSource::new(Alphabet::Katakana).len(), 56 + 10);
        assert_eq!(GlyphSource::new(Alphabet::Ascii).len(), 94);
    }

    #[test]
    fn pick_and_get_stay_inside_alphabet() {
        let src = GlyphSource::new(Alphabet::Katakana);
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..200 {
            assert!(src.contains(src.pick(&mut rng)));
            assert!(src.contains(src.get(i * 31)));
        }
    }
}
