use lazy_static::lazy_static;
use regex::Regex;

/// Ordered rewrite table applied to alert descriptions. Each entry is a
/// single-pass case-insensitive replacement over the evolving string, so
/// order matters where patterns overlap: slash shorthand (`c/o`, `N/A`,
/// `b/w`) runs before the single-letter compass/temperature entries that
/// would otherwise eat their first letter, and the whole-word `EST` entry
/// cannot re-fire inside "west..." produced by the `W` entry.
const REWRITE_TABLE: &[(&str, &str)] = &[
    // Slash shorthand first, see above.
    (r"\bw/", "with"),
    (r"\bc/o\b", "care of"),
    (r"\bb/w\b", "between"),
    (r"\bN/A\b", "not available"),
    // Units.
    (r"\bmph\b", "miles per hour"),
    (r"\bknots\b", "nautical miles per hour"),
    (r"\bnm\b", "nautical miles"),
    (r"\bft\.", "feet"),
    (r"\bin\.", "inches"),
    (r"\bm\b", "meter"),
    (r"\bkm\b", "kilometer"),
    (r"\bmi\b", "mile"),
    ("%", "percent"),
    // Compass directions; single letters before the paired forms is safe
    // because every entry is whole-word.
    (r"\bN\b", "north"),
    (r"\bS\b", "south"),
    (r"\bE\b", "east"),
    (r"\bW\b", "west"),
    (r"\bNE\b", "northeast"),
    (r"\bNW\b", "northwest"),
    (r"\bSE\b", "southeast"),
    (r"\bSW\b", "southwest"),
    (r"\bF\b", "Fahrenheit"),
    (r"\bC\b", "Celsius"),
    (r"\bUV\b", "ultraviolet"),
    (r"\bgusts up to\b", "gusts of up to"),
    // Time and misc shorthand.
    (r"\bhrs\b", "hours"),
    (r"\bhr\b", "hour"),
    (r"\bmin\b", "minute"),
    (r"\bsec\b", "second"),
    (r"\bsq\b", "square"),
    (r"\bblw\b", "below"),
    (r"\babv\b", "above"),
    (r"\bavg\b", "average"),
    (r"\bfr\b", "from"),
    (r"\btill\b", "until"),
    (r"\bbtwn\b", "between"),
    ("&", "and"),
    (r"\+", "plus"),
    (r"e\.g\.", "for example"),
    (r"i\.e\.", "that is"),
    (r"\best\.", "estimated"),
    (r"\.\.\.", "."),
    // Time zones last, after the general abbreviations that overlap them.
    (r"\bEDT\b", "eastern daylight time"),
    (r"\bEST\b", "eastern standard time"),
    (r"\bCST\b", "central standard time"),
    (r"\bCDT\b", "central daylight time"),
    (r"\bMST\b", "mountain standard time"),
    (r"\bMDT\b", "mountain daylight time"),
    (r"\bPST\b", "pacific standard time"),
    (r"\bPDT\b", "pacific daylight time"),
    (r"\bAKST\b", "alaska standard time"),
    (r"\bAKDT\b", "alaska daylight time"),
    (r"\bHST\b", "hawaii standard time"),
    (r"\bHDT\b", "hawaii daylight time"),
];

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SECTION_HEADER: Regex =
        Regex::new(r"(?i)\*\s*(WHAT|WHERE|WHEN|IMPACTS|ADDITIONAL\s+DETAILS)\.\s*").unwrap();
    static ref REWRITES: Vec<(Regex, &'static str)> = REWRITE_TABLE
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(&format!("(?i){pattern}")).unwrap(),
                *replacement,
            )
        })
        .collect();
    static ref REPEATED_DOTS: Regex = Regex::new(r"\s*\.\.+").unwrap();
    static ref DOT_AFTER_COLON: Regex = Regex::new(r":\s*\.").unwrap();
    static ref MULTI_SPACE: Regex = Regex::new(r" {2,}").unwrap();
}

/// Rewrites raw alert descriptions into cleaner, bounded-length messages:
/// whitespace collapse, `*WHAT.` style section headers to `*WHAT: `,
/// abbreviation expansion, punctuation cleanup, word-count truncation.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    max_words: usize,
}

impl TextNormalizer {
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut text = WHITESPACE.replace_all(text, " ").into_owned();
        text = SECTION_HEADER.replace_all(&text, "*${1}: ").into_owned();

        for (pattern, replacement) in REWRITES.iter() {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }

        text = REPEATED_DOTS.replace_all(&text, ".").into_owned();
        text = DOT_AFTER_COLON.replace_all(&text, ":").into_owned();
        text = MULTI_SPACE.replace_all(&text, " ").into_owned();

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > self.max_words {
            words[..self.max_words].join(" ")
        } else {
            text
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(150)
    }
}
