//! Text helpers: truncation, transliteration and slug generation.

/// Ellipsis character appended by the truncation helpers.
pub const ELLIPSIS: &str = "…";

/// Separator used between words of a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSeparator {
    /// `-`
    Dash,
    /// `_`
    Underscore,
}

impl WordSeparator {
    /// Returns the separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

/// Truncates a string to the given number of words and appends an
/// ellipsis, preserving the original whitespace between the kept words.
///
/// Returns the input unchanged when it has no more than `max_words` words.
#[must_use]
pub fn limit_words(text: &str, max_words: usize) -> String {
    if text.is_empty() || max_words == 0 {
        return text.to_owned();
    }
    let mut words = 0;
    let mut last_word_end = 0;
    let mut in_word = false;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word {
                in_word = false;
                words += 1;
                last_word_end = i;
                if words == max_words {
                    break;
                }
            }
        } else {
            in_word = true;
        }
    }
    if in_word || words < max_words {
        // The final word runs to the end of the text.
        return text.to_owned();
    }
    if text[last_word_end..].chars().all(char::is_whitespace) {
        text.to_owned()
    } else {
        format!("{}{ELLIPSIS}", &text[..last_word_end])
    }
}

/// Truncates a string to the given number of characters while keeping
/// whole words, collapsing whitespace runs to single spaces first.
///
/// The ellipsis is appended after truncation and is not counted against
/// the budget.
#[must_use]
pub fn limit_characters(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut out = String::new();
    let mut used = 0;
    for word in collapsed.split(' ') {
        let word_len = word.chars().count();
        let space = usize::from(used > 0);
        if used + word_len + space > max_chars {
            break;
        }
        if space == 1 {
            out.push(' ');
        }
        out.push_str(word);
        used += word_len + space;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Splits a string at a maximum length and inserts an ellipsis at the
/// given relative position: 0.0 places it at the left, 0.5 in the middle,
/// 1.0 at the right.
#[must_use]
pub fn ellipsize(text: &str, max_length: usize, position: f64) -> String {
    let total = text.chars().count();
    if total <= max_length {
        return text.to_owned();
    }
    let position = position.clamp(0.0, 1.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let start_len = ((max_length as f64) * position).floor() as usize;
    let end_len = max_length - start_len;
    let start: String = text.chars().take(start_len).collect();
    let end: String = text.chars().skip(total - end_len).collect();
    format!("{start}{ELLIPSIS}{end}")
}

fn fold_char(ch: char) -> Option<&'static str> {
    Some(match ch {
        'Á' | 'À' | 'Â' | 'Ä' | 'Ǎ' | 'Ă' | 'Ā' | 'Ã' | 'Å' | 'Ǻ' | 'Ą' => "A",
        'á' | 'à' | 'â' | 'ä' | 'ǎ' | 'ă' | 'ā' | 'ã' | 'å' | 'ǻ' | 'ą' | 'ª' => "a",
        'Æ' | 'Ǽ' | 'Ǣ' => "AE",
        'æ' | 'ǽ' | 'ǣ' => "ae",
        'Ɓ' => "B",
        'ɓ' => "b",
        'Ć' | 'Ċ' | 'Ĉ' | 'Č' | 'Ç' => "C",
        'ć' | 'ċ' | 'ĉ' | 'č' | 'ç' => "c",
        'Ď' | 'Ḍ' | 'Đ' | 'Ɗ' | 'Ð' => "D",
        'ď' | 'ḍ' | 'đ' | 'ɗ' | 'ð' => "d",
        'É' | 'È' | 'Ė' | 'Ê' | 'Ë' | 'Ě' | 'Ĕ' | 'Ē' | 'Ę' | 'Ẹ' | 'Ǝ' | 'Ə' | 'Ɛ' => "E",
        'é' | 'è' | 'ė' | 'ê' | 'ë' | 'ě' | 'ĕ' | 'ē' | 'ę' | 'ẹ' | 'ǝ' | 'ə' | 'ɛ' => "e",
        'ƒ' => "f",
        'Ġ' | 'Ĝ' | 'Ǧ' | 'Ğ' | 'Ģ' | 'Ɣ' => "G",
        'ġ' | 'ĝ' | 'ǧ' | 'ğ' | 'ģ' | 'ɣ' => "g",
        'Ĥ' | 'Ḥ' | 'Ħ' => "H",
        'ĥ' | 'ḥ' | 'ħ' => "h",
        'Í' | 'Ì' | 'İ' | 'Î' | 'Ï' | 'Ǐ' | 'Ĭ' | 'Ī' | 'Ĩ' | 'Į' | 'Ị' => "I",
        'ı' | 'í' | 'ì' | 'î' | 'ï' | 'ǐ' | 'ĭ' | 'ī' | 'ĩ' | 'į' | 'ị' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' | 'Ƙ' => "K",
        'ķ' | 'ƙ' => "k",
        'Ĺ' | 'Ļ' | 'Ł' | 'Ľ' | 'Ŀ' => "L",
        'ĺ' | 'ļ' | 'ł' | 'ľ' | 'ŀ' => "l",
        'Ń' | 'Ň' | 'Ñ' | 'Ņ' | 'Ŋ' => "N",
        'ŉ' | 'ń' | 'ň' | 'ñ' | 'ņ' | 'ŋ' => "n",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Ǒ' | 'Ŏ' | 'Ō' | 'Õ' | 'Ő' | 'Ǫ' | 'Ọ' | 'Ø' | 'Ǿ' | 'Ơ' => "O",
        'ó' | 'ò' | 'ô' | 'ö' | 'ǒ' | 'ŏ' | 'ō' | 'õ' | 'ő' | 'ǫ' | 'ọ' | 'ø' | 'ǿ' | 'ơ' | 'º' => {
            "o"
        }
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ř' | 'Ŗ' => "R",
        'ŕ' | 'ř' | 'ŗ' | 'ſ' => "r",
        'Ś' | 'Ŝ' | 'Š' | 'Ş' | 'Ș' | 'Ṣ' => "S",
        'ś' | 'ŝ' | 'š' | 'ş' | 'ș' | 'ṣ' => "s",
        'ẞ' => "SS",
        'ß' => "ss",
        'Ť' | 'Ţ' | 'Ṭ' | 'Ŧ' | 'Þ' => "T",
        'ť' | 'ţ' | 'ṭ' | 'ŧ' | 'þ' => "t",
        'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ǔ' | 'Ŭ' | 'Ū' | 'Ũ' | 'Ű' | 'Ů' | 'Ų' | 'Ụ' | 'Ư' => "U",
        'ú' | 'ù' | 'û' | 'ü' | 'ǔ' | 'ŭ' | 'ū' | 'ũ' | 'ű' | 'ů' | 'ų' | 'ụ' | 'ư' => "u",
        'Ẃ' | 'Ẁ' | 'Ŵ' | 'Ẅ' | 'Ƿ' => "W",
        'ẃ' | 'ẁ' | 'ŵ' | 'ẅ' | 'ƿ' => "w",
        'Ý' | 'Ỳ' | 'Ŷ' | 'Ÿ' | 'Ȳ' | 'Ỹ' | 'Ƴ' => "Y",
        'ý' | 'ỳ' | 'ŷ' | 'ÿ' | 'ȳ' | 'ỹ' | 'ƴ' => "y",
        'Ź' | 'Ż' | 'Ž' | 'Ẓ' => "Z",
        'ź' | 'ż' | 'ž' | 'ẓ' => "z",
        _ => return None,
    })
}

/// Replaces accented Latin characters with their ASCII equivalents.
///
/// Characters outside the mapping pass through unchanged.
#[must_use]
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match fold_char(ch) {
            Some(ascii) => out.push_str(ascii),
            None => out.push(ch),
        }
    }
    out
}

/// Converts a string into a URL-friendly slug.
///
/// The text is transliterated to ASCII and lowercased; apostrophes vanish,
/// every other run of non-alphanumeric characters becomes one separator,
/// and the result carries no leading or trailing separator.
#[must_use]
pub fn slugify(text: &str, separator: WordSeparator) -> String {
    let sep = separator.as_char();
    let ascii = transliterate(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else if ch != '\'' {
            pending_sep = true;
        }
    }
    out
}
