//! Latin-1 encoding chain for the portable report.
//!
//! The export target is a single-byte encoding, so arbitrary input text
//! (Cyrillic guidance, typographic punctuation) is funneled through a fixed
//! chain: lossless pass-through when possible, then a deterministic
//! transliteration table, then `?` for whatever is left. Encoding never
//! fails; it only degrades fidelity.

/// A line encoded for the document, with a flag recording whether any
/// substitution happened.
#[derive(Debug, PartialEq, Eq)]
pub struct EncodedLine {
    pub bytes: Vec<u8>,
    pub degraded: bool,
}

/// Encodes one line of text to latin-1 bytes via the fallback chain.
pub fn encode_line(text: &str) -> EncodedLine {
    if text.chars().all(is_latin1) {
        return EncodedLine {
            bytes: text.chars().map(|c| c as u8).collect(),
            degraded: false,
        };
    }

    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match transliterate(c) {
            Some(replacement) => bytes.extend(replacement.bytes()),
            None if is_latin1(c) => bytes.push(c as u8),
            None => bytes.push(b'?'),
        }
    }

    EncodedLine {
        bytes,
        degraded: true,
    }
}

fn is_latin1(c: char) -> bool {
    (c as u32) <= 0xFF
}

/// Fixed Cyrillic-to-Latin table, plus the typographic quotes and dashes
/// that commonly ride along. Hard and soft signs drop out entirely.
fn transliterate(c: char) -> Option<&'static str> {
    let replacement = match c {
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "G",
        'Д' => "D",
        'Е' | 'Ё' => "E",
        'Ж' => "Zh",
        'З' => "Z",
        'И' => "I",
        'Й' => "Y",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "Kh",
        'Ц' => "Ts",
        'Ч' => "Ch",
        'Ш' => "Sh",
        'Щ' => "Shch",
        'Ъ' | 'Ь' => "",
        'Ы' => "Y",
        'Э' => "E",
        'Ю' => "Yu",
        'Я' => "Ya",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        '’' => "'",
        '“' | '”' | '«' | '»' => "\"",
        '—' | '–' => "-",
        _ => return None,
    };
    Some(replacement)
}
