// ==========================================
// Wood QC Report - Single-byte text encoding
// ==========================================
// Page text is stored as Windows-1252 (PDF WinAnsiEncoding) bytes.
// Anything outside the repertoire becomes '?'.
// ==========================================

pub const SUBSTITUTE: u8 = b'?';

/// Code points of bytes 0x80..=0x9F; `None` marks the five undefined slots.
const HIGH_BLOCK: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

pub fn encode_char(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        _ => HIGH_BLOCK
            .iter()
            .position(|slot| *slot == Some(c))
            .map(|i| 0x80 + i as u8)
            .unwrap_or(SUBSTITUTE),
    }
}

/// Transcode a single line; line breaks are the caller's concern.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(encode_char).collect()
}

/// Inverse mapping, used when reading page text back.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| match *b {
            0x80..=0x9F => HIGH_BLOCK[(*b - 0x80) as usize].unwrap_or('?'),
            other => other as char,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_accents_are_single_bytes() {
        assert_eq!(encode("Relatório"), b"Relat\xf3rio".to_vec());
        assert_eq!(encode("Arsênio"), b"Ars\xeanio".to_vec());
        assert_eq!(encode("ç"), vec![0xE7]);
    }

    #[test]
    fn test_windows_specials() {
        assert_eq!(encode("€"), vec![0x80]);
        assert_eq!(encode("“x”"), vec![0x93, b'x', 0x94]);
        assert_eq!(encode("–"), vec![0x96]);
    }

    #[test]
    fn test_unsupported_chars_are_substituted() {
        assert_eq!(encode("CrO₃"), b"CrO?".to_vec());
        assert_eq!(encode("日本"), b"??".to_vec());
        assert_eq!(encode("\u{0081}"), b"?".to_vec());
        assert_eq!(encode("a\u{0007}b"), b"a?b".to_vec());
    }

    #[test]
    fn test_decode_round_trips_repertoire() {
        let text = "Página 1 – Cromo € ç";
        assert_eq!(decode(&encode(text)), text);
    }
}
