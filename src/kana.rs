// EDICT-Search Kana Utilities
// Character classes and hiragana/katakana script conversion

/// Offset between a hiragana code point and its katakana counterpart
const KATAKANA_OFFSET: u32 = 0x60;

/// Prolonged sound mark, shared by both scripts
pub const CHOONPU: char = 'ー';

/// Iteration mark used in kanji compounds (e.g. 人々)
const KANJI_ITERATION_MARK: char = '々';

/// Check if a character is hiragana (ぁ-ゖ plus the voiced iteration marks)
#[inline]
pub fn is_hiragana(ch: char) -> bool {
    matches!(ch, '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}')
}

/// Check if a character is katakana (ァ-ヺ, ヽヾ and the prolonged sound mark)
#[inline]
pub fn is_katakana(ch: char) -> bool {
    matches!(ch, '\u{30A1}'..='\u{30FA}' | '\u{30FC}'..='\u{30FE}')
}

/// Check if a character is either hiragana or katakana
#[inline]
pub fn is_kana(ch: char) -> bool {
    is_hiragana(ch) || is_katakana(ch)
}

/// Check if a character is a kanji
///
/// Covers the CJK Unified Ideographs block, Extension A, the compatibility
/// ideographs and the 々 iteration mark.
#[inline]
pub fn is_kanji(ch: char) -> bool {
    matches!(
        ch,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}'
    ) || ch == KANJI_ITERATION_MARK
}

/// Convert every hiragana character in `text` to katakana
///
/// Characters outside the convertible range pass through unchanged.
///
/// # Examples
/// ```
/// # use edict_search::kana::hiragana_to_katakana;
/// assert_eq!(hiragana_to_katakana("たべる"), "タベル");
/// assert_eq!(hiragana_to_katakana("ラーメンです"), "ラーメンデス");
/// ```
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{3041}'..='\u{3096}' | '\u{309D}'..='\u{309E}' => {
                char::from_u32(ch as u32 + KATAKANA_OFFSET).unwrap_or(ch)
            }
            _ => ch,
        })
        .collect()
}

/// Convert every katakana character in `text` to hiragana
///
/// Katakana without a hiragana counterpart (ヷ-ヺ) and the prolonged sound
/// mark pass through unchanged.
pub fn katakana_to_hiragana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{30A1}'..='\u{30F6}' | '\u{30FD}'..='\u{30FE}' => {
                char::from_u32(ch as u32 - KATAKANA_OFFSET).unwrap_or(ch)
            }
            _ => ch,
        })
        .collect()
}

/// Check if the text contains at least one kanji
pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Check if the text is made only of kana (and is not empty)
pub fn is_all_kana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_kana)
}

/// Check if the text looks like romaji typed on a latin keyboard
///
/// Allows ASCII letters, apostrophes (syllabic `n'`), dashes (long vowels)
/// and whitespace.
pub fn is_ascii_romaji(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
        && text
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '\'' || c == '-' || c.is_whitespace())
}
