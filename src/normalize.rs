//! Title text repair and Unicode normalization.
//!
//! Feeds regularly deliver UTF-8 that was decoded as Latin-1 or
//! Windows-1252 somewhere upstream, so `café` arrives as `cafÃ©` and `’` as
//! `â€™`.  [`repair_mojibake`] reverses that when it can prove the reversal:
//!
//! 1. every character must map back to a single byte, either as a Latin-1
//!    code point or as a Windows-1252 code unit;
//! 2. at least one byte must be non-ASCII;
//! 3. the bytes must decode as strict UTF-8.
//!
//! Clean text fails (1) or (3): genuine accented text almost never forms
//! valid UTF-8 lead/continuation sequences, and anything outside Windows-1252
//! cannot be a mis-decoding in the first place.  When any check fails the
//! text is left alone.
//!
//! [`normalize_text`] repeats repair followed by NFC until nothing changes,
//! which also undoes text that was mis-decoded more than once and makes the
//! whole operation idempotent.

use encoding_rs::WINDOWS_1252;
use unicode_normalization::UnicodeNormalization;

/// Repair mis-decoded text and compose it to NFC.
///
/// Each successful repair folds every non-ASCII character into one byte, so
/// the UTF-8 length strictly shrinks and the loop terminates.
pub fn normalize_text(text: &str) -> String {
    let mut current: String = text.nfc().collect();

    while let Some(repaired) = repair_mojibake(&current) {
        let next: String = repaired.nfc().collect();
        if next.len() >= current.len() {
            break;
        }
        current = next;
    }

    current
}

/// Undo one layer of UTF-8-read-as-single-byte mis-decoding.
///
/// Returns `None` ("no repair applicable") when the text does not look
/// mis-decoded or the reversal would not yield valid UTF-8.
pub fn repair_mojibake(text: &str) -> Option<String> {
    let bytes = single_byte_encode(text)?;
    if bytes.is_ascii() {
        return None;
    }

    let repaired = String::from_utf8(bytes).ok()?;
    (repaired != text).then_some(repaired)
}

/// Map each character back to the byte a single-byte decoder would have
/// produced it from.
fn single_byte_encode(text: &str) -> Option<Vec<u8>> {
    text.chars().map(single_byte).collect()
}

fn single_byte(c: char) -> Option<u8> {
    if let Ok(b) = u8::try_from(c) {
        return Some(b);
    }

    // Windows-1252 puts typographic characters (€, ‘, ’, “, ™ ...) in
    // 0x80-0x9F where Latin-1 has C1 controls.
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    match (had_errors, &*bytes) {
        (false, &[b]) => Some(b),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
