//! Bounded display names.

use heapless::String;

use crate::config::MAX_NAME_LEN;

/// A display name truncated to [`MAX_NAME_LEN`] bytes.
pub type Name = String<MAX_NAME_LEN>;

/// Copy `value` into a [`Name`], dropping whatever does not fit.
///
/// Truncation happens on a character boundary, so the stored name is always
/// valid UTF-8 and never longer than [`MAX_NAME_LEN`] bytes.
pub fn truncated(value: &str) -> Name {
    let mut name = Name::new();
    push_truncated(&mut name, value);
    name
}

/// Build `"<hint>_<suffix>"`, truncated like [`truncated`].
pub fn composite(hint: &str, suffix: &str) -> Name {
    let mut name = truncated(hint);
    push_truncated(&mut name, "_");
    push_truncated(&mut name, suffix);
    name
}

fn push_truncated(target: &mut Name, value: &str) {
    for ch in value.chars() {
        if target.push(ch).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_cut() {
        let name = truncated("ABCDEFGHIJKLMNOPQRST");
        assert_eq!(name.as_str(), "ABCDEFGHIJKLMNO");
        assert_eq!(name.len(), MAX_NAME_LEN);
    }

    #[test]
    fn multibyte_cut_stays_on_boundary() {
        // 7 two-byte chars fill 14 bytes; the 8th would overflow.
        let name = truncated("ééééééééé");
        assert_eq!(name.len(), 14);
        assert!(name.as_str().chars().all(|c| c == 'é'));
    }

    #[test]
    fn composite_joins_with_underscore() {
        assert_eq!(composite("Lock", "Mutex").as_str(), "Lock_Mutex");
        assert_eq!(composite("SensorQueueA", "Mutex").as_str(), "SensorQueueA_Mu");
    }
}
