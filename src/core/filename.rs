use crate::domain::model::OutputFormat;

pub const FILENAME_PREFIX_CHARS: usize = 30;
pub const DEFAULT_FILE_STEM: &str = "qr-code";

/// Derives a filesystem-safe stem from the first characters of the payload.
///
/// Length is counted in UTF-16 code units, so a character outside the BMP
/// takes two slots and turns into `__`.
pub fn derive_file_stem(payload: &str) -> String {
    let stem: String = payload
        .encode_utf16()
        .take(FILENAME_PREFIX_CHARS)
        .map(|unit| match u8::try_from(unit) {
            Ok(byte) if byte.is_ascii_alphanumeric() => char::from(byte.to_ascii_lowercase()),
            _ => '_',
        })
        .collect();

    if stem.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        stem
    }
}

pub fn derive_filename(payload: &str, format: OutputFormat) -> String {
    format!("{}.{}", derive_file_stem(payload), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_payload() {
        assert_eq!(
            derive_file_stem("https://example.com/path?q=1"),
            "https___example_com_path_q_1"
        );
    }

    #[test]
    fn test_truncates_to_thirty_chars() {
        let stem = derive_file_stem("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789");
        assert_eq!(stem, "abcdefghijklmnopqrstuvwxyz0123");
        assert_eq!(stem.chars().count(), 30);
    }

    #[test]
    fn test_non_ascii_becomes_underscore() {
        assert_eq!(derive_file_stem("Café ünïcode"), "caf___n_code");
    }

    #[test]
    fn test_astral_characters_take_two_slots() {
        assert_eq!(derive_file_stem("hi\u{1F600}"), "hi__");

        // 截斷點落在 surrogate pair 中間
        let payload = format!("{}\u{1F600}tail", "a".repeat(29));
        assert_eq!(derive_file_stem(&payload), format!("{}_", "a".repeat(29)));
    }

    #[test]
    fn test_empty_payload_falls_back() {
        assert_eq!(derive_file_stem(""), DEFAULT_FILE_STEM);
        assert_eq!(derive_filename("", OutputFormat::Svg), "qr-code.svg");
    }

    #[test]
    fn test_vcard_payload() {
        assert_eq!(
            derive_filename("BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane;;;", OutputFormat::Png),
            "begin_vcard_version_3_0_n_doe_.png"
        );
    }
}
