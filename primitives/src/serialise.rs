//! Text serialisation of binary artifacts.
//!
//! Binary artifacts are wrapped in standard base64 (RFC 4648 alphabet `A-Z a-z 0-9 + /`, `=`
//! padding) wherever raw bytes cannot be carried.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Wrap `bytes` in text-safe base64.
pub fn to_text(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Unwrap base64 text. Leading and trailing whitespace is ignored, anything else outside the
/// alphabet or a bad padding is an [`Error::Encoding`](crate::error::Error::Encoding).
pub fn from_text(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text.trim())?)
}

#[cfg(test)]
mod test {
    use crate::error::Error;

    use super::*;

    #[test]
    fn test_text() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = to_text(&bytes);
        assert!(text.ends_with('='));
        assert_eq!(from_text(&text).unwrap(), bytes);
        assert_eq!(from_text(&format!("  {}\n", text)).unwrap(), bytes);
        assert_eq!(to_text(b"hb"), "aGI=");
    }

    #[test]
    fn test_text_rejects_foreign_characters() {
        assert!(matches!(from_text("aGI*"), Err(Error::Encoding(_))));
        assert!(matches!(from_text("aG-="), Err(Error::Encoding(_))));
        assert!(matches!(from_text("aGI"), Err(Error::Encoding(_))));
        assert!(matches!(from_text("aG I="), Err(Error::Encoding(_))));
    }
}
