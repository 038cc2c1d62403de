/*
 * Converts arbitrary text to and from the token stored in a URL fragment.
 * Text is first taken as its UTF-8 byte sequence, so the full Unicode range
 * survives, and those bytes are then base64 encoded with the standard
 * alphabet (every symbol of which is legal inside a fragment). Decoding
 * reverses exactly that sequence and reports malformed tokens as a
 * `DecodeError` instead of truncating.
 */
use base64::Engine as _;
use base64::engine::general_purpose;

#[derive(Debug)]
pub enum DecodeError {
    Base64(base64::DecodeError),
    Utf8(std::string::FromUtf8Error),
}

impl From<base64::DecodeError> for DecodeError {
    fn from(err: base64::DecodeError) -> Self {
        DecodeError::Base64(err)
    }
}

impl From<std::string::FromUtf8Error> for DecodeError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DecodeError::Utf8(err)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Base64(e) => write!(f, "Fragment is not valid base64: {e}"),
            DecodeError::Utf8(e) => write!(f, "Fragment does not decode to UTF-8 text: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Base64(e) => Some(e),
            DecodeError::Utf8(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub fn encode(text: &str) -> String {
    general_purpose::STANDARD.encode(text.as_bytes())
}

pub fn decode(token: &str) -> Result<String> {
    let bytes = general_purpose::STANDARD.decode(token.trim())?;
    let text = String::from_utf8(bytes)?;
    log::trace!(
        "Codec: Decoded token of {} chars into {} bytes of text.",
        token.len(),
        text.len()
    );
    Ok(text)
}
