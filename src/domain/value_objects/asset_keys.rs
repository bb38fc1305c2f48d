use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

use super::media_types::media_type_to_ext;

pub const ASSET_ID_BYTES: usize = 32;

/// Random, URL-safe object name: `<base64url(32 random bytes)><ext>`.
///
/// Panics if the OS random source is unavailable; there is no sensible way to continue
/// handling uploads without it.
pub fn generate_asset_key(media_type: &str) -> String {
    let mut base = [0u8; ASSET_ID_BYTES];
    OsRng.fill_bytes(&mut base);
    let id = URL_SAFE_NO_PAD.encode(base);

    format!("{}{}", id, media_type_to_ext(media_type))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetKey {
    pub prefix: String,
    pub name: String,
}

impl AssetKey {
    pub fn new(prefix: impl Into<String>, media_type: &str) -> Self {
        Self {
            prefix: prefix.into(),
            name: generate_asset_key(media_type),
        }
    }

    pub fn object_key(&self) -> String {
        format!("{}/{}", self.prefix, self.name)
    }

    pub fn public_url(&self, distribution_host: &str) -> String {
        format!("https://{}/{}", distribution_host, self.object_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 32 bytes -> ceil(32 * 4 / 3) unpadded base64 characters
    const ENCODED_ID_LEN: usize = 43;

    #[test]
    fn key_is_unpadded_id_plus_extension() {
        let key = generate_asset_key("video/mp4");

        assert_eq!(key.len(), ENCODED_ID_LEN + ".mp4".len());
        assert!(key.ends_with(".mp4"));
        assert!(!key.contains('='));

        let id = &key[..ENCODED_ID_LEN];
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn unknown_media_type_gets_fallback_extension() {
        let key = generate_asset_key("garbage");
        assert_eq!(key.len(), ENCODED_ID_LEN + ".bin".len());
        assert!(key.ends_with(".bin"));
    }

    #[test]
    fn successive_keys_differ() {
        assert_ne!(generate_asset_key("video/mp4"), generate_asset_key("video/mp4"));
    }

    #[test]
    fn object_key_and_url_include_prefix() {
        let key = AssetKey {
            prefix: "landscape".to_string(),
            name: "abc.mp4".to_string(),
        };

        assert_eq!(key.object_key(), "landscape/abc.mp4");
        assert_eq!(
            key.public_url("d111111abcdef8.cloudfront.net"),
            "https://d111111abcdef8.cloudfront.net/landscape/abc.mp4"
        );
    }
}
