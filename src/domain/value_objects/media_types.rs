use anyhow::{Result, bail};

pub const SUPPORTED_VIDEO_MEDIA_TYPE: &str = "video/mp4";
pub const FALLBACK_EXTENSION: &str = ".bin";

/// Maps `type/subtype` to `.subtype`, anything else to [`FALLBACK_EXTENSION`].
pub fn media_type_to_ext(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return FALLBACK_EXTENSION.to_string();
    }
    format!(".{}", parts[1])
}

/// Parses a `Content-Type` header value down to its lower-cased essence, dropping parameters.
pub fn parse_media_type(raw: &str) -> Result<String> {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    if essence.is_empty() {
        bail!("media type is empty");
    }

    let Some((kind, subtype)) = essence.split_once('/') else {
        bail!("media type `{}` has no subtype", essence);
    };

    if !is_token(kind) || !is_token(subtype) {
        bail!("media type `{}` is malformed", essence);
    }

    Ok(essence.to_ascii_lowercase())
}

// RFC 2045 tspecials, excluding the space already ruled out by `is_ascii_graphic`.
const TSPECIALS: &[char] = &[
    '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '[', ']', '?', '=',
];

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_graphic() && !TSPECIALS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_media_types_map_to_subtype() {
        assert_eq!(media_type_to_ext("video/mp4"), ".mp4");
        assert_eq!(media_type_to_ext("image/png"), ".png");
        assert_eq!(media_type_to_ext("application/x-matroska"), ".x-matroska");
    }

    #[test]
    fn media_types_without_exactly_one_slash_fall_back() {
        for raw in ["", "mp4", "video", "video/mp4/extra", "a/b/c/d"] {
            assert_eq!(media_type_to_ext(raw), FALLBACK_EXTENSION, "input: {raw:?}");
        }
    }

    #[test]
    fn parse_drops_parameters_and_lowercases() {
        assert_eq!(
            parse_media_type("Video/MP4; codecs=\"avc1.42E01E\"").unwrap(),
            "video/mp4"
        );
        assert_eq!(parse_media_type("  video/mp4  ").unwrap(), "video/mp4");
    }

    #[test]
    fn parse_rejects_malformed_values() {
        for raw in [
            "",
            ";charset=utf-8",
            "video",
            "video/",
            "/mp4",
            "video/mp4/x",
            "vid eo/mp4",
            "video/mp4=x",
        ] {
            assert!(parse_media_type(raw).is_err(), "input: {raw:?}");
        }
    }
}
