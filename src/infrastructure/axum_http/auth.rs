use anyhow::{Result, anyhow};
use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| anyhow!("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| anyhow!("Invalid Authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| anyhow!("Invalid Authorization header format"))?
        .trim();

    if token.is_empty() {
        return Err(anyhow!("Missing bearer token"));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(get_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(get_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        assert!(get_bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(get_bearer_token(&headers_with("Bearer ")).is_err());
        assert!(get_bearer_token(&headers_with("abc.def.ghi")).is_err());
    }
}
