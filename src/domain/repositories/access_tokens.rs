use anyhow::Result;
use mockall::automock;
use uuid::Uuid;

#[automock]
pub trait AccessTokenValidator {
    /// Returns the user id the token was issued for.
    fn validate(&self, token: &str) -> Result<Uuid>;
}
