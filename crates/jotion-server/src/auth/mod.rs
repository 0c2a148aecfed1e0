mod jwt;
mod middleware;

pub use jwt::{create_access_token, verify_access_token, Claims};
pub use middleware::identity_middleware;

/// The authenticated user an operation runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Stable identifier of the user, as issued by the identity provider.
    pub subject: String,
}

impl CallerIdentity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}
