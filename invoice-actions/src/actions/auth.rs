use super::InvoiceActions;
use crate::models::FormData;
use crate::services::{Principal, SignInError, CREDENTIALS_PROVIDER};
use tracing::{instrument, warn};

/// Returned to the login form when the provider rejects the credentials.
pub const CREDENTIAL_SIGNIN: &str = "CredentialSignin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(Principal),
    /// Carries [`CREDENTIAL_SIGNIN`].
    Rejected(&'static str),
}

impl InvoiceActions {
    /// Sign in with the whole form as the credential payload.
    ///
    /// A provider error whose message mentions `CredentialsSignin` becomes
    /// [`AuthOutcome::Rejected`]; every other error is returned to the caller.
    #[instrument(skip_all)]
    pub async fn authenticate(
        &self,
        _previous_state: Option<&str>,
        form: &FormData,
    ) -> Result<AuthOutcome, SignInError> {
        match self.credentials.sign_in(CREDENTIALS_PROVIDER, form).await {
            Ok(principal) => Ok(AuthOutcome::SignedIn(principal)),
            Err(e) if e.to_string().contains("CredentialsSignin") => {
                warn!("Sign-in rejected");
                Ok(AuthOutcome::Rejected(CREDENTIAL_SIGNIN))
            }
            Err(e) => Err(e),
        }
    }
}
