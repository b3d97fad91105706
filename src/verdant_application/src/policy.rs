use url::Url;
use verdant_core::EmailAddress;

const CONFIRM_EMAIL_PATH: &str = "confirm-email";
const RESET_PASSWORD_PATH: &str = "reset-password";

/// Settings the verification use cases need: how long keys stay usable and
/// where the links in outgoing messages point.
#[derive(Debug, Clone)]
pub struct VerificationPolicy {
    pub email_confirmation_expiry_hours: u32,
    pub password_reset_expiry_hours: u32,
    link_base_url: Url,
}

impl VerificationPolicy {
    /// `link_base_url` is the frontend page prefix. A trailing slash is
    /// appended if missing so that links are built below it.
    pub fn new(
        email_confirmation_expiry_hours: u32,
        password_reset_expiry_hours: u32,
        mut link_base_url: Url,
    ) -> Self {
        if !link_base_url.path().ends_with('/') {
            let path = format!("{}/", link_base_url.path());
            link_base_url.set_path(&path);
        }

        Self {
            email_confirmation_expiry_hours,
            password_reset_expiry_hours,
            link_base_url,
        }
    }

    pub fn link_base_url(&self) -> &Url {
        &self.link_base_url
    }

    pub fn email_confirmation_link(
        &self,
        address: &EmailAddress,
        key: &str,
    ) -> Result<Url, url::ParseError> {
        self.link(CONFIRM_EMAIL_PATH, address, key)
    }

    pub fn password_reset_link(
        &self,
        address: &EmailAddress,
        key: &str,
    ) -> Result<Url, url::ParseError> {
        self.link(RESET_PASSWORD_PATH, address, key)
    }

    fn link(&self, path: &str, address: &EmailAddress, key: &str) -> Result<Url, url::ParseError> {
        let mut url = self.link_base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("email", address.as_str())
            .append_pair("key", key);
        Ok(url)
    }
}
