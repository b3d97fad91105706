pub mod env {
    pub const ENV_PREFIX: &str = "VERDANT";
    pub const ENV_SEPARATOR: &str = "__";
    pub const SETTINGS_FILE_ENV_VAR: &str = "VERDANT_SETTINGS_FILE";
}

pub const DEFAULT_SETTINGS_FILE: &str = "config/account_service";

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod email_client {
        use std::time::Duration;

        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
