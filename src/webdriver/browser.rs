//! Browser launch options and WhatsApp Web deep links.

use crate::domain::CanonicalNumber;
use std::fs;
use std::path::PathBuf;

/// Chrome options used for every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Profile directory reused across runs so the QR login persists
    pub user_data_dir: Option<PathBuf>,

    /// Additional raw Chrome flags
    pub extra_args: Vec<String>,
}

impl BrowserOptions {
    pub fn new(user_data_dir: Option<PathBuf>) -> Self {
        Self {
            user_data_dir,
            extra_args: Vec::new(),
        }
    }

    /// Command-line flags passed to Chrome through `goog:chromeOptions`.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec!["--disable-notifications".to_string()];
        if let Some(dir) = &self.user_data_dir {
            args.push(format!("--user-data-dir={}", dir.display()));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Create the profile directory if needed.
    ///
    /// A directory that cannot be created is dropped with a warning and the
    /// browser runs with a throwaway profile instead.
    pub fn prepare_profile(mut self) -> Self {
        if let Some(dir) = &self.user_data_dir {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!(
                    "Could not create browser profile directory {}: {}. Continuing without a persistent profile",
                    dir.display(),
                    e
                );
                self.user_data_dir = None;
            }
        }
        self
    }
}

/// URL that opens a chat with `recipient` and `message` prefilled.
///
/// The phone parameter carries the digits without the leading `+`; the
/// message is percent-encoded.
pub fn deep_link(web_client_url: &str, recipient: &CanonicalNumber, message: &str) -> String {
    format!(
        "{}/send?phone={}&text={}",
        web_client_url.trim_end_matches('/'),
        recipient.digits_only(),
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_link_encodes_message() {
        let recipient = CanonicalNumber::new("+905551234567").unwrap();
        let url = deep_link("https://web.whatsapp.com/", &recipient, "Merhaba & hoş geldin");

        assert_eq!(
            url,
            "https://web.whatsapp.com/send?phone=905551234567&text=Merhaba%20%26%20ho%C5%9F%20geldin"
        );
    }

    #[test]
    fn test_deep_link_multiline_message() {
        let recipient = CanonicalNumber::new("+15551234567").unwrap();
        let url = deep_link("https://web.whatsapp.com", &recipient, "line one\nline two");
        assert!(url.ends_with("text=line%20one%0Aline%20two"));
    }

    #[test]
    fn test_chrome_args() {
        let options = BrowserOptions::default();
        assert_eq!(options.chrome_args(), vec!["--disable-notifications"]);

        let options = BrowserOptions::new(Some(PathBuf::from("/tmp/profile")));
        assert_eq!(
            options.chrome_args(),
            vec!["--disable-notifications", "--user-data-dir=/tmp/profile"]
        );
    }

    #[test]
    fn test_prepare_profile_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested").join("profile");

        let options = BrowserOptions::new(Some(dir.clone())).prepare_profile();
        assert!(dir.is_dir());
        assert_eq!(options.user_data_dir, Some(dir));
    }

    #[test]
    fn test_prepare_profile_falls_back_when_path_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let dir = file.path().join("profile");

        let options = BrowserOptions::new(Some(dir)).prepare_profile();
        assert!(options.user_data_dir.is_none());
    }
}
