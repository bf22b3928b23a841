use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Redacts credentials from strings before they are logged or stored
///
/// External services sometimes echo request details (URLs with `key=`,
/// header values) back in error bodies.
#[derive(Clone)]
pub struct SecretScrubber {
    google_key_pattern: Regex,
    token_pattern: Regex,
    bearer_pattern: Regex,
    query_key_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new secret scrubber
    pub fn new() -> Self {
        Self {
            // Google API keys: AIza followed by 35 url-safe characters
            google_key_pattern: Regex::new(r"AIza[0-9A-Za-z_\-]{35}")
                .expect("google key pattern is valid"),
            // api_key / x-rapidapi-key / token / secret fields
            token_pattern: Regex::new(
                r#"(?i)["']?(?:x-rapidapi-key|x-goog-api-key|api_key|apikey|token|secret)["']?\s*[:=]\s*["']?[a-zA-Z0-9\-_.]{8,}["']?"#,
            )
            .expect("token pattern is valid"),
            bearer_pattern: Regex::new(r"Bearer\s+[a-zA-Z0-9\-_.]+")
                .expect("bearer pattern is valid"),
            query_key_pattern: Regex::new(r"([?&]key=)[^&\s]+").expect("query pattern is valid"),
        }
    }

    /// Shared instance
    pub fn global() -> &'static Self {
        static SCRUBBER: OnceLock<SecretScrubber> = OnceLock::new();
        SCRUBBER.get_or_init(Self::new)
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let mut scrubbed = self
            .google_key_pattern
            .replace_all(message, "[API_KEY_REDACTED]")
            .to_string();
        scrubbed = self
            .bearer_pattern
            .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]")
            .to_string();
        scrubbed = self
            .query_key_pattern
            .replace_all(&scrubbed, "${1}[REDACTED]")
            .to_string();
        scrubbed = self
            .token_pattern
            .replace_all(&scrubbed, |caps: &regex::Captures| {
                let full_match = &caps[0];
                if let Some(colon_pos) = full_match.find(':') {
                    format!("{}:[REDACTED]", &full_match[..colon_pos])
                } else if let Some(eq_pos) = full_match.find('=') {
                    format!("{}=[REDACTED]", &full_match[..eq_pos])
                } else {
                    "[REDACTED]".to_string()
                }
            })
            .to_string();
        scrubbed
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// Scrub with the shared instance
pub fn scrub(message: &str) -> String {
    SecretScrubber::global().scrub_message(message)
}
