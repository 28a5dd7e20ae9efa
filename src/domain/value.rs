use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

/// Declares a server-assigned identifier newtype.
///
/// Identifiers are interpolated into request paths, so path delimiters and
/// whitespace are rejected up front.
macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            /// JSON field name used by the Sendly API.
            pub const FIELD: &'static str = $field;

            /// Create a validated identifier (trimmed, non-empty, no path delimiters).
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: Self::FIELD });
                }
                if trimmed
                    .chars()
                    .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace())
                {
                    return Err(ValidationError::InvalidId {
                        field: Self::FIELD,
                        input: trimmed.to_owned(),
                    });
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Borrow the validated identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

resource_id!(
    /// Message id returned by `POST /v1/messages`.
    MessageId,
    "messageId"
);
resource_id!(
    /// Batch id returned by `POST /v1/messages/batch`.
    BatchId,
    "batchId"
);
resource_id!(
    /// Contact id.
    ContactId,
    "contactId"
);
resource_id!(
    /// Contact list id.
    ContactListId,
    "listId"
);
resource_id!(
    /// Campaign id.
    CampaignId,
    "campaignId"
);
resource_id!(
    /// Webhook subscription id.
    WebhookId,
    "webhookId"
);
resource_id!(
    /// API key id (not the secret key itself).
    ApiKeyId,
    "keyId"
);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id (`from`).
///
/// Invariant: non-empty after trimming. The value must be enabled on your account.
pub struct SenderId(String);

impl SenderId {
    /// JSON field name used by the Sendly API (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// JSON field name used by the Sendly API (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form, which is also
/// what goes on the wire.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// JSON field name used by the Sendly API (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse a number that carries an explicit `+<country>` prefix.
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        Self::parse(None, input)
    }

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Point in time for scheduled sends (`scheduledAt`), ISO 8601 as accepted by the API.
///
/// Invariant: non-empty after trimming. The server validates the format and
/// rejects times in the past.
pub struct ScheduledAt(String);

impl ScheduledAt {
    /// JSON field name used by the Sendly API (`scheduledAt`).
    pub const FIELD: &'static str = "scheduledAt";

    /// Create a validated schedule time.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the timestamp.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Target URL of a webhook subscription.
///
/// Invariant: absolute `https` URL.
pub struct WebhookUrl(url::Url);

impl WebhookUrl {
    /// JSON field name used by the Sendly API (`url`).
    pub const FIELD: &'static str = "url";

    /// Parse and validate a webhook URL.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let invalid = || ValidationError::InvalidUrl {
            field: Self::FIELD,
            input: raw.to_owned(),
        };
        let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
        if parsed.scheme() != "https" || parsed.host_str().is_none() {
            return Err(invalid());
        }
        Ok(Self(parsed))
    }

    /// Borrow the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Shared secret used to sign webhook deliveries.
///
/// Invariant: non-empty. Used byte-for-byte as the HMAC key. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub const FIELD: &'static str = "secret";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret. Avoid logging it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WebhookSecret {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Page size for list endpoints (`limit`).
///
/// Invariant: `1..=100`.
pub struct PageLimit(u32);

impl PageLimit {
    /// Query parameter name (`limit`).
    pub const FIELD: &'static str = "limit";

    /// Minimum page size.
    pub const MIN: u32 = 1;
    /// Maximum page size.
    pub const MAX: u32 = 100;

    /// Create a validated page size.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying page size.
    pub fn value(self) -> u32 {
        self.0
    }
}
