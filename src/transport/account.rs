use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value, json};

use crate::domain::{Account, ApiKeyId, ApiKeyInfo, CreateApiKey, Credits};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountWire {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<AccountWire> for Account {
    fn from(value: AccountWire) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreditsWire {
    #[serde(deserialize_with = "credit_amount")]
    balance: String,
    #[serde(
        default,
        alias = "reservedBalance",
        deserialize_with = "optional_credit_amount"
    )]
    reserved: Option<String>,
    #[serde(
        default,
        alias = "availableBalance",
        deserialize_with = "optional_credit_amount"
    )]
    available: Option<String>,
}

impl From<CreditsWire> for Credits {
    fn from(value: CreditsWire) -> Self {
        Self {
            balance: value.balance,
            reserved: value.reserved,
            available: value.available,
        }
    }
}

/// Credit amounts arrive as JSON numbers or decimal strings. Number tokens are
/// kept as written so `10.50` does not turn into `10.5`.
fn credit_amount<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    amount_text(raw.get()).ok_or_else(|| {
        D::Error::custom(format!("expected a decimal credit amount, got {}", raw.get()))
    })
}

fn optional_credit_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Amount(#[serde(deserialize_with = "credit_amount")] String);

    Ok(Option::<Amount>::deserialize(deserializer)?.map(|amount| amount.0))
}

fn amount_text(token: &str) -> Option<String> {
    match token.as_bytes().first()? {
        b'-' | b'0'..=b'9' => Some(token.to_owned()),
        b'"' => {
            let text = serde_json::from_str::<String>(token).ok()?;
            let text = text.trim();
            is_decimal(text).then(|| text.to_owned())
        }
        _ => None,
    }
}

fn is_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.is_none_or(all_digits)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiKeyWire {
    id: ApiKeyId,
    name: String,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_used_at: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

impl From<ApiKeyWire> for ApiKeyInfo {
    fn from(value: ApiKeyWire) -> Self {
        Self {
            id: value.id,
            name: value.name,
            prefix: value.prefix,
            key: value.key,
            created_at: value.created_at,
            last_used_at: value.last_used_at,
            expires_at: value.expires_at,
        }
    }
}

pub(crate) fn encode_create_api_key(request: &CreateApiKey) -> Value {
    let mut body = Map::new();
    body.insert("name".to_owned(), json!(request.name()));
    if let Some(days) = request.expires_in_days() {
        body.insert("expiresInDays".to_owned(), json!(days));
    }
    Value::Object(body)
}
