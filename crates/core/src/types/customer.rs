//! Customer service wire types.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::email::Email;
use super::id::CustomerId;

/// A customer as returned by the customer service.
///
/// The password never appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /customers/`.
///
/// The password is write-only: held as a [`SecretString`] so it is redacted
/// from `Debug` output and logs, and exposed exactly once while serializing
/// the request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub email: Email,
    #[serde(serialize_with = "expose_password")]
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
}

fn expose_password<S>(password: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(password.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewCustomer {
        NewCustomer {
            email: Email::parse("jane@example.com").expect("valid email"),
            password: SecretString::from("hunter2hunter2"),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            phone_number: None,
            shipping_address: Some("1 Main St".to_string()),
        }
    }

    #[test]
    fn password_reaches_the_wire_but_not_debug() {
        let payload = sample();
        let debug = format!("{payload:?}");
        assert!(!debug.contains("hunter2hunter2"));

        let json = serde_json::to_value(&payload).expect("serialize failed");
        assert_eq!(json["password"], "hunter2hunter2");
        assert_eq!(json["email"], "jane@example.com");
    }

    #[test]
    fn optional_fields_are_omitted_when_unset() {
        let json = serde_json::to_value(sample()).expect("serialize failed");
        assert!(json.get("phone_number").is_none());
        assert_eq!(json["shipping_address"], "1 Main St");
    }
}
