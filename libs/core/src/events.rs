//! Non-message callbacks delivered alongside (or instead of) chat messages.

use serde_json::Value;

/// Entry keys that describe the message envelope rather than an event.
pub const ENVELOPE_FIELDS: [&str; 4] = ["sender", "recipient", "timestamp", "message"];

/// Platform callback that is not a chat message.
///
/// Every variant wraps the full messaging entry it was classified from, so the
/// originating `sender` stays reachable.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Postback(Value),
    Referral(Value),
    Optin(Value),
    Delivery(Value),
    Read(Value),
    CheckoutUpdate(Value),
    Generic { name: String, payload: Value },
}

type EventCtor = fn(Value) -> DriverEvent;

const REGISTERED_EVENTS: &[(&str, EventCtor)] = &[
    ("postback", DriverEvent::Postback),
    ("referral", DriverEvent::Referral),
    ("optin", DriverEvent::Optin),
    ("delivery", DriverEvent::Delivery),
    ("read", DriverEvent::Read),
    ("checkout_update", DriverEvent::CheckoutUpdate),
];

impl DriverEvent {
    /// Maps an entry field name to its event variant, defaulting to [`DriverEvent::Generic`].
    ///
    /// ```
    /// use gsm_core::DriverEvent;
    /// use serde_json::json;
    ///
    /// let event = DriverEvent::from_field("delivery", json!({}));
    /// assert_eq!(event.name(), "messaging_deliveries");
    ///
    /// let unknown = DriverEvent::from_field("reaction", json!({}));
    /// assert_eq!(unknown.name(), "reaction");
    /// ```
    pub fn from_field(name: &str, payload: Value) -> Self {
        match REGISTERED_EVENTS.iter().find(|(field, _)| *field == name) {
            Some((_, ctor)) => ctor(payload),
            None => DriverEvent::Generic {
                name: name.to_string(),
                payload,
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DriverEvent::Postback(_) => "messaging_postbacks",
            DriverEvent::Referral(_) => "messaging_referrals",
            DriverEvent::Optin(_) => "messaging_optins",
            DriverEvent::Delivery(_) => "messaging_deliveries",
            DriverEvent::Read(_) => "messaging_reads",
            DriverEvent::CheckoutUpdate(_) => "messaging_checkout_updates",
            DriverEvent::Generic { name, .. } => name,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            DriverEvent::Postback(p)
            | DriverEvent::Referral(p)
            | DriverEvent::Optin(p)
            | DriverEvent::Delivery(p)
            | DriverEvent::Read(p)
            | DriverEvent::CheckoutUpdate(p) => p,
            DriverEvent::Generic { payload, .. } => payload,
        }
    }

    /// Id of the user that triggered the event, when the entry names one.
    pub fn sender_id(&self) -> Option<String> {
        json_id(self.payload().get("sender")?.get("id")?)
    }
}

/// First field of `entry` that is not part of the message envelope.
///
/// ```
/// use gsm_core::events::event_field;
/// use serde_json::json;
///
/// let entry = json!({"sender": {"id": "1"}, "timestamp": 1, "postback": {"payload": "x"}});
/// assert_eq!(event_field(&entry), Some("postback"));
/// assert_eq!(event_field(&json!({"sender": {}, "message": {}})), None);
/// ```
pub fn event_field(entry: &Value) -> Option<&str> {
    entry
        .as_object()?
        .keys()
        .map(String::as_str)
        .find(|key| !ENVELOPE_FIELDS.contains(key))
}

/// Renders a platform id that may arrive as a JSON string or number.
pub fn json_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
