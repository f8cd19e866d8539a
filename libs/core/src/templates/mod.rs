//! Rich outgoing templates.
//!
//! Each template renders to an `attachment` object of type `template` whose payload
//! carries a `template_type` discriminator. Drivers that support templates use the
//! rendered value verbatim as the message body.

mod button;
mod generic;
mod list;
mod receipt;

pub use button::{ButtonTemplate, ElementButton, ElementButtonKind, WebviewHeightRatio};
pub use generic::{DefaultAction, Element, GenericTemplate, ImageAspectRatio};
pub use list::{ListTemplate, TopElementStyle};
pub use receipt::{
    ReceiptAddress, ReceiptAdjustment, ReceiptElement, ReceiptSummary, ReceiptTemplate,
};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Closed set of supported templates.
///
/// ```
/// use gsm_core::templates::{ButtonTemplate, ElementButton, Template};
///
/// let template = Template::from(
///     ButtonTemplate::new("Pick one").add_button(ElementButton::postback("A", "a")),
/// );
/// let value = template.to_value();
/// assert_eq!(value["attachment"]["type"], "template");
/// assert_eq!(value["attachment"]["payload"]["template_type"], "button");
/// assert_eq!(value["attachment"]["payload"]["text"], "Pick one");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template_type", rename_all = "lowercase")]
pub enum Template {
    Button(ButtonTemplate),
    Generic(GenericTemplate),
    List(ListTemplate),
    Receipt(ReceiptTemplate),
}

impl Template {
    pub fn template_type(&self) -> &'static str {
        match self {
            Template::Button(_) => "button",
            Template::Generic(_) => "generic",
            Template::List(_) => "list",
            Template::Receipt(_) => "receipt",
        }
    }

    /// Renders the message body for platforms with native template support.
    pub fn to_value(&self) -> Value {
        json!({
            "attachment": {
                "type": "template",
                "payload": self,
            }
        })
    }

    /// Plain-text rendition for platforms without template support.
    pub fn fallback_text(&self) -> String {
        match self {
            Template::Button(t) => t.text.clone(),
            Template::Generic(t) => element_titles(&t.elements),
            Template::List(t) => element_titles(&t.elements),
            Template::Receipt(t) => format!(
                "Order {}: {} {}",
                t.order_number, t.summary.total_cost, t.currency
            ),
        }
    }
}

fn element_titles(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| match &e.subtitle {
            Some(subtitle) => format!("{}\n{}", e.title, subtitle),
            None => e.title.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl From<ButtonTemplate> for Template {
    fn from(value: ButtonTemplate) -> Self {
        Template::Button(value)
    }
}

impl From<GenericTemplate> for Template {
    fn from(value: GenericTemplate) -> Self {
        Template::Generic(value)
    }
}

impl From<ListTemplate> for Template {
    fn from(value: ListTemplate) -> Self {
        Template::List(value)
    }
}

impl From<ReceiptTemplate> for Template {
    fn from(value: ReceiptTemplate) -> Self {
        Template::Receipt(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_template_renders_elements() {
        let template = Template::from(
            GenericTemplate::new().add_element(
                Element::new("BotMan")
                    .subtitle("Chatbots")
                    .image("https://example.com/logo.png")
                    .add_button(ElementButton::web_url("Visit", "https://example.com")),
            ),
        );
        let value = template.to_value();
        assert_eq!(
            value,
            json!({
                "attachment": {
                    "type": "template",
                    "payload": {
                        "template_type": "generic",
                        "image_aspect_ratio": "horizontal",
                        "elements": [{
                            "title": "BotMan",
                            "subtitle": "Chatbots",
                            "image_url": "https://example.com/logo.png",
                            "buttons": [{
                                "type": "web_url",
                                "title": "Visit",
                                "url": "https://example.com"
                            }]
                        }]
                    }
                }
            })
        );
    }

    #[test]
    fn list_template_carries_global_button_and_style() {
        let template = Template::from(
            ListTemplate::new()
                .use_compact_view()
                .add_element(Element::new("One"))
                .add_element(Element::new("Two"))
                .add_global_button(ElementButton::postback("More", "MORE")),
        );
        let payload = &template.to_value()["attachment"]["payload"];
        assert_eq!(payload["template_type"], "list");
        assert_eq!(payload["top_element_style"], "compact");
        assert_eq!(payload["elements"].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["buttons"][0]["payload"], "MORE");
    }

    #[test]
    fn receipt_template_serializes_summary_and_address() {
        let template = Template::from(
            ReceiptTemplate::new("Jane", "12345", "USD", "Visa 1234")
                .add_element(ReceiptElement::new("Shirt", 20.0).quantity(2))
                .address(ReceiptAddress {
                    street_1: "1 Main St".into(),
                    street_2: None,
                    city: "Springfield".into(),
                    postal_code: "99999".into(),
                    state: "OR".into(),
                    country: "US".into(),
                })
                .summary(ReceiptSummary {
                    subtotal: Some(40.0),
                    total_cost: 42.5,
                    ..Default::default()
                })
                .add_adjustment(ReceiptAdjustment {
                    name: "Coupon".into(),
                    amount: 5.0,
                }),
        );
        let payload = &template.to_value()["attachment"]["payload"];
        assert_eq!(payload["template_type"], "receipt");
        assert_eq!(payload["recipient_name"], "Jane");
        assert_eq!(payload["elements"][0]["quantity"], 2);
        assert_eq!(payload["address"]["city"], "Springfield");
        assert_eq!(payload["summary"]["total_cost"], 42.5);
        assert!(payload["summary"].get("total_tax").is_none());
        assert_eq!(payload["adjustments"][0]["name"], "Coupon");
    }

    #[test]
    fn fallback_text_uses_titles() {
        let template = Template::from(
            GenericTemplate::new()
                .add_element(Element::new("A").subtitle("a"))
                .add_element(Element::new("B")),
        );
        assert_eq!(template.fallback_text(), "A\na\n\nB");
        let button = Template::from(ButtonTemplate::new("Choose"));
        assert_eq!(button.fallback_text(), "Choose");
    }
}
