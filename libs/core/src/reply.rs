use crate::templates::{ButtonTemplate, GenericTemplate, ListTemplate, ReceiptTemplate, Template};
use crate::types::{OutgoingMessage, Question};

/// Everything a driver knows how to serialize for the platform.
///
/// Payload builders match on this exhaustively, so the resolution order
/// (question, template, attachment, text) lives in a single `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Question(Question),
    Template(Template),
    Message(OutgoingMessage),
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::Text(value.to_string())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::Text(value)
    }
}

impl From<Question> for Reply {
    fn from(value: Question) -> Self {
        Reply::Question(value)
    }
}

impl From<Template> for Reply {
    fn from(value: Template) -> Self {
        Reply::Template(value)
    }
}

impl From<OutgoingMessage> for Reply {
    fn from(value: OutgoingMessage) -> Self {
        Reply::Message(value)
    }
}

macro_rules! template_reply {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Reply {
                fn from(value: $ty) -> Self {
                    Reply::Template(Template::from(value))
                }
            }
        )+
    };
}

template_reply!(ButtonTemplate, GenericTemplate, ListTemplate, ReceiptTemplate);
