use super::classify::message_text;
use gsm_core::events::json_id;
use gsm_core::{Answer, IncomingMessage};
use serde_json::Value;

/// One message per entry, keeping positions; never empty.
pub(crate) fn messages(entries: &[Value]) -> Vec<IncomingMessage> {
    if entries.is_empty() {
        return vec![IncomingMessage::empty()];
    }
    entries.iter().map(message).collect()
}

fn message(entry: &Value) -> IncomingMessage {
    match message_text(entry) {
        Some(text) => IncomingMessage::new(
            text,
            id_at(entry, "/sender/id"),
            id_at(entry, "/recipient/id"),
            entry.clone(),
        ),
        None => IncomingMessage::empty(),
    }
}

fn id_at(entry: &Value, pointer: &str) -> String {
    entry.pointer(pointer).and_then(json_id).unwrap_or_default()
}

pub(crate) fn answer(message: &IncomingMessage) -> Answer {
    let answer = Answer::new(message.text(), message.clone());
    match message
        .payload()
        .pointer("/message/quick_reply/payload")
        .and_then(Value::as_str)
    {
        Some(value) => answer.interactive(value),
        None => answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_without_text_become_placeholders() {
        let entries = vec![
            json!({"sender": {"id": "1"}, "recipient": {"id": "2"}, "message": {"text": "hi"}}),
            json!({"sender": {"id": "1"}, "delivery": {"mids": []}}),
        ];
        let messages = messages(&entries);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), "hi");
        assert_eq!(messages[0].sender(), "1");
        assert_eq!(messages[0].recipient(), "2");
        assert!(messages[1].is_empty());
    }

    #[test]
    fn empty_text_entry_keeps_sender_and_payload() {
        let entries = vec![
            json!({"sender": {"id": "1"}, "message": {"text": "hi"}}),
            json!({
                "sender": {"id": "5"},
                "recipient": {"id": "2"},
                "message": {"text": "", "quick_reply": {"payload": "y"}}
            }),
        ];
        let messages = messages(&entries);
        assert_eq!(messages[1].text(), "");
        assert_eq!(messages[1].sender(), "5");
        assert_eq!(messages[1].recipient(), "2");
        assert_eq!(messages[1].payload(), &entries[1]);
        assert_eq!(answer(&messages[1]).value(), "y");
    }

    #[test]
    fn no_entries_yield_single_placeholder() {
        let messages = messages(&[]);
        assert_eq!(messages, vec![IncomingMessage::empty()]);
    }

    #[test]
    fn quick_reply_answers_are_interactive() {
        let entry = json!({
            "sender": {"id": "1"},
            "message": {"text": "Yes", "quick_reply": {"payload": "y"}}
        });
        let tapped = answer_for(entry);
        assert!(tapped.is_interactive_reply());
        assert_eq!(tapped.value(), "y");
        assert_eq!(tapped.text(), "Yes");

        let typed = answer_for(json!({"sender": {"id": "1"}, "message": {"text": "yes"}}));
        assert!(!typed.is_interactive_reply());
        assert_eq!(typed.value(), "");
    }

    fn answer_for(entry: Value) -> Answer {
        answer(&message(&entry))
    }
}
