#[derive(Debug, Clone, Default)]
pub struct TelemetryLabels {
    pub driver: String,
    pub chat_id: Option<String>,
    pub msg_id: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl TelemetryLabels {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Default::default()
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn tags(&self) -> Vec<(String, String)> {
        let mut tags = Vec::with_capacity(3 + self.extra.len());
        tags.push(("driver".into(), self.driver.clone()));
        if let Some(chat) = &self.chat_id {
            tags.push(("chat_id".into(), chat.clone()));
        }
        if let Some(msg) = &self.msg_id {
            tags.push(("msg_id".into(), msg.clone()));
        }
        for (key, value) in &self.extra {
            tags.push((key.clone(), value.clone()));
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_start_with_driver() {
        let mut labels = TelemetryLabels::new("facebook").with("event", "messaging_reads");
        labels.chat_id = Some("c-1".into());
        assert_eq!(
            labels.tags(),
            vec![
                ("driver".to_string(), "facebook".to_string()),
                ("chat_id".to_string(), "c-1".to_string()),
                ("event".to_string(), "messaging_reads".to_string()),
            ]
        );
    }
}
