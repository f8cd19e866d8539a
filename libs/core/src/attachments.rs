use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator for [`Attachment`] variants.
///
/// ```
/// use gsm_core::AttachmentKind;
///
/// assert_eq!(AttachmentKind::Video.as_str(), "video");
/// assert_eq!(AttachmentKind::Video.pattern(), "%%%_VIDEO_%%%");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
    Video,
    File,
    Location,
}

impl AttachmentKind {
    /// Lowercase name used as the platform attachment `type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Video => "video",
            AttachmentKind::File => "file",
            AttachmentKind::Location => "location",
        }
    }

    /// Sentinel text carried by incoming messages whose content lives in
    /// [`IncomingMessage::attachments`](crate::IncomingMessage::attachments).
    pub fn pattern(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "%%%_IMAGE_%%%",
            AttachmentKind::Audio => "%%%_AUDIO_%%%",
            AttachmentKind::Video => "%%%_VIDEO_%%%",
            AttachmentKind::File => "%%%_FILE_%%%",
            AttachmentKind::Location => "%%%_LOCATION_%%%",
        }
    }
}

/// Downloadable media referenced by URL, with the platform object it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub payload: Value,
}

impl Media {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub payload: Value,
}

/// Attachment carried by an incoming or outgoing message.
///
/// ```
/// use gsm_core::{Attachment, AttachmentKind, Media};
///
/// let image = Attachment::Image(Media::new("https://example.com/cat.png"));
/// assert_eq!(image.kind(), AttachmentKind::Image);
/// assert_eq!(image.url(), Some("https://example.com/cat.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Image(Media),
    Audio(Media),
    Video(Media),
    File(Media),
    Location(Location),
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        match self {
            Attachment::Image(_) => AttachmentKind::Image,
            Attachment::Audio(_) => AttachmentKind::Audio,
            Attachment::Video(_) => AttachmentKind::Video,
            Attachment::File(_) => AttachmentKind::File,
            Attachment::Location(_) => AttachmentKind::Location,
        }
    }

    /// Builds the media variant for `kind`; locations carry no URL and yield `None`.
    pub fn media(kind: AttachmentKind, media: Media) -> Option<Self> {
        match kind {
            AttachmentKind::Image => Some(Attachment::Image(media)),
            AttachmentKind::Audio => Some(Attachment::Audio(media)),
            AttachmentKind::Video => Some(Attachment::Video(media)),
            AttachmentKind::File => Some(Attachment::File(media)),
            AttachmentKind::Location => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Attachment::Image(m)
            | Attachment::Audio(m)
            | Attachment::Video(m)
            | Attachment::File(m) => Some(m.url.as_str()),
            Attachment::Location(_) => None,
        }
    }

    pub fn payload(&self) -> &Value {
        match self {
            Attachment::Image(m)
            | Attachment::Audio(m)
            | Attachment::Video(m)
            | Attachment::File(m) => &m.payload,
            Attachment::Location(l) => &l.payload,
        }
    }
}
