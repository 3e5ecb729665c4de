/// Container guess derived from a browser-declared MIME type.
///
/// Only seeds format detection; the real container is sniffed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerHint {
    WebM,
    Ogg,
    Mp4,
    Mp3,
    Wav,
}

const MIME_TABLE: &[(&str, ContainerHint)] = &[
    ("audio/webm", ContainerHint::WebM),
    ("audio/webm;codecs=opus", ContainerHint::WebM),
    ("audio/webm;codecs=vp8", ContainerHint::WebM),
    ("audio/ogg", ContainerHint::Ogg),
    ("audio/ogg;codecs=opus", ContainerHint::Ogg),
    ("audio/mp4", ContainerHint::Mp4),
    ("audio/mp4;codecs=mp4a.40.2", ContainerHint::Mp4),
    ("audio/mpeg", ContainerHint::Mp3),
    ("audio/wav", ContainerHint::Wav),
    ("audio/x-wav", ContainerHint::Wav),
];

impl ContainerHint {
    /// Looks up a MIME type: exact match first, then the base type before `;`.
    /// Anything unknown is treated as WebM, the most common browser recording format.
    pub fn from_mime(mime_type: &str) -> Self {
        let clean = mime_type.trim().to_lowercase();
        if let Some(hint) = Self::find(&clean) {
            return hint;
        }
        let base = clean.split(';').next().unwrap_or_default().trim();
        Self::find(base).unwrap_or(ContainerHint::WebM)
    }

    fn find(mime: &str) -> Option<Self> {
        MIME_TABLE
            .iter()
            .find(|(key, _)| *key == mime)
            .map(|(_, hint)| *hint)
    }

    /// File extension used for the scratch file and the format detection hint.
    pub fn extension(self) -> &'static str {
        match self {
            ContainerHint::WebM => "webm",
            ContainerHint::Ogg => "ogg",
            ContainerHint::Mp4 => "mp4",
            ContainerHint::Mp3 => "mp3",
            ContainerHint::Wav => "wav",
        }
    }
}
