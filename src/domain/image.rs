/// Image received from an admin upload, already validated and read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// Filename supplied by the client, if any.
    pub file_name: Option<String>,
    /// MIME type of the upload, always `image/*`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File extension used for the stored object.
    ///
    /// Taken from the original filename when it has one, otherwise from the MIME
    /// subtype. Only ASCII alphanumerics are kept.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext);
        let from_mime = self
            .content_type
            .split_once('/')
            .map(|(_, subtype)| subtype.split(['+', ';']).next().unwrap_or(subtype));

        let raw = from_name
            .filter(|ext| !ext.is_empty())
            .or(from_mime)
            .unwrap_or("bin");

        let sanitized: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if sanitized.is_empty() {
            "bin".to_string()
        } else {
            sanitized
        }
    }
}
