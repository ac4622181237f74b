pub type Result<T> = std::result::Result<T, Error>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error reading or writing file \"{file}\": {source}")]
    FileIo { file: String, source: BoxedError },

    #[error("Error parsing record {idx} from {origin}: {source}")]
    ParseRecord {
        origin: String,
        idx: usize,
        source: BoxedError,
    },

    #[error("Malformed input in {context}: {reason}")]
    MalformedInput { context: String, reason: String },

    #[error("Write at ({x}, {y}) is outside of the {width}x{height} canvas")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Error parsing config file \"{file}\": {source}")]
    Config {
        file: String,
        source: serde_yaml::Error,
    },

    #[error("Error encoding image \"{file}\": {source}")]
    Image {
        file: String,
        source: image::ImageError,
    },
}

impl Error {
    pub fn file_io(file: impl AsRef<std::path::Path>, source: impl Into<BoxedError>) -> Self {
        Self::FileIo {
            file: file.as_ref().display().to_string(),
            source: source.into(),
        }
    }

    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

pub fn utf8(b: &[u8]) -> String {
    std::str::from_utf8(b).unwrap_or("<invalid utf8>").to_owned()
}
