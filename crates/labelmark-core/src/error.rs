use crate::record::AttrKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Markup parse error: {message}")]
    MarkupParse { message: String },

    #[error("Malformed attribute record ({kind:?}): {len} bytes, expected at least {expected}")]
    MalformedRecord {
        kind: AttrKind,
        len: usize,
        expected: usize,
    },
}

impl Error {
    pub(crate) fn markup(message: impl Into<String>) -> Self {
        Self::MarkupParse {
            message: message.into(),
        }
    }
}
