//! # Bot Error Types Module
//!
//! Error kinds raised while handling a chat interaction. All of them are
//! caught at the state machine boundary and turned into a short localized
//! chat message; none of them terminates the bot.

/// Custom error types for chat interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// A callback or reply arrived but no image is on file for the chat
    SessionNotFound,
    /// Callback data that does not name an action of the active menu
    UnknownAction(String),
    /// Render geometry collapsed (zero-sized image, zero width, no rows fit)
    DegenerateGeometry(String),
    /// The image library rejected the input or failed to encode the result
    TransformFailure(String),
    /// The image contents could not be fetched from the transport
    Download(String),
}

impl BotError {
    /// Localization key of the user-visible message for this error.
    ///
    /// `UnknownAction` has no message: unknown buttons are acknowledged
    /// silently.
    pub fn user_message_key(&self) -> Option<&'static str> {
        match self {
            BotError::SessionNotFound => Some("error-no-image"),
            BotError::UnknownAction(_) => None,
            BotError::DegenerateGeometry(_) => Some("error-degenerate-geometry"),
            BotError::TransformFailure(_) => Some("error-transform-failed"),
            BotError::Download(_) => Some("error-download-failed"),
        }
    }
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::SessionNotFound => write!(f, "No image on file for this chat"),
            BotError::UnknownAction(tag) => write!(f, "Unknown action: {tag}"),
            BotError::DegenerateGeometry(msg) => write!(f, "Degenerate geometry: {msg}"),
            BotError::TransformFailure(msg) => write!(f, "Transform failure: {msg}"),
            BotError::Download(msg) => write!(f, "Download error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}

impl From<image::ImageError> for BotError {
    fn from(err: image::ImageError) -> Self {
        BotError::TransformFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BotError::UnknownAction("frobnicate".to_string()).to_string(),
            "Unknown action: frobnicate"
        );
        assert_eq!(
            BotError::TransformFailure("bad header".to_string()).to_string(),
            "Transform failure: bad header"
        );
    }

    #[test]
    fn test_unknown_action_has_no_user_message() {
        assert!(BotError::UnknownAction(String::new()).user_message_key().is_none());
        assert_eq!(BotError::SessionNotFound.user_message_key(), Some("error-no-image"));
    }
}
