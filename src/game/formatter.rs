//! Message formatting for display.
//!
//! Handles placeholder substitution in the language templates.
//! Supports placeholders: {displayName}, {message}, {username}, {reason}

/// Message formatter that substitutes placeholders in a template.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    /// Template for this formatter.
    format: String,
}

impl MessageFormatter {
    /// Create a new formatter with the given template.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Format a message with the given context.
    ///
    /// Placeholders are replaced in one pass over the template, so values
    /// containing `{message}` or `{reason}` are inserted verbatim. Braces
    /// that do not form a known placeholder are kept.
    pub fn format(&self, ctx: &FormatContext) -> String {
        let mut out = String::with_capacity(self.format.len());
        let mut rest = self.format.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            let placeholder = tail
                .find('}')
                .and_then(|end| ctx.value(&tail[1..end]).map(|value| (value, end)));

            match placeholder {
                Some((value, end)) => {
                    out.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Context for message formatting.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    /// In-game display name.
    pub display_name: String,
    /// Discord username.
    pub username: String,
    /// The message content.
    pub message: String,
    /// Disconnect reason.
    pub reason: String,
}

impl FormatContext {
    /// Context for a game player's line.
    pub fn player(display_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Context for a Discord user's line.
    pub fn discord_user(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    fn value(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "displayName" => Some(&self.display_name),
            "username" => Some(&self.username),
            "message" => Some(&self.message),
            "reason" => Some(&self.reason),
            _ => None,
        }
    }
}
