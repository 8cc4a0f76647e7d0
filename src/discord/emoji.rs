//! Unicode emoji to text emoticon translation.
//!
//! Game chat cannot render emoji glyphs, so the handful Discord users
//! send most often are turned back into the emoticons they came from.

/// Fixed glyph -> emoticon table. No key is a substring of another,
/// so replacement order does not affect the result.
pub const EMOJI_MAPPINGS: [(&str, &str); 5] = [
    ("\u{1F604}", ":D"), // 😄
    ("\u{1F62E}", ":O"), // 😮
    ("\u{1F603}", ":)"), // 😃
    ("\u{1F61B}", ":P"), // 😛
    ("\u{1F609}", ";)"), // 😉
];

/// Replace every mapped emoji in `message` with its emoticon.
pub fn translate_emojis(message: &str) -> String {
    EMOJI_MAPPINGS
        .iter()
        .fold(message.to_string(), |text, (emoji, emoticon)| {
            if text.contains(emoji) {
                text.replace(emoji, emoticon)
            } else {
                text
            }
        })
}
