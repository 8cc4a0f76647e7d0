//! Relay state shared by the forwarder and the poller.
//!
//! `RelayState` is built once per relay start and never reloaded. The only
//! mutable piece is the [`Cursor`], which sits behind an async mutex and is
//! written exclusively by the poller. Restarting the relay starts over from
//! `Cursor::Uninitialized`.

use std::cmp::Ordering;

use tokio::sync::Mutex;

use crate::config::{Config, Lang};

/// Last Discord message the poller has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// No message seen yet; the next poll bootstraps without broadcasting.
    #[default]
    Uninitialized,
    /// Id of the newest message seen.
    Set(String),
}

impl Cursor {
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Uninitialized => None,
            Self::Set(id) => Some(id),
        }
    }

    /// Whether `id` is newer than the cursor position.
    pub fn is_behind(&self, id: &str) -> bool {
        match self {
            Self::Uninitialized => true,
            Self::Set(current) => compare_ids(id, current) == Ordering::Greater,
        }
    }

    /// Move the cursor to `id` if it is newer. Returns whether it moved.
    pub fn advance(&mut self, id: &str) -> bool {
        if !self.is_behind(id) {
            return false;
        }
        *self = Self::Set(id.to_string());
        true
    }
}

/// Order two message ids.
///
/// Discord ids are snowflakes: decimal integers that grow with time, so
/// they compare by digit count and then lexically. Ids that are not plain
/// digits carry no known order; any different id counts as newer.
fn compare_ids(a: &str, b: &str) -> Ordering {
    let is_snowflake = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    if is_snowflake(a) && is_snowflake(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else if a == b {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

/// Configuration and cursor for one running relay.
#[derive(Debug)]
pub struct RelayState {
    pub config: Config,
    pub lang: Lang,
    cursor: Mutex<Cursor>,
}

impl RelayState {
    pub fn new(config: Config, lang: Lang) -> Self {
        Self {
            config,
            lang,
            cursor: Mutex::new(Cursor::Uninitialized),
        }
    }

    /// The cursor lock. Held by the poller for a whole cycle.
    pub fn cursor(&self) -> &Mutex<Cursor> {
        &self.cursor
    }

    /// Copy of the current cursor, waiting for any cycle in flight.
    pub async fn current_cursor(&self) -> Cursor {
        self.cursor.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_accepts_anything() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.token(), None);
        assert!(cursor.advance("5"));
        assert_eq!(cursor, Cursor::Set("5".to_string()));
    }

    #[test]
    fn test_never_regresses() {
        let mut cursor = Cursor::Set("1000".to_string());
        assert!(!cursor.advance("999"));
        assert!(!cursor.advance("1000"));
        assert_eq!(cursor.token(), Some("1000"));

        assert!(cursor.advance("1001"));
        assert_eq!(cursor.token(), Some("1001"));
    }

    #[test]
    fn test_snowflake_ordering_by_magnitude() {
        // Lexically "9" > "10", numerically it is not.
        assert_eq!(compare_ids("10", "9"), Ordering::Greater);
        assert_eq!(compare_ids("9", "10"), Ordering::Less);
        assert_eq!(
            compare_ids("1234567890123456789", "1234567890123456788"),
            Ordering::Greater
        );
        assert_eq!(compare_ids("007", "7"), Ordering::Equal);
    }

    #[test]
    fn test_opaque_ids() {
        let mut cursor = Cursor::Set("abc".to_string());
        assert!(!cursor.advance("abc"));
        assert!(cursor.advance("abd"));
    }

    #[tokio::test]
    async fn test_state_starts_uninitialized() {
        let state = RelayState::new(Config::default(), Lang::default());
        assert_eq!(state.current_cursor().await, Cursor::Uninitialized);
    }
}
