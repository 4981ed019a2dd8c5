use tokio::time::{Duration, Instant};

/// How long an error stays on screen
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// A single message slot that empties itself after `DISMISS_AFTER`.
///
/// The countdown is a deadline rather than a spawned timer: setting a new message
/// restarts it, clearing cancels it, and dropping the owner leaves nothing behind.
/// Renderers call `tick` from their event loop.
#[derive(Debug, Default)]
pub struct FlashMessage {
    current: Option<(String, Instant)>,
}

impl FlashMessage {
    pub fn set(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), Instant::now()));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message, unless its window has passed
    pub fn text(&self) -> Option<&str> {
        match &self.current {
            Some((text, shown_at)) if shown_at.elapsed() < DISMISS_AFTER => Some(text),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.text().is_some()
    }

    /// Drop an expired message. Returns true if one was dropped.
    pub fn tick(&mut self) -> bool {
        let expired = matches!(
            &self.current,
            Some((_, shown_at)) if shown_at.elapsed() >= DISMISS_AFTER
        );
        if expired {
            self.current = None;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_window() {
        let mut flash = FlashMessage::default();
        flash.set("Invalid credentials");
        assert_eq!(flash.text(), Some("Invalid credentials"));

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(flash.is_visible());
        assert!(!flash.tick());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(flash.text(), None);
        assert!(flash.tick());
        assert!(!flash.tick());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_restarts_window() {
        let mut flash = FlashMessage::default();
        flash.set("first");
        tokio::time::advance(Duration::from_millis(2000)).await;

        flash.set("second");
        tokio::time::advance(Duration::from_millis(2000)).await;
        assert_eq!(flash.text(), Some("second"));

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(flash.text(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels() {
        let mut flash = FlashMessage::default();
        flash.set("gone");
        flash.clear();
        assert_eq!(flash.text(), None);
        assert!(!flash.tick());
    }
}
