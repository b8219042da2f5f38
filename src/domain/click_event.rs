//! Click event model for asynchronous click counting.

/// An in-memory click notification passed from the redirect handler to the
/// background worker via a bounded channel.
///
/// The redirect response is sent without waiting for the counter update; if
/// the queue is full the event is dropped.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub token: String,
}

impl ClickEvent {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_carries_token() {
        let event = ClickEvent::new("abc123XYZ_".to_string());
        assert_eq!(event.token, "abc123XYZ_");
    }
}
