//! Single-slot outcome stream between the manager and the screen.

use crate::auth::AuthOutcome;
use log::debug;
use tokio::sync::watch;

/// Producer side of the outcome stream. Cheap to clone.
#[derive(Clone, Debug)]
pub struct OutcomePublisher {
    tx: watch::Sender<Option<AuthOutcome>>,
}

/// Consumer side of the outcome stream.
#[derive(Debug)]
pub struct OutcomeStream {
    rx: watch::Receiver<Option<AuthOutcome>>,
}

/// Returned once the publisher side has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamClosed;

impl OutcomePublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the current outcome. Never blocks.
    pub fn publish(&self, outcome: AuthOutcome) {
        if self.tx.receiver_count() == 0 {
            debug!("No outcome subscribers, dropping {:?}", outcome);
            return;
        }
        debug!("Publishing outcome {:?}", outcome);
        self.tx.send_replace(Some(outcome));
    }

    pub fn subscribe(&self) -> OutcomeStream {
        OutcomeStream {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for OutcomePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeStream {
    /// Non-blocking poll for a new outcome, for use from the GTK main loop.
    pub fn take_changed(&mut self) -> Result<Option<AuthOutcome>, StreamClosed> {
        match self.rx.has_changed() {
            Ok(true) => Ok(self.rx.borrow_and_update().clone()),
            Ok(false) => Ok(None),
            Err(_) => Err(StreamClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();
        assert_eq!(stream.take_changed(), Ok(None));
    }

    #[test]
    fn keeps_only_the_latest_outcome() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();

        publisher.publish(AuthOutcome::Failed);
        publisher.publish(AuthOutcome::Succeeded);

        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Succeeded)));
        assert_eq!(stream.take_changed(), Ok(None));
    }

    #[test]
    fn repeated_equal_outcomes_are_both_observed() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();

        publisher.publish(AuthOutcome::Failed);
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Failed)));

        publisher.publish(AuthOutcome::Failed);
        assert_eq!(stream.take_changed(), Ok(Some(AuthOutcome::Failed)));
    }

    #[tokio::test]
    async fn publishes_across_tasks() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();

        let producer = publisher.clone();
        tokio::spawn(async move {
            producer.publish(AuthOutcome::Error("Sensor busy".to_string()));
        })
        .await
        .expect("task panicked");

        assert_eq!(
            stream.take_changed(),
            Ok(Some(AuthOutcome::Error("Sensor busy".to_string())))
        );
    }

    #[test]
    fn reports_closed_after_publisher_drop() {
        let publisher = OutcomePublisher::new();
        let mut stream = publisher.subscribe();
        drop(publisher);
        assert_eq!(stream.take_changed(), Err(StreamClosed));
    }
}
