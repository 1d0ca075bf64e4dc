use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    CountdownElapsed,
    CancelledByHost,
}

// Fires `CountdownElapsed` into the session queue once the duration has passed.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    pub fn start(duration: Duration, events: UnboundedSender<SessionEvent>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // The receiver is gone when the session has already ended
            let _ = events.send(SessionEvent::CountdownElapsed);
        });
        Countdown { handle }
    }

    // Takes effect immediately, the event is never sent after this call.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}
