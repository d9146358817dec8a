//! Tokio driver for [`ChatWidget`].
//!
//! One task owns the widget and every pending timer. Dropping the [`ChatSession`] aborts that
//! task, and with it any bot message still waiting on its delay.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, trace};

use super::machine::{ChatError, ChatEvent, ChatSnapshot, ChatTimings, ChatWidget, Scheduled};

type Reply = oneshot::Sender<Result<(), ChatError>>;

/// Handle to a running chat widget.
pub struct ChatSession {
    commands: mpsc::Sender<(ChatEvent, Reply)>,
    snapshots: watch::Receiver<ChatSnapshot>,
    driver: JoinHandle<()>,
}

impl ChatSession {
    /// Starts the driver. With `auto_open`, the widget opens itself after the configured delay
    /// unless the visitor opened it first.
    pub fn spawn(timings: ChatTimings, auto_open: bool) -> Self {
        let widget = ChatWidget::new(timings);
        let (snapshot_tx, snapshots) = watch::channel(widget.snapshot());
        let (commands, command_rx) = mpsc::channel(16);

        let driver = tokio::spawn(drive(widget, command_rx, snapshot_tx, auto_open));

        Self {
            commands,
            snapshots,
            driver,
        }
    }

    pub async fn open(&self) -> Result<(), ChatError> {
        self.send(ChatEvent::Open).await
    }

    pub async fn close(&self) -> Result<(), ChatError> {
        self.send(ChatEvent::Close).await
    }

    pub async fn choose(&self, option: impl Into<String>) -> Result<(), ChatError> {
        self.send(ChatEvent::Choose(option.into())).await
    }

    pub async fn submit_email(&self, email: impl Into<String>) -> Result<(), ChatError> {
        self.send(ChatEvent::SubmitEmail(email.into())).await
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every applied event or delivered message.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshots.clone()
    }

    async fn send(&self, event: ChatEvent) -> Result<(), ChatError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send((event, reply))
            .await
            .map_err(|_| ChatError::SessionClosed)?;
        response.await.map_err(|_| ChatError::SessionClosed)?
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    mut widget: ChatWidget,
    mut commands: mpsc::Receiver<(ChatEvent, Reply)>,
    snapshots: watch::Sender<ChatSnapshot>,
    auto_open: bool,
) {
    let mut timers = JoinSet::new();
    if auto_open {
        let delay = widget.timings().auto_open_delay;
        timers.spawn(async move {
            tokio::time::sleep(delay).await;
            ChatEvent::AutoOpen
        });
    }

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some((event, reply)) = command else {
                    debug!("chat session handle dropped");
                    break;
                };
                let outcome = widget.update(event).map(|scheduled| schedule(&mut timers, scheduled));
                snapshots.send_replace(widget.snapshot());
                let _ = reply.send(outcome);
            }
            Some(joined) = timers.join_next(), if !timers.is_empty() => {
                let Ok(event) = joined else {
                    continue;
                };
                trace!(?event, "timer elapsed");
                match widget.update(event) {
                    Ok(scheduled) => schedule(&mut timers, scheduled),
                    Err(err) => debug!(error = %err, "timed chat event ignored"),
                }
                snapshots.send_replace(widget.snapshot());
            }
        }
    }
}

fn schedule(timers: &mut JoinSet<ChatEvent>, scheduled: Vec<Scheduled>) {
    for Scheduled { delay, step } in scheduled {
        timers.spawn(async move {
            tokio::time::sleep(delay).await;
            ChatEvent::Deliver(step)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::machine::ChatStage;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn greeting_arrives_after_the_typing_delay() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let mut updates = session.subscribe();

        session.open().await.expect("opened");
        assert!(session.snapshot().transcript.is_empty());

        let snapshot = updates
            .wait_for(|snapshot| !snapshot.transcript.is_empty())
            .await
            .expect("greeting delivered")
            .clone();
        assert_eq!(snapshot.current_options().len(), 5);
        assert_eq!(snapshot.unread, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_open_fires_when_visitor_waits() {
        let session = ChatSession::spawn(ChatTimings::default(), true);
        let mut updates = session.subscribe();

        let snapshot = updates
            .wait_for(|snapshot| snapshot.open)
            .await
            .expect("auto opened")
            .clone();
        assert_eq!(snapshot.stage, ChatStage::NotStarted);
        assert!(snapshot.typing);

        let snapshot = updates
            .wait_for(|snapshot| snapshot.stage == ChatStage::AwaitingBusinessType)
            .await
            .expect("greeting delivered")
            .clone();
        assert!(!snapshot.typing);
        assert_eq!(snapshot.current_options().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_widget_counts_unread_messages() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let mut updates = session.subscribe();

        session.open().await.expect("opened");
        session.close().await.expect("closed");

        let snapshot = updates
            .wait_for(|snapshot| !snapshot.transcript.is_empty())
            .await
            .expect("greeting delivered")
            .clone();
        assert!(!snapshot.open);
        assert_eq!(snapshot.unread, 1);

        session.open().await.expect("reopened");
        assert_eq!(session.snapshot().unread, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_input_is_reported_to_the_caller() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let err = session
            .submit_email("owner@shop.com")
            .await
            .expect_err("no email expected yet");
        assert_eq!(err, ChatError::NotAccepting(ChatStage::NotStarted));
    }

    #[tokio::test(start_paused = true)]
    async fn early_answer_is_refused_until_the_greeting_lands() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let mut updates = session.subscribe();

        session.open().await.expect("opened");
        assert_eq!(
            session.choose("Restaurant").await,
            Err(ChatError::NotAccepting(ChatStage::NotStarted))
        );

        updates
            .wait_for(|snapshot| snapshot.stage == ChatStage::AwaitingBusinessType)
            .await
            .expect("greeting delivered");
        session.choose("Restaurant").await.expect("business type");
        assert_eq!(
            session.snapshot().transcript[0].sender,
            crate::chatbot::machine::Sender::Bot
        );
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_session_cancels_pending_messages() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let updates = session.subscribe();

        session.open().await.expect("opened");
        drop(session);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(updates.borrow().transcript.is_empty());
        assert!(updates.has_changed().is_err(), "driver should be gone");
    }
}
