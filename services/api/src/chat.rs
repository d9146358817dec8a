use std::io::Write;

use agency_site::chatbot::{
    ChatError, ChatSession, ChatSnapshot, ChatStage, ChatTimings, Sender,
};
use agency_site::config::ChatbotConfig;
use agency_site::error::AppError;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

#[derive(Args, Debug, Default)]
pub(crate) struct ChatArgs {
    /// Skip the typing and story pauses
    #[arg(long)]
    pub(crate) instant: bool,
}

pub(crate) async fn run(args: ChatArgs) -> Result<(), AppError> {
    let timings = if args.instant {
        ChatTimings::instant()
    } else {
        ChatbotConfig::load()?.timings()
    };

    let session = ChatSession::spawn(timings, false);
    let mut updates = session.subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut printed = 0;

    println!("Type a number to pick an option, or \"quit\" to leave.\n");
    session.open().await?;

    loop {
        let snapshot = next_turn(&mut updates, &mut printed).await?;
        if snapshot.stage == ChatStage::Complete {
            break;
        }

        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = input.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = resolve_answer(snapshot.current_options(), line);
        let outcome = if snapshot.stage == ChatStage::AwaitingEmail {
            session.submit_email(answer).await
        } else {
            session.choose(answer).await
        };

        match outcome {
            Ok(()) => {}
            Err(ChatError::SessionClosed) => return Err(ChatError::SessionClosed.into()),
            Err(err) => println!("  ({err})"),
        }
    }

    Ok(())
}

/// Prints messages as they arrive until the bot hands the turn back to the visitor.
async fn next_turn(
    updates: &mut watch::Receiver<ChatSnapshot>,
    printed: &mut usize,
) -> Result<ChatSnapshot, ChatError> {
    loop {
        let snapshot = updates.borrow_and_update().clone();
        for message in snapshot.transcript.iter().skip(*printed) {
            if message.sender == Sender::Bot {
                println!("Bot: {}", message.text);
                for (index, option) in message.options.iter().enumerate() {
                    println!("  {}. {option}", index + 1);
                }
            }
        }
        *printed = snapshot.transcript.len();

        if visitor_turn(&snapshot) {
            return Ok(snapshot);
        }
        updates
            .changed()
            .await
            .map_err(|_| ChatError::SessionClosed)?;
    }
}

fn visitor_turn(snapshot: &ChatSnapshot) -> bool {
    !snapshot.typing
        && matches!(
            snapshot.stage,
            ChatStage::AwaitingBusinessType
                | ChatStage::AwaitingChallenge
                | ChatStage::AwaitingEmail
                | ChatStage::AwaitingConsultationChoice
                | ChatStage::Complete
        )
}

/// A number picks from the offered options; anything else is sent as typed.
fn resolve_answer(options: &[String], line: &str) -> String {
    line.parse::<usize>()
        .ok()
        .and_then(|choice| choice.checked_sub(1))
        .and_then(|index| options.get(index))
        .cloned()
        .unwrap_or_else(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_site::chatbot::{ChatEvent, ChatWidget};

    fn options() -> Vec<String> {
        vec!["Restaurant".to_string(), "Retail Store".to_string()]
    }

    #[test]
    fn numbers_pick_offered_options() {
        assert_eq!(resolve_answer(&options(), "2"), "Retail Store");
        assert_eq!(resolve_answer(&options(), "0"), "0");
        assert_eq!(resolve_answer(&options(), "3"), "3");
        assert_eq!(resolve_answer(&options(), "Other"), "Other");
    }

    #[test]
    fn visitor_waits_for_the_bot_prompt() {
        let mut widget = ChatWidget::new(ChatTimings::instant());
        let scheduled = widget.update(ChatEvent::Open).expect("open");
        assert!(!visitor_turn(&widget.snapshot()));

        widget
            .update(ChatEvent::Deliver(scheduled[0].step))
            .expect("greeting");
        assert!(visitor_turn(&widget.snapshot()));

        widget
            .update(ChatEvent::Choose("Restaurant".to_string()))
            .expect("business type");
        assert!(!visitor_turn(&widget.snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn next_turn_returns_once_the_greeting_lands() {
        let session = ChatSession::spawn(ChatTimings::default(), false);
        let mut updates = session.subscribe();
        let mut printed = 0;

        session.open().await.expect("opened");
        let snapshot = next_turn(&mut updates, &mut printed)
            .await
            .expect("session alive");

        assert_eq!(snapshot.stage, ChatStage::AwaitingBusinessType);
        assert_eq!(printed, 1);
    }
}
