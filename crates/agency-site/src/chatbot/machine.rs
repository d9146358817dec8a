use std::time::Duration;

use serde::Serialize;

use super::script::{
    self, BusinessType, ChallengeBucket, ConsultationChoice, CHALLENGE_OPTIONS,
};

/// Pacing applied to bot messages and the landing-page auto-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimings {
    pub typing_delay: Duration,
    pub story_delay: Duration,
    pub auto_open_delay: Duration,
}

impl Default for ChatTimings {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(1_000),
            story_delay: Duration::from_millis(2_000),
            auto_open_delay: Duration::from_millis(5_000),
        }
    }
}

impl ChatTimings {
    /// No pauses at all; useful for scripted runs.
    pub fn instant() -> Self {
        Self {
            typing_delay: Duration::ZERO,
            story_delay: Duration::ZERO,
            auto_open_delay: Duration::ZERO,
        }
    }
}

/// Where the scripted conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStage {
    NotStarted,
    AwaitingBusinessType,
    AwaitingChallenge,
    ShowingRecommendation,
    ShowingSuccessStory,
    AwaitingEmail,
    AwaitingConsultationChoice,
    Complete,
}

impl ChatStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::AwaitingBusinessType => "awaiting business type",
            Self::AwaitingChallenge => "awaiting challenge",
            Self::ShowingRecommendation => "showing recommendation",
            Self::ShowingSuccessStory => "showing success story",
            Self::AwaitingEmail => "awaiting email",
            Self::AwaitingConsultationChoice => "awaiting consultation choice",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ChatMessage {
    fn bot(text: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            options,
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            options: Vec::new(),
        }
    }
}

/// Answers collected so far. Never sent anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadDetails {
    pub business_type: Option<BusinessType>,
    pub challenge: Option<String>,
    pub bucket: Option<ChallengeBucket>,
    pub email: Option<String>,
    pub consultation: Option<ConsultationChoice>,
}

/// A bot message waiting to be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStep {
    Greeting,
    AskChallenge,
    Recommendation,
    SuccessStory,
    AskEmail,
    OfferConsultation,
    Closing(ConsultationChoice),
}

/// Inputs to [`ChatWidget::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Open,
    Close,
    AutoOpen,
    Choose(String),
    SubmitEmail(String),
    Deliver(BotStep),
}

/// A delayed transition the surrounding runtime must schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub step: BotStep,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("the chat is not waiting for that input ({})", .0.label())]
    NotAccepting(ChatStage),
    #[error("'{0}' is not one of the offered options")]
    UnknownOption(String),
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("please enter your biggest challenge")]
    EmptyAnswer,
    #[error("chat session has ended")]
    SessionClosed,
}

/// Read-only view of the widget for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub open: bool,
    pub unread: u32,
    /// A bot message is scheduled but not yet posted.
    pub typing: bool,
    pub stage: ChatStage,
    pub transcript: Vec<ChatMessage>,
    pub lead: LeadDetails,
}

impl ChatSnapshot {
    /// Options attached to the most recent bot message.
    pub fn current_options(&self) -> &[String] {
        self.transcript
            .iter()
            .rev()
            .find(|message| message.sender == Sender::Bot)
            .map(|message| message.options.as_slice())
            .unwrap_or_default()
    }
}

/// The chat widget as a plain value. Feed it events; it returns the bot messages to
/// schedule.
///
/// The stage moves when a bot message is posted, never on visitor input alone. Input is
/// refused while a bot message is pending.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    timings: ChatTimings,
    open: bool,
    ever_opened: bool,
    unread: u32,
    stage: ChatStage,
    pending: Option<BotStep>,
    transcript: Vec<ChatMessage>,
    lead: LeadDetails,
}

impl ChatWidget {
    pub fn new(timings: ChatTimings) -> Self {
        Self {
            timings,
            open: false,
            ever_opened: false,
            unread: 0,
            stage: ChatStage::NotStarted,
            pending: None,
            transcript: Vec::new(),
            lead: LeadDetails::default(),
        }
    }

    pub fn timings(&self) -> ChatTimings {
        self.timings
    }

    pub fn stage(&self) -> ChatStage {
        self.stage
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn unread(&self) -> u32 {
        self.unread
    }

    pub fn is_typing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn lead(&self) -> &LeadDetails {
        &self.lead
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            open: self.open,
            unread: self.unread,
            typing: self.is_typing(),
            stage: self.stage,
            transcript: self.transcript.clone(),
            lead: self.lead.clone(),
        }
    }

    /// Applies one event. Rejected input leaves the widget untouched.
    pub fn update(&mut self, event: ChatEvent) -> Result<Vec<Scheduled>, ChatError> {
        match event {
            ChatEvent::Open => Ok(self.open_widget()),
            ChatEvent::AutoOpen if self.ever_opened => Ok(Vec::new()),
            ChatEvent::AutoOpen => Ok(self.open_widget()),
            ChatEvent::Close => {
                self.open = false;
                Ok(Vec::new())
            }
            ChatEvent::Choose(answer) => {
                self.ensure_visitor_turn()?;
                self.choose(answer)
            }
            ChatEvent::SubmitEmail(email) => {
                self.ensure_visitor_turn()?;
                self.submit_email(email)
            }
            // Only the step the widget itself scheduled may be posted.
            ChatEvent::Deliver(step) if self.pending == Some(step) => Ok(self.deliver(step)),
            ChatEvent::Deliver(_) => Ok(Vec::new()),
        }
    }

    fn ensure_visitor_turn(&self) -> Result<(), ChatError> {
        if self.pending.is_some() {
            return Err(ChatError::NotAccepting(self.stage));
        }
        Ok(())
    }

    fn open_widget(&mut self) -> Vec<Scheduled> {
        self.open = true;
        self.ever_opened = true;
        self.unread = 0;

        if self.stage == ChatStage::NotStarted && self.pending.is_none() {
            vec![self.after_typing(BotStep::Greeting)]
        } else {
            Vec::new()
        }
    }

    fn choose(&mut self, answer: String) -> Result<Vec<Scheduled>, ChatError> {
        match self.stage {
            ChatStage::AwaitingBusinessType => {
                let business_type = BusinessType::from_label(&answer)
                    .ok_or_else(|| ChatError::UnknownOption(answer.clone()))?;
                self.transcript.push(ChatMessage::user(business_type.label()));
                self.lead.business_type = Some(business_type);
                Ok(vec![self.after_typing(BotStep::AskChallenge)])
            }
            ChatStage::AwaitingChallenge => {
                let challenge = answer.trim();
                if challenge.is_empty() {
                    return Err(ChatError::EmptyAnswer);
                }
                self.transcript.push(ChatMessage::user(challenge));
                self.lead.bucket = Some(ChallengeBucket::classify(challenge));
                self.lead.challenge = Some(challenge.to_string());
                Ok(vec![self.after_typing(BotStep::Recommendation)])
            }
            ChatStage::AwaitingConsultationChoice => {
                let choice = ConsultationChoice::from_label(&answer)
                    .ok_or_else(|| ChatError::UnknownOption(answer.clone()))?;
                self.transcript.push(ChatMessage::user(choice.label()));
                self.lead.consultation = Some(choice);
                Ok(vec![self.after_typing(BotStep::Closing(choice))])
            }
            stage => Err(ChatError::NotAccepting(stage)),
        }
    }

    fn submit_email(&mut self, email: String) -> Result<Vec<Scheduled>, ChatError> {
        if self.stage != ChatStage::AwaitingEmail {
            return Err(ChatError::NotAccepting(self.stage));
        }

        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ChatError::InvalidEmail);
        }

        self.transcript.push(ChatMessage::user(email));
        self.lead.email = Some(email.to_string());
        Ok(vec![self.after_typing(BotStep::OfferConsultation)])
    }

    fn deliver(&mut self, step: BotStep) -> Vec<Scheduled> {
        let business_type = self.lead.business_type.unwrap_or(BusinessType::Other);
        let mut follow_up = Vec::new();
        self.pending = None;

        let message = match step {
            BotStep::Greeting => {
                self.stage = ChatStage::AwaitingBusinessType;
                ChatMessage::bot(
                script::GREETING,
                BusinessType::ordered()
                    .iter()
                    .map(|kind| kind.label().to_string())
                    .collect(),
                )
            }
            BotStep::AskChallenge => {
                self.stage = ChatStage::AwaitingChallenge;
                ChatMessage::bot(
                    script::challenge_question(business_type),
                    CHALLENGE_OPTIONS.iter().map(|option| option.to_string()).collect(),
                )
            }
            BotStep::Recommendation => {
                self.stage = ChatStage::ShowingRecommendation;
                let bucket = self.lead.bucket.unwrap_or(ChallengeBucket::Website);
                self.pending = Some(BotStep::SuccessStory);
                follow_up.push(Scheduled {
                    delay: self.timings.story_delay + self.timings.typing_delay,
                    step: BotStep::SuccessStory,
                });
                ChatMessage::bot(script::recommendation(business_type, bucket), Vec::new())
            }
            BotStep::SuccessStory => {
                self.stage = ChatStage::ShowingSuccessStory;
                follow_up.push(self.after_typing(BotStep::AskEmail));
                ChatMessage::bot(script::success_story(business_type), Vec::new())
            }
            BotStep::AskEmail => {
                self.stage = ChatStage::AwaitingEmail;
                ChatMessage::bot(script::EMAIL_PROMPT, Vec::new())
            }
            BotStep::OfferConsultation => {
                self.stage = ChatStage::AwaitingConsultationChoice;
                ChatMessage::bot(
                    script::CONSULTATION_OFFER,
                    ConsultationChoice::ordered()
                        .iter()
                        .map(|choice| choice.label().to_string())
                        .collect(),
                )
            }
            BotStep::Closing(choice) => {
                self.stage = ChatStage::Complete;
                ChatMessage::bot(script::closing(choice), Vec::new())
            }
        };

        self.transcript.push(message);
        if !self.open {
            self.unread += 1;
        }
        follow_up
    }

    /// Schedules `step` behind the typing delay and blocks input until it is posted.
    fn after_typing(&mut self, step: BotStep) -> Scheduled {
        self.pending = Some(step);
        Scheduled {
            delay: self.timings.typing_delay,
            step,
        }
    }
}
