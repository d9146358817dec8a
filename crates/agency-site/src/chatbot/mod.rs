//! Scripted lead-qualification chat shown as a floating bubble on the landing pages.

pub mod machine;
pub mod script;
pub mod session;

pub use machine::{
    BotStep, ChatError, ChatEvent, ChatMessage, ChatSnapshot, ChatStage, ChatTimings,
    ChatWidget, LeadDetails, Scheduled, Sender,
};
pub use script::{BusinessType, ChallengeBucket, ConsultationChoice, CHALLENGE_OPTIONS};
pub use session::ChatSession;
