//! Canned dialogue for the chat widget.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Restaurant,
    RetailStore,
    ProfessionalService,
    HomeService,
    Other,
}

impl BusinessType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Restaurant,
            Self::RetailStore,
            Self::ProfessionalService,
            Self::HomeService,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::RetailStore => "Retail Store",
            Self::ProfessionalService => "Professional Service",
            Self::HomeService => "Home Service",
            Self::Other => "Other",
        }
    }

    /// How the business is referred to mid-sentence.
    const fn noun(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::RetailStore => "retail store",
            Self::ProfessionalService => "professional service business",
            Self::HomeService => "home service business",
            Self::Other => "business",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value))
    }
}

pub const CHALLENGE_OPTIONS: [&str; 5] = [
    "Not enough time",
    "Creating content",
    "Getting new customers",
    "Managing reviews",
    "Other",
];

/// Service pitch selected from the stated challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeBucket {
    Workshop,
    ProfileOptimization,
    Website,
}

impl ChallengeBucket {
    /// Case-insensitive substring match; "time" and "content" win over "customers".
    pub fn classify(challenge: &str) -> Self {
        let challenge = challenge.to_lowercase();
        if challenge.contains("time") || challenge.contains("content") {
            Self::Workshop
        } else if challenge.contains("customers") {
            Self::ProfileOptimization
        } else {
            Self::Website
        }
    }

    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Workshop => "AI Marketing Workshop",
            Self::ProfileOptimization => "Business Profile Optimization",
            Self::Website => "AI-Powered Website",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationChoice {
    ScheduleCall,
    NotNow,
}

impl ConsultationChoice {
    pub const fn ordered() -> [Self; 2] {
        [Self::ScheduleCall, Self::NotNow]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ScheduleCall => "Yes, schedule a call",
            Self::NotNow => "Not right now",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(value))
    }
}

pub(crate) const GREETING: &str = "Hi there! 👋 I help local businesses get more customers with AI-powered marketing. What kind of business do you run?";

pub(crate) fn challenge_question(business_type: BusinessType) -> String {
    format!(
        "Great! What's the biggest marketing challenge for your {} right now?",
        business_type.noun()
    )
}

pub(crate) fn recommendation(business_type: BusinessType, bucket: ChallengeBucket) -> String {
    let noun = business_type.noun();
    match bucket {
        ChallengeBucket::Workshop => format!(
            "Based on what you shared, our {} would be a great fit for your {noun}. In one afternoon you'll learn to plan and produce a month of posts, emails, and promos with AI tools.",
            bucket.service_name()
        ),
        ChallengeBucket::ProfileOptimization => format!(
            "To bring more new customers to your {noun}, I'd recommend our {} service. We tune your Google Business Profile, photos, and reviews so nearby searchers find you first.",
            bucket.service_name()
        ),
        ChallengeBucket::Website => format!(
            "For your {noun}, I'd suggest our {} package: a fast, search-optimized site with an AI assistant that answers questions and captures leads around the clock.",
            bucket.service_name()
        ),
    }
}

pub(crate) fn success_story(business_type: BusinessType) -> &'static str {
    match business_type {
        BusinessType::Restaurant => "Here's a quick success story: Carlos at El Corazón Mexican Kitchen went from 12 to over 200 Google reviews and saw online orders jump 40% in three months.",
        BusinessType::RetailStore => "Here's a quick success story: Linda at Heights Vintage Boutique doubled her foot traffic from Google Maps in just 90 days.",
        BusinessType::ProfessionalService => "Here's a quick success story: Dr. Patel's dental practice now books 25+ new patients every month straight from local search.",
        BusinessType::HomeService | BusinessType::Other => "Here's a quick success story: local businesses like yours typically see 30-50% more inquiries within their first 90 days with us.",
    }
}

pub(crate) const EMAIL_PROMPT: &str = "Want a free personalized marketing plan? Type your email below and we'll send it right over.";

pub(crate) const CONSULTATION_OFFER: &str = "Thanks! Your plan is on its way. Would you like to book a free 30-minute strategy call with our team?";

pub(crate) fn closing(choice: ConsultationChoice) -> &'static str {
    match choice {
        ConsultationChoice::ScheduleCall => "Awesome! Someone from our team will reach out within one business day to find a time that works for you. Talk soon!",
        ConsultationChoice::NotNow => "No problem at all! Keep an eye on your inbox for your plan, and reach out anytime if questions come up.",
    }
}
