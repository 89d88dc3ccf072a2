//! Message cycling
//!
//! Cycles the HUD's message line through a caller-supplied list (in order)
//! or through the built-in localized "funny" loading strings (randomly,
//! never repeating the same string twice in a row).

use rand::Rng;

use crate::content::{ContentSpec, Language};

const FUNNY_ENGLISH: &[&str] = &[
    "Hold on a sec...",
    "Feeding the hamsters...",
    "Warming up the flux capacitor...",
    "Counting backwards from infinity...",
    "Untangling the internet cables...",
    "Polishing the pixels...",
    "Convincing the server to cooperate...",
    "Downloading more patience...",
    "Herding bits into place...",
    "Almost there, probably...",
];

const FUNNY_SWEDISH: &[&str] = &[
    "Ett ögonblick...",
    "Matar hamstrarna...",
    "Värmer upp flödeskondensatorn...",
    "Räknar baklänges från oändligheten...",
    "Trasslar ut internetkablarna...",
    "Putsar pixlarna...",
    "Övertalar servern att samarbeta...",
    "Laddar ner mer tålamod...",
    "Vallar bitarna på plats...",
    "Strax klart, kanske...",
];

/// The built-in funny message set for a language.
pub fn funny_messages(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => FUNNY_ENGLISH,
        Language::Swedish => FUNNY_SWEDISH,
    }
}

/// Cursor over a set of messages, advanced on each cycle-timer tick.
#[derive(Debug, Clone)]
pub struct MessageCycler {
    messages: Vec<String>,
    cursor: usize,
    random: bool,
}

impl MessageCycler {
    /// Cycle through `messages` in order, wrapping around. `None` when the
    /// list is empty.
    pub fn ordered(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            return None;
        }
        Some(MessageCycler {
            messages,
            cursor: 0,
            random: false,
        })
    }

    /// Cycle randomly through the built-in funny messages for `language`.
    pub fn funny(language: Language) -> Self {
        let messages: Vec<String> = funny_messages(language)
            .iter()
            .map(|m| (*m).to_string())
            .collect();
        let cursor = rand::thread_rng().gen_range(0..messages.len());
        MessageCycler {
            messages,
            cursor,
            random: true,
        }
    }

    /// Build the cycler the given content calls for, if any.
    pub(crate) fn for_content(content: &ContentSpec) -> Option<Self> {
        match content {
            ContentSpec::MessageList(messages) => Self::ordered(messages.clone()),
            ContentSpec::FunnyMessages(language) => Some(Self::funny(*language)),
            _ => None,
        }
    }

    /// The message currently shown.
    pub fn current(&self) -> &str {
        &self.messages[self.cursor]
    }

    /// Move to the next message and return it.
    pub fn advance(&mut self) -> &str {
        if self.random {
            if self.messages.len() > 1 {
                let mut rng = rand::thread_rng();
                let mut next = rng.gen_range(0..self.messages.len());
                while next == self.cursor {
                    next = rng.gen_range(0..self.messages.len());
                }
                self.cursor = next;
            }
        } else {
            self.cursor = (self.cursor + 1) % self.messages.len();
        }
        self.current()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
