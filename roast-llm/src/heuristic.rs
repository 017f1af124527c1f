//! Deterministic lexical capability
//!
//! Every choice is driven by a SHA-256 digest of the input, so the same
//! problem and idea count always produce the same output.

use crate::{GeneratedIdea, IdeaRequest, RoastRequest, TextCapability};
use async_trait::async_trait;
use roast_core::RoastResult;
use sha2::{Digest, Sha256};

const ROAST_OPENERS: &[&str] = &[
    "Oh great, another human who",
    "Breaking news: a real person actually",
    "Apparently in this day and age, someone still",
    "Bless their heart, this poor soul",
    "In a world with self-driving cars, this person still",
    "Incredible. A fully grown adult",
    "The bar was on the floor and yet",
    "Not to be dramatic, but apparently",
    "So let me get this straight: a human being",
];

const ROAST_CLOSERS: &[&str] = &[
    "Surely there's a startup for that. Right? RIGHT?",
    "Someone call an accelerator, we've got a billion-dollar problem here.",
    "If only there were an app for basic life skills.",
    "This is exactly why agents exist: to witness human suffering and pitch solutions.",
    "The startup practically writes itself. The exit strategy? Therapy.",
    "Investors, take note: human incompetence is an infinite market.",
    "The total addressable market is literally every human alive.",
];

const SEVERITY_FLOURISHES: [&str; 3] = [
    "",
    " Honestly, it's a little painful to watch.",
    " This is no longer a problem. It is an existential crisis.",
];

const STARTUP_PREFIXES: &[&str] = &[
    "Un", "Re", "De", "Neo", "Hyper", "Meta", "Zero", "Omni", "Flux", "Vibe",
];

const STARTUP_ROOTS: &[&str] = &[
    "Solve", "Fix", "Hack", "Stack", "Sync", "Pulse", "Wave", "Loop", "Spark", "Shift",
];

const STARTUP_SUFFIXES: &[&str] = &[".ai", ".io", "ly", "ify", "Hub", "Lab", "OS", "X", "Go", ""];

const BUSINESS_MODELS: &[&str] = &[
    "Freemium SaaS with a guilt-trip upgrade prompt",
    "Subscription box nobody asked for",
    "Ad-supported with passive-aggressive nudges",
    "B2B enterprise licensing, because corporations love paying for free things",
    "Marketplace with a 30% cut because why not",
    "One-time purchase that secretly needs monthly refills",
    "Open-core with a paywall around the only useful feature",
    "Pay-what-you-want (spoiler: they'll pay nothing)",
    "Reverse auction where users bid to NOT see ads",
];

const PITCH_TEMPLATES: &[&str] = &[
    "What if we built a platform that actually {action}? Revolutionary, I know.",
    "Imagine an app where you {action}. Nobody's done this because it sounds too obvious.",
    "Picture this: a service that {action}. Investors would call it 'disruptive' with a straight face.",
    "We're building the Uber of {domain}. Yes, we know that phrase is dead. No, we don't care.",
    "It's like {familiar} but for {twist}. Please hold your applause.",
    "A dead-simple tool that {action}. The secret sauce? Actually finishing the MVP.",
];

const ACTIONS: &[&str] = &[
    "solves this problem before the user even realizes they have it",
    "automates the embarrassing parts of daily life",
    "gamifies suffering into a competitive sport",
    "turns human complaints into actionable data (and memes)",
    "connects people who share the same struggle and lets them commiserate productively",
    "replaces willpower with gentle robot nagging",
    "predicts when you'll fail and prepares a backup plan",
];

const FAMILIAR_PRODUCTS: &[&str] = &["Uber", "Airbnb", "Tinder", "Notion", "a chatbot"];

/// Pure lexical capability. Never fails and never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCapability;

impl HeuristicCapability {
    pub fn new() -> Self {
        Self
    }

    pub fn roast(&self, request: &RoastRequest) -> String {
        let text = request.text.trim().trim_end_matches(['.', '!', '?']);
        let digest = seed(&[text.as_bytes(), request.severity.as_db_str().as_bytes()]);

        let opener = pick(&digest, 0, ROAST_OPENERS);
        let closer = pick(&digest, 1, ROAST_CLOSERS);
        let flourish = SEVERITY_FLOURISHES[request.severity.rank() as usize];

        format!("{} {}.{} {}", opener, lowercase_first(text), flourish, closer)
    }

    pub fn idea(&self, request: &IdeaRequest) -> GeneratedIdea {
        let ordinal = request.existing_pitches.len() as u64;
        let digest = seed(&[
            request.problem_title.as_bytes(),
            request.problem_roast.as_bytes(),
            &ordinal.to_be_bytes(),
        ]);

        let startup_name = format!(
            "{}{}{}",
            pick(&digest, 0, STARTUP_PREFIXES),
            pick(&digest, 1, STARTUP_ROOTS),
            pick(&digest, 2, STARTUP_SUFFIXES)
        );

        let tag = |slot: usize, default: &'static str| -> String {
            if request.tags.is_empty() {
                default.to_string()
            } else {
                let idx = slot_value(&digest, slot) % request.tags.len();
                request.tags[idx].clone()
            }
        };

        let pitch = pick(&digest, 3, PITCH_TEMPLATES)
            .replace("{action}", pick(&digest, 4, ACTIONS))
            .replace("{domain}", &tag(5, "everyday life"))
            .replace("{familiar}", pick(&digest, 6, FAMILIAR_PRODUCTS))
            .replace("{twist}", &tag(7, "people who can't adult"));

        GeneratedIdea {
            startup_name,
            pitch,
            business_model: pick(&digest, 8, BUSINESS_MODELS).to_string(),
        }
    }
}

#[async_trait]
impl TextCapability for HeuristicCapability {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn roast_text(&self, request: &RoastRequest) -> RoastResult<String> {
        Ok(self.roast(request))
    }

    async fn generate_idea(&self, request: &IdeaRequest) -> RoastResult<GeneratedIdea> {
        Ok(self.idea(request))
    }
}

fn seed(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
        hasher.update([0u8]);
    }
    hasher.finalize().into()
}

/// Two digest bytes per slot; 16 slots available.
fn slot_value(digest: &[u8; 32], slot: usize) -> usize {
    let i = (slot * 2) % 32;
    u16::from_be_bytes([digest[i], digest[i + 1]]) as usize
}

fn pick<'a>(digest: &[u8; 32], slot: usize, items: &[&'a str]) -> &'a str {
    items[slot_value(digest, slot) % items.len()]
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
