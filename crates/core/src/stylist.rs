//! Boundary with the chat stylist backend.
//!
//! Nothing here talks to the network. It builds the request body the
//! storefront sends, the system prompt the backend forwards to the model,
//! and parses `[[product:ID]]` markers out of the model's replies.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};
use crate::domain::profile::PreferenceProfile;

const PRODUCT_MARKER_PATTERN: &str = r"\[\[product:([0-9]+)\]\]";

pub const STYLE_PROFILE_HEADER: &str = "USER STYLE PROFILE (from browsing history):";
pub const CATALOG_DIGEST_HEADER: &str = "ID|Name|Category|Price(₹)|Tags";

pub const DEFAULT_STYLIST_PROMPT: &str = "You are the storefront's personal stylist. \
Keep answers short and friendly, suggest complete looks split into topwear, bottomwear, \
footwear and accessories, and stay within any budget the shopper mentions. \
Whenever you recommend a catalog product, write its tag as [[product:ID]] right after the \
product name.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }
}

/// Body the storefront posts to the stylist backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistRequest {
    pub messages: Vec<ChatMessage>,
    pub wardrobe_context: String,
}

impl StylistRequest {
    pub fn new(messages: Vec<ChatMessage>, profile: &PreferenceProfile) -> Self {
        Self { messages, wardrobe_context: profile.summarize() }
    }
}

/// Body the backend forwards to an OpenAI-compatible completion endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl CompletionPayload {
    pub fn from_request(
        model: impl Into<String>,
        base_prompt: &str,
        catalog: &[Product],
        request: &StylistRequest,
    ) -> Self {
        let system = compose_system_prompt(base_prompt, catalog, &request.wardrobe_context);
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(request.messages.iter().cloned());
        Self { model: model.into(), messages, stream: true }
    }
}

/// One `ID|Name|Category|Price|tags` row per product, under a header row.
pub fn catalog_digest(catalog: &[Product]) -> String {
    let mut digest = String::from(CATALOG_DIGEST_HEADER);
    for product in catalog {
        digest.push('\n');
        digest.push_str(&format!(
            "{}|{}|{}|{}|{}",
            product.id,
            product.name,
            product.category,
            product.price.normalize(),
            product.tags.join(",")
        ));
    }
    digest
}

pub fn compose_system_prompt(base: &str, catalog: &[Product], wardrobe_context: &str) -> String {
    let mut prompt = format!("{base}\n\nPRODUCT CATALOG:\n{}", catalog_digest(catalog));
    if !wardrobe_context.is_empty() {
        prompt.push_str(&format!("\n\n{STYLE_PROFILE_HEADER}\n{wardrobe_context}"));
    }
    prompt
}

/// Product markers found in a stylist reply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductMentions {
    /// Reply with every marker removed, trimmed.
    pub text: String,
    /// Ids in order of first mention, without repeats.
    pub product_ids: Vec<ProductId>,
}

impl ProductMentions {
    pub fn resolve<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        self.product_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|product| &product.id == id))
            .collect()
    }
}

fn product_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(PRODUCT_MARKER_PATTERN).expect("product marker pattern"))
}

/// Strips `[[product:ID]]` markers (numeric ids) from `message`.
///
/// Anything that looks like a marker but has a non-numeric id is kept as text.
pub fn extract_product_mentions(message: &str) -> ProductMentions {
    let marker = product_marker();

    let mut product_ids: Vec<ProductId> = Vec::new();
    for captures in marker.captures_iter(message) {
        let id = ProductId::new(&captures[1]);
        if !product_ids.contains(&id) {
            product_ids.push(id);
        }
    }
    let text = marker.replace_all(message, "").trim().to_string();

    ProductMentions { text, product_ids }
}
