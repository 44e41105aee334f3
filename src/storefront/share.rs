//! Social share messages and the sequential multi-network share run.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::aggregates::{Product, Social};
use crate::storefront::order::encode_component;

pub const DEFAULT_SHARE_DELAY: Duration = Duration::from_millis(500);

const FALLBACK_PRODUCT_NAME: &str = "Produit";
const WHATSAPP_SHARE_URL: &str = "https://wa.me/?text=";
const TWITTER_SHARE_URL: &str = "https://twitter.com/intent/tweet?text=";
const FACEBOOK_SHARE_URL: &str = "https://www.facebook.com/sharer/sharer.php?u=";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Twitter,
    WhatsApp,
    Other,
}

impl Platform {
    /// Platform whose template decorates the message. Checked in the order
    /// instagram, facebook, twitter/x, whatsapp.
    pub fn for_message(social_name: &str) -> Self {
        let name = social_name.to_lowercase();
        if name.contains("instagram") {
            Self::Instagram
        } else if name.contains("facebook") {
            Self::Facebook
        } else if name.contains("twitter") || name.contains('x') {
            Self::Twitter
        } else if name.contains("whatsapp") {
            Self::WhatsApp
        } else {
            Self::Other
        }
    }

    /// Platform whose share action is used. Checked in the order whatsapp,
    /// twitter/x, facebook, instagram.
    pub fn for_dispatch(social_name: &str) -> Self {
        let name = social_name.to_lowercase();
        if name.contains("whatsapp") {
            Self::WhatsApp
        } else if name.contains("twitter") || name.contains('x') {
            Self::Twitter
        } else if name.contains("facebook") {
            Self::Facebook
        } else if name.contains("instagram") {
            Self::Instagram
        } else {
            Self::Other
        }
    }
}

/// Per-platform decorations applied to a base message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareTemplate {
    pub instagram_tags: &'static str,
    pub facebook_tags: &'static str,
    pub twitter_tags: &'static str,
    pub whatsapp_lead: &'static str,
    pub whatsapp_call: &'static str,
}

impl ShareTemplate {
    pub const fn farm() -> Self {
        Self {
            instagram_tags: "#FermeLocale #ProduitsFrais #Agriculture #Bio #Local #FarmToTable #Ferme #AgricultureDurable",
            facebook_tags: "#FermeLocale #ProduitsFrais #Agriculture #Bio #Local",
            twitter_tags: "#FermeLocale #ProduitsFrais #Agriculture #Bio #Local #FarmToTable",
            whatsapp_lead: "🌾 Nouveau produit disponible !",
            whatsapp_call: "Commandez maintenant ! 🛒",
        }
    }

    pub fn render(&self, base: &str, social_name: &str, product_name: Option<&str>) -> String {
        let tags = match Platform::for_message(social_name) {
            Platform::Instagram => self.instagram_tags,
            Platform::Facebook => self.facebook_tags,
            Platform::Twitter => self.twitter_tags,
            Platform::WhatsApp => {
                let name = product_name.filter(|n| !n.is_empty()).unwrap_or(FALLBACK_PRODUCT_NAME);
                return format!("{}\n\n{}\n\n{}", self.whatsapp_lead, name, self.whatsapp_call);
            }
            Platform::Other => return base.to_string(),
        };
        format!("{base}\n\n{tags}")
    }
}

impl Default for ShareTemplate {
    fn default() -> Self { Self::farm() }
}

/// Base message adapted to one social network with the farm template.
pub fn generate_social_message(base: &str, social_name: &str, product_name: Option<&str>) -> String {
    ShareTemplate::farm().render(base, social_name, product_name)
}

/// Message offered before the admin edits anything.
pub fn default_farm_message(product: &Product) -> String {
    let name = Some(product.name.as_str()).filter(|n| !n.is_empty()).unwrap_or(FALLBACK_PRODUCT_NAME);
    let description = product.description.as_deref().unwrap_or("");
    format!("🌾 Nouveau produit de la ferme disponible !\n\n{name}\n{description}\n\nDécouvrez nos produits frais et locaux ! 🚜")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ShareAction {
    OpenUrl(String),
    CopyToClipboard(String),
    Unsupported,
}

pub fn share_action(social: &Social, message: &str) -> ShareAction {
    let text = encode_component(message);
    match Platform::for_dispatch(&social.name) {
        Platform::WhatsApp => ShareAction::OpenUrl(format!("{WHATSAPP_SHARE_URL}{text}")),
        Platform::Twitter => ShareAction::OpenUrl(format!("{TWITTER_SHARE_URL}{text}")),
        Platform::Facebook => {
            let target = social.url.as_deref().filter(|u| !u.is_empty()).unwrap_or("#");
            ShareAction::OpenUrl(format!("{FACEBOOK_SHARE_URL}{}&quote={text}", encode_component(target)))
        }
        Platform::Instagram => ShareAction::CopyToClipboard(message.to_string()),
        Platform::Other => ShareAction::Unsupported,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareTask {
    pub social: String,
    pub message: String,
    pub action: ShareAction,
}

/// One task per social, in the order given.
pub fn plan_shares(base: &str, product: &Product, socials: &[Social]) -> Vec<ShareTask> {
    socials
        .iter()
        .map(|social| {
            let message = generate_social_message(base, &social.name, Some(&product.name));
            let action = share_action(social, &message);
            ShareTask { social: social.name.clone(), message, action }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SharePreview {
    pub social: String,
    pub message: String,
    pub char_count: usize,
    pub action: ShareAction,
}

pub fn preview(tasks: &[ShareTask]) -> Vec<SharePreview> {
    tasks
        .iter()
        .map(|task| SharePreview {
            social: task.social.clone(),
            message: task.message.clone(),
            char_count: task.message.encode_utf16().count(),
            action: task.action.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("share target unavailable: {0}")]
    Unavailable(String),
    #[error("share rejected: {0}")]
    Rejected(String),
}

/// Carries out a planned share action (opening a window, writing the clipboard).
#[async_trait::async_trait]
pub trait ShareDispatcher: Send + Sync {
    async fn dispatch(&self, action: &ShareAction) -> Result<(), DispatchError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ShareStatus {
    Sent,
    Skipped,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShareOutcome {
    pub social: String,
    pub status: ShareStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShareReport {
    pub outcomes: Vec<ShareOutcome>,
}

impl ShareReport {
    /// Every task that was processed, whatever its result.
    pub fn attempted(&self) -> usize { self.outcomes.len() }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == ShareStatus::Sent).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ShareOutcome> {
        self.outcomes.iter().filter(|o| matches!(o.status, ShareStatus::Failed(_)))
    }

    pub fn headline(&self) -> String {
        format!("✅ Produit partagé sur {} réseau(x) social(aux) !", self.attempted())
    }
}

/// Runs share tasks one after another with a fixed pause between them.
pub struct ShareRunner {
    dispatcher: Arc<dyn ShareDispatcher>,
    delay: Duration,
}

impl ShareRunner {
    pub fn new(dispatcher: Arc<dyn ShareDispatcher>) -> Self {
        Self { dispatcher, delay: DEFAULT_SHARE_DELAY }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run(&self, tasks: Vec<ShareTask>) -> ShareReport {
        let mut report = ShareReport::default();
        let total = tasks.len();

        for (index, task) in tasks.into_iter().enumerate() {
            let status = match &task.action {
                ShareAction::Unsupported => ShareStatus::Skipped,
                action => match self.dispatcher.dispatch(action).await {
                    Ok(()) => ShareStatus::Sent,
                    Err(e) => {
                        warn!(social = %task.social, error = %e, "share failed");
                        ShareStatus::Failed(e.to_string())
                    }
                },
            };
            debug!(social = %task.social, ?status, "share processed");
            report.outcomes.push(ShareOutcome { social: task.social, status });

            if index + 1 < total && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        report
    }
}
