//! Handler - match rule plus action
//!
//! Match rules are a closed set of variants evaluated exhaustively; the
//! action is an arbitrary async callback supplied at registration time.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use contracts::{Message, Update};

/// Leading character that marks a command message
pub const COMMAND_PREFIX: char = '/';

/// Result type returned by handler actions
pub type HandlerResult = anyhow::Result<()>;

type BoxedAction = Box<dyn Fn(Update) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// What a handler matches on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// First command token (prefix stripped, case-folded) is one of `names`
    Command { names: Vec<String> },
    /// Any non-empty textual payload, commands included
    Text,
    /// At least one attached photo rendition
    Photo,
    /// Any non-empty textual payload; same predicate as `Text`, kept as a
    /// distinct variant so an unfiltered registration reads as intent
    Fallback,
}

impl MatchRule {
    /// Evaluate this rule against a message
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            Self::Command { names } => command_token(message)
                .is_some_and(|token| names.iter().any(|name| name == &token)),
            Self::Text | Self::Fallback => message.has_text(),
            Self::Photo => message.has_photo(),
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { names } => write!(f, "command[{}]", names.join(",")),
            Self::Text => write!(f, "text"),
            Self::Photo => write!(f, "photo"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Extract the case-folded command token from a message, if it is
/// command-shaped
fn command_token(message: &Message) -> Option<String> {
    let text = message.text.as_deref().filter(|t| !t.is_empty())?;
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    // Split on the first whitespace; a bare prefix yields an empty token
    let token = rest.split(char::is_whitespace).next().unwrap_or("");
    (!token.is_empty()).then(|| token.to_lowercase())
}

/// One registered routing entry
pub struct Handler {
    rule: MatchRule,
    action: BoxedAction,
}

impl Handler {
    /// Handler matching one or more command names
    ///
    /// Names are case-folded at registration time; `/Start` and `/start`
    /// route identically.
    pub fn command<I, S, F, Fut>(names: I, action: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Update) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let names = names
            .into_iter()
            .map(|name| name.into().to_lowercase())
            .collect();
        Self::with_rule(MatchRule::Command { names }, action)
    }

    /// Handler matching any non-empty text
    pub fn text<F, Fut>(action: F) -> Self
    where
        F: Fn(Update) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::with_rule(MatchRule::Text, action)
    }

    /// Handler matching any message with an attached photo
    pub fn photo<F, Fut>(action: F) -> Self
    where
        F: Fn(Update) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::with_rule(MatchRule::Photo, action)
    }

    /// Unfiltered handler: matches any non-empty text, commands included
    ///
    /// Register it after command handlers or it will shadow them.
    pub fn fallback<F, Fut>(action: F) -> Self
    where
        F: Fn(Update) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self::with_rule(MatchRule::Fallback, action)
    }

    fn with_rule<F, Fut>(rule: MatchRule, action: F) -> Self
    where
        F: Fn(Update) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            rule,
            action: Box::new(move |update| action(update).boxed()),
        }
    }

    /// The rule this handler was registered with
    pub fn rule(&self) -> &MatchRule {
        &self.rule
    }

    pub(crate) fn matches(&self, update: &Update) -> bool {
        self.rule.matches(&update.message)
    }

    pub(crate) async fn invoke(&self, update: Update) -> HandlerResult {
        (self.action)(update).await
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("rule", &self.rule).finish()
    }
}
