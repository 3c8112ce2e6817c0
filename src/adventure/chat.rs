//! Chat with the Ratoncito Pérez character.
//!
//! The conversation history belongs to the caller's [`ChatSession`]; the
//! client only reads and appends to it.

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ops, AdventureClient};
use crate::api::{self, ApiError, Backend};
use crate::content;
use crate::logutil::escape_log;
use crate::metrics;
use crate::model::ContentSource;

const DEFAULT_GREETING: &str = "¡Hola! Soy el Ratoncito Pérez. ¿En qué puedo ayudarte?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// One conversation, scoped to a place and a group of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub place_name: String,
    pub child_ages: Vec<u8>,
    pub history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(place_name: impl Into<String>, child_ages: Vec<u8>) -> Self {
        Self {
            place_name: place_name.into(),
            child_ages,
            history: Vec::new(),
        }
    }

    /// Move the conversation to another place; history is kept.
    pub fn set_place(&mut self, place_name: impl Into<String>) {
        self.place_name = place_name.into();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn push_exchange(&mut self, user: &str, bot: &str, limit: usize) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            content: user.to_string(),
        });
        self.history.push(ChatTurn {
            role: ChatRole::Bot,
            content: bot.to_string(),
        });
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }
}

/// A bot message ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub story: String,
    pub curiosity: String,
    pub place_name: String,
    /// `HH:MM`, UTC.
    pub timestamp: String,
    pub source: ContentSource,
}

#[derive(Debug, Deserialize)]
struct ChatbotResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    story: Option<String>,
    #[serde(default)]
    curiosity: Option<String>,
    #[serde(default)]
    place_name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExamplesResponse {
    #[serde(default)]
    examples: Vec<String>,
}

impl<B: Backend> AdventureClient<B> {
    /// Send `message` and append the exchange to the session history.
    pub async fn send_message(&self, session: &mut ChatSession, message: &str) -> ChatReply {
        let ages = self.ages(&session.child_ages);
        let body = json!({
            "message": message,
            "place_name": session.place_name,
            "children_ages": ages,
            "conversation_history": session.history,
        });
        debug!(
            "Chat message for {}: {}",
            escape_log(&session.place_name),
            escape_log(message)
        );

        let result = self
            .backend
            .post("adventure/chatbot", &body)
            .await
            .and_then(api::parse::<ChatbotResponse>)
            .and_then(|resp| {
                if resp.status.as_deref() == Some("success") {
                    Ok(resp)
                } else {
                    Err(ApiError::Rejected(resp.message.unwrap_or_else(|| {
                        format!("chatbot status {:?}", resp.status)
                    })))
                }
            });

        let timestamp = Utc::now().format("%H:%M").to_string();
        let reply = match result {
            Ok(resp) => {
                metrics::record_backend(ops::CHAT);
                ChatReply {
                    message: resp
                        .response
                        .filter(|r| !r.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
                    story: resp.story.unwrap_or_default(),
                    curiosity: resp.curiosity.unwrap_or_default(),
                    place_name: resp
                        .place_name
                        .unwrap_or_else(|| session.place_name.clone()),
                    timestamp,
                    source: ContentSource::Backend,
                }
            }
            Err(e) => {
                metrics::record_fallback(ops::CHAT);
                warn!("Chatbot falling back to canned reply: {}", e);
                ChatReply {
                    message: content::chat_response().to_string(),
                    story: String::new(),
                    curiosity: String::new(),
                    place_name: session.place_name.clone(),
                    timestamp,
                    source: ContentSource::Fallback,
                }
            }
        };

        session.push_exchange(message, &reply.message, self.config.chat_history_limit);
        reply
    }

    /// Suggested opening messages.
    pub async fn chat_examples(&self) -> Vec<String> {
        let result = self
            .backend
            .get("adventure/chatbot/examples")
            .await
            .and_then(api::parse::<ExamplesResponse>);
        match result {
            Ok(resp) if !resp.examples.is_empty() => resp.examples,
            Ok(_) => content::chat_examples(),
            Err(e) => {
                warn!("Chat examples falling back to local list: {}", e);
                content::chat_examples()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_only_latest_entries() {
        let mut session = ChatSession::new("Plaza Mayor", vec![6, 8]);
        for i in 0..7 {
            session.push_exchange(&format!("pregunta {}", i), &format!("respuesta {}", i), 10);
        }
        assert_eq!(session.history.len(), 10);
        assert_eq!(session.history[0].content, "pregunta 2");
        assert_eq!(session.history[9].content, "respuesta 6");
        assert_eq!(session.history[9].role, ChatRole::Bot);
    }

    #[test]
    fn history_serializes_roles_lowercase() {
        let turn = ChatTurn {
            role: ChatRole::User,
            content: "hola".to_string(),
        };
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "user");
    }
}
