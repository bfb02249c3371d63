//! Status composition: draft building for compose/reply/quote, readline-style
//! line accumulation, and text validation.
//!
//! The interactive prompt itself belongs to the UI layer; everything here is
//! the workflow state underneath it, so a cancelled prompt simply drops the
//! session without touching any repository.

use crate::client::PostParams;
use crate::error::{Error, Result};
use crate::model::{Status, StatusId};
use crate::repository::UserRepository;

/// Maximum status length in characters.
pub const MAX_STATUS_LENGTH: usize = 140;

/// Characters the service rejects anywhere in a status body.
fn is_invalid_char(c: char) -> bool {
    matches!(c, '\u{FFFE}' | '\u{FEFF}' | '\u{FFFF}' | '\u{202A}'..='\u{202E}')
}

/// Length of a status body as the service counts it.
pub fn status_length(text: &str) -> usize {
    text.trim().chars().count()
}

/// Checks a fully assembled status body against the service's rules.
pub fn validate(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    if text.chars().any(is_invalid_char) {
        return Err(Error::InvalidCharacters);
    }
    let length = status_length(text);
    if length > MAX_STATUS_LENGTH {
        return Err(Error::TextTooLong {
            length,
            max: MAX_STATUS_LENGTH,
        });
    }
    Ok(())
}

/// Builds drafts for the three composition modes. Reply and quote resolve
/// the original author through the user repository.
#[derive(Clone)]
pub struct Composer {
    users: UserRepository,
    base_url: String,
}

impl Composer {
    pub fn new(users: UserRepository, base_url: impl Into<String>) -> Self {
        Self {
            users,
            base_url: base_url.into(),
        }
    }

    pub fn compose(&self) -> Draft {
        Draft {
            leading_text: "Compose new status".to_string(),
            prompt: "> ".to_string(),
            prefix: None,
            suffix: None,
            in_reply_to_status_id: None,
        }
    }

    pub fn reply(&self, status: &Status) -> Result<Draft> {
        let screen_name = self.author_screen_name(status)?;
        Ok(Draft {
            leading_text: format!("Replying to @{}\n\n{}", screen_name, status.text),
            prompt: format!("> @{} ", screen_name),
            prefix: Some(format!("@{} ", screen_name)),
            suffix: None,
            in_reply_to_status_id: Some(status.id.clone()),
        })
    }

    pub fn quote(&self, status: &Status) -> Result<Draft> {
        let screen_name = self.author_screen_name(status)?;
        let url = self.status_url(&screen_name, &status.id);
        Ok(Draft {
            leading_text: format!("Quoting @{}'s status\n\n{}", screen_name, status.text),
            prompt: "> ".to_string(),
            prefix: None,
            suffix: Some(format!(" {}", url)),
            in_reply_to_status_id: None,
        })
    }

    fn author_screen_name(&self, status: &Status) -> Result<String> {
        self.users
            .find(&status.user_id)
            .map(|user| user.screen_name)
            .ok_or_else(|| Error::NotFound(format!("user {}", status.user_id)))
    }

    fn status_url(&self, screen_name: &str, id: &StatusId) -> String {
        format!(
            "{}/{}/status/{}",
            self.base_url.trim_end_matches('/'),
            screen_name,
            id
        )
    }
}

/// A prepared composition: what to show above the prompt, the prompt itself,
/// and how the typed body is turned into the final status text.
#[derive(Debug, Clone)]
pub struct Draft {
    pub leading_text: String,
    pub prompt: String,
    prefix: Option<String>,
    suffix: Option<String>,
    pub in_reply_to_status_id: Option<StatusId>,
}

impl Draft {
    /// Assembles the final status text from the typed body.
    pub fn body(&self, raw: &str) -> String {
        let mut text = String::new();
        if let Some(prefix) = &self.prefix {
            text.push_str(prefix);
        }
        text.push_str(raw);
        if let Some(suffix) = &self.suffix {
            text.push_str(suffix);
        }
        text
    }

    /// Validates the assembled text and produces the post parameters.
    pub fn finish(&self, raw: &str) -> Result<PostParams> {
        let text = self.body(raw);
        validate(&text)?;
        Ok(PostParams {
            text,
            in_reply_to_status_id: self.in_reply_to_status_id.clone(),
        })
    }
}

/// Accumulates typed lines into a status body.
///
/// A line ending with `\` continues on the next line; a blank line or a line
/// without the continuation marker completes the body.
#[derive(Debug, Default)]
pub struct DraftBuffer {
    raw: String,
    complete: bool,
}

impl DraftBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one typed line; returns true once the body is complete.
    pub fn push_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            self.complete = true;
        } else if let Some(stripped) = line.strip_suffix('\\') {
            self.raw.push_str(stripped.trim_end());
            self.raw.push('\n');
        } else {
            self.raw.push_str(line);
            self.complete = true;
        }
        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Takes the accumulated body, resetting the buffer for another round.
    pub fn take(&mut self) -> String {
        self.complete = false;
        std::mem::take(&mut self.raw)
    }
}

/// Outcome of feeding a line into a [`ComposeSession`].
#[derive(Debug)]
pub enum ComposeOutcome {
    /// More input is expected.
    Pending,
    /// The user submitted nothing; the session ends without a post.
    Discarded,
    /// The body failed validation; the buffer was reset for another attempt.
    Rejected(Error),
    /// The body validated; these parameters are ready for the API client.
    Posted(PostParams),
}

/// The input loop around one draft: lines go in, a post (or nothing) comes
/// out. An invalid body reports the reason and starts the buffer over, the
/// way the interactive prompt re-asks.
#[derive(Debug)]
pub struct ComposeSession {
    draft: Draft,
    buffer: DraftBuffer,
}

impl ComposeSession {
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            buffer: DraftBuffer::new(),
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn push_line(&mut self, line: &str) -> ComposeOutcome {
        if !self.buffer.push_line(line) {
            return ComposeOutcome::Pending;
        }

        let raw = self.buffer.take();
        if raw.is_empty() {
            return ComposeOutcome::Discarded;
        }

        match self.draft.finish(&raw) {
            Ok(params) => ComposeOutcome::Posted(params),
            Err(Error::EmptyText) => ComposeOutcome::Discarded,
            Err(error) => ComposeOutcome::Rejected(error),
        }
    }
}
