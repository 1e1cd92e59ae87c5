use async_trait::async_trait;
use photocast_core::{
    ensure_batch_size, BotIdentity, DeliveryReceipt, DeliverySink, PhotocastError, RenderMode,
};
use std::path::{Path, PathBuf};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::{InputFile, InputMedia, InputMediaPhoto, ParseMode, Recipient};
use teloxide::RequestError;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("invalid chat id {0:?}: expected a number or an @channel name")]
    InvalidChat(String),
    #[error("invalid Bot API url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("no valid photo files found")]
    NoValidFiles,
    #[error("Bot API request failed: {0}")]
    Request(#[from] RequestError),
}

impl From<TelegramError> for PhotocastError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::InvalidChat(value) => PhotocastError::InvalidConfiguration {
                key: "TELEGRAM_CHAT_ID".into(),
                reason: format!("{:?} is neither a number nor an @channel name", value),
            },
            TelegramError::InvalidApiUrl { url, reason } => PhotocastError::InvalidConfiguration {
                key: "TELEGRAM_API_URL".into(),
                reason: format!("{}: {}", url, reason),
            },
            other => PhotocastError::DeliveryFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Numeric chat id or `@channelusername`
    pub chat_id: String,
    /// Bot API server override; the public server when `None`
    pub api_url: Option<String>,
}

pub fn parse_recipient(raw: &str) -> Result<Recipient, TelegramError> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if raw.len() > 1 && raw.starts_with('@') {
        return Ok(Recipient::ChannelUsername(raw.to_string()));
    }
    Err(TelegramError::InvalidChat(raw.to_string()))
}

/// Long-lived bot handle bound to one destination chat
#[derive(Debug, Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat: Recipient,
    chat_label: String,
}

impl TelegramSink {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let chat = parse_recipient(&config.chat_id)?;
        let mut bot = Bot::new(&config.bot_token);
        if let Some(url) = &config.api_url {
            let parsed = reqwest::Url::parse(url).map_err(|e| TelegramError::InvalidApiUrl {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            bot = bot.set_api_url(parsed);
        }

        info!(chat = %config.chat_id.trim(), "Telegram sink initialized");
        Ok(Self {
            bot,
            chat,
            chat_label: config.chat_id.trim().to_string(),
        })
    }

    fn receipt(&self, messages: &[Message], skipped: Vec<PathBuf>) -> DeliveryReceipt {
        DeliveryReceipt {
            chat: self.chat_label.clone(),
            message_ids: messages.iter().map(|m| m.id.0).collect(),
            delivered: messages.len(),
            skipped,
        }
    }

    /// Sends 1-10 photos: a plain photo for one file, a media group otherwise.
    pub async fn send_photos(
        &self,
        files: &[PathBuf],
        caption: Option<&str>,
    ) -> Result<DeliveryReceipt, TelegramError> {
        info!(count = files.len(), "sending photos to Telegram");

        let (valid, skipped): (Vec<PathBuf>, Vec<PathBuf>) =
            files.iter().cloned().partition(|p| is_file(p));
        for path in &skipped {
            warn!(path = %path.display(), "photo file not found, skipping");
        }
        let caption = caption.filter(|c| !c.is_empty());

        let messages = match valid.as_slice() {
            [] => return Err(TelegramError::NoValidFiles),
            [single] => {
                let request = self.bot.send_photo(self.chat.clone(), InputFile::file(single));
                let message = match caption {
                    Some(text) => request.caption(text).await?,
                    None => request.await?,
                };
                vec![message]
            }
            many => {
                let media: Vec<InputMedia> = many
                    .iter()
                    .enumerate()
                    .map(|(i, path)| {
                        let photo = InputMediaPhoto::new(InputFile::file(path));
                        match caption {
                            Some(text) if i == 0 => InputMedia::Photo(photo.caption(text)),
                            _ => InputMedia::Photo(photo),
                        }
                    })
                    .collect();
                self.bot.send_media_group(self.chat.clone(), media).await?
            }
        };

        info!(count = messages.len(), "photos sent to Telegram");
        Ok(self.receipt(&messages, skipped))
    }

    pub async fn send_text(
        &self,
        text: &str,
        mode: RenderMode,
    ) -> Result<DeliveryReceipt, TelegramError> {
        let parse_mode = parse_mode_for(mode);
        info!(?mode, "sending text message to Telegram");
        let message = self
            .bot
            .send_message(self.chat.clone(), text)
            .parse_mode(parse_mode)
            .await?;
        Ok(self.receipt(&[message], Vec::new()))
    }

    pub async fn bot_info(&self) -> Result<BotIdentity, TelegramError> {
        let me = self.bot.get_me().await?;
        Ok(BotIdentity {
            id: me.user.id.0,
            username: me.username().to_string(),
            first_name: me.user.first_name.clone(),
            can_join_groups: me.can_join_groups,
            can_read_all_group_messages: me.can_read_all_group_messages,
            supports_inline_queries: me.supports_inline_queries,
        })
    }
}

/// `Markdown` is Telegram's legacy dialect, which accepts unescaped `.`, `-` and `(`
#[allow(deprecated)]
fn parse_mode_for(mode: RenderMode) -> ParseMode {
    match mode {
        RenderMode::Html => ParseMode::Html,
        RenderMode::Markdown => ParseMode::Markdown,
    }
}

fn is_file(path: &Path) -> bool {
    path.is_file()
}

#[async_trait]
impl DeliverySink for TelegramSink {
    fn id(&self) -> &'static str {
        "telegram"
    }

    async fn send_batch(
        &self,
        files: &[PathBuf],
        caption: Option<&str>,
    ) -> Result<DeliveryReceipt, PhotocastError> {
        ensure_batch_size(files.len())?;
        self.send_photos(files, caption).await.map_err(|e| {
            error!(error = %e, "error sending photos to Telegram");
            e.into()
        })
    }

    async fn send_message(
        &self,
        text: &str,
        mode: RenderMode,
    ) -> Result<DeliveryReceipt, PhotocastError> {
        self.send_text(text, mode).await.map_err(|e| {
            error!(error = %e, "error sending text message to Telegram");
            e.into()
        })
    }

    async fn check_connection(&self) -> bool {
        match self.bot_info().await {
            Ok(me) => {
                info!(username = %me.username, "connected to Telegram bot");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to connect to Telegram Bot API");
                false
            }
        }
    }

    async fn identity(&self) -> Result<BotIdentity, PhotocastError> {
        Ok(self.bot_info().await?)
    }
}
