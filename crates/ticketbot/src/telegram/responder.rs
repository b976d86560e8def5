//! Sends ticket replies through the Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup};

use crate::core::AppResult;
use crate::ticket::{Keyboard, Reply, Responder};

/// Converts a reply keyboard into Telegram markup
pub fn keyboard_markup(keyboard: &Keyboard) -> ReplyMarkup {
    let markup = match keyboard {
        Keyboard::Choices(choices) => KeyboardMarkup::new(
            choices
                .iter()
                .map(|choice| vec![KeyboardButton::new(choice.clone())]),
        )
        .resize_keyboard()
        .selective(),
        Keyboard::Single(label) => KeyboardMarkup::new(vec![vec![KeyboardButton::new(label.clone())]]).resize_keyboard(),
    };
    ReplyMarkup::Keyboard(markup)
}

#[derive(Clone)]
pub struct TelegramResponder {
    bot: Bot,
}

impl TelegramResponder {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Responder for TelegramResponder {
    async fn send(&self, chat_id: i64, reply: &Reply) -> AppResult<()> {
        let chat_id = ChatId(chat_id);
        match reply {
            Reply::Message { text, keyboard, html } => {
                let mut request = self.bot.send_message(chat_id, text.clone());
                if *html {
                    request = request.parse_mode(ParseMode::Html);
                }
                if let Some(keyboard) = keyboard {
                    request = request.reply_markup(keyboard_markup(keyboard));
                }
                request.await?;
            }
            Reply::Photo(file) => {
                self.bot
                    .send_photo(chat_id, InputFile::file_id(FileId(file.0.clone())))
                    .await?;
            }
        }
        Ok(())
    }
}
