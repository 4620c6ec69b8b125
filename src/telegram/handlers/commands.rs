//! Command handler implementations (/start, /help)

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::HandlerError;
use crate::core::messages;

/// Handle /start and /help: both answer with the static greeting
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, messages::GREETING).await?;
    Ok(())
}
