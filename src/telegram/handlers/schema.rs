//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::handle_start_command;
use super::types::{HandlerDeps, HandlerError};
use crate::download::pipeline::Request;
use crate::telegram::bot::Command;
use crate::telegram::sink::TelegramChat;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and can be used in integration tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (pipeline, shutdown token)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Command handler
        .branch(command_handler())
        // Message handler for URLs and text
        .branch(message_handler(deps))
}

/// True for `/something` texts; unknown commands are ignored, not treated as links
pub fn is_command_text(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
            match cmd {
                Command::Start | Command::Help => handle_start_command(&bot, &msg).await?,
            }
            Ok(())
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some_and(|text| !is_command_text(text)))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let request = Request::new(msg.chat.id.0, msg.id.0, msg.text().unwrap_or_default());
                let chat = TelegramChat::new(bot, msg.chat.id);
                let outcome = deps.pipeline.handle(&chat, &request, &deps.shutdown).await;
                log::debug!("chat {}: message {} finished with {:?}", request.chat_id, request.message_id, outcome);
                Ok(())
            }
        })
}
