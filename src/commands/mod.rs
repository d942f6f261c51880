pub mod help;
pub mod tier_vote;

use crate::registry::PollRegistry;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

/// Registers the slash commands on one guild (shows up immediately) or globally.
pub async fn register_commands(
    ctx: &Context,
    guild_id: Option<GuildId>,
) -> Result<(), serenity::Error> {
    match guild_id {
        Some(guild_id) => {
            guild_id
                .set_application_commands(&ctx.http, |commands| {
                    commands
                        .create_application_command(tier_vote::create_tier_vote_command)
                        .create_application_command(help::create_help_command)
                })
                .await?;
        }
        None => {
            Command::set_global_application_commands(&ctx.http, |commands| {
                commands
                    .create_application_command(tier_vote::create_tier_vote_command)
                    .create_application_command(help::create_help_command)
            })
            .await?;
        }
    }

    Ok(())
}

pub async fn handle_command(
    registry: &Arc<PollRegistry>,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match command.data.name.as_str() {
        tier_vote::COMMAND_NAME => {
            tier_vote::handle_tier_vote_command(registry, ctx, command).await?
        }
        help::COMMAND_NAME => help::handle_help_command(ctx, command).await?,
        _ => {
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.content("Unknown command").ephemeral(true)
                        })
                })
                .await?;
        }
    }

    Ok(())
}
