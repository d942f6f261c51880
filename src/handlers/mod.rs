mod vote;

use crate::presentation::discord::TIER_SELECT_ID;
use crate::registry::PollRegistry;
use log::{error, info, warn};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::prelude::*;
use std::sync::Arc;

// Routes select menu clicks to the matching handler
pub async fn handle_component(
    registry: &Arc<PollRegistry>,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let custom_id = component.data.custom_id.as_str();
    info!("Received component interaction: {}", custom_id);

    if custom_id == TIER_SELECT_ID {
        vote::handle_tier_select(registry, ctx, component).await?;
    } else {
        warn!("Unhandled component custom_id: {}", custom_id);
        component
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content("Unknown action.").ephemeral(true)
                    })
            })
            .await?;
    }

    Ok(())
}

pub async fn handle_interaction(
    registry: &Arc<PollRegistry>,
    ctx: &Context,
    interaction: Interaction,
) {
    let result = match interaction {
        Interaction::ApplicationCommand(command) => {
            info!("Received command: {}", command.data.name);
            crate::commands::handle_command(registry, ctx, &command).await
        }
        Interaction::MessageComponent(component) => {
            handle_component(registry, ctx, &component).await
        }
        _ => {
            warn!("Unhandled interaction type: {:?}", interaction.kind());
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("Interaction handler error: {:?}", why);
    }
}
