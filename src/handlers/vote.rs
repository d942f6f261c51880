use crate::error::PollError;
use crate::models::Tier;
use crate::presentation::discord::{
    notice_embed, vote_receipt_embed, ERROR_COLOR, TIER_VALUE_PREFIX,
};
use crate::registry::PollRegistry;
use log::{error, info};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;
use std::sync::Arc;

/// Maps a select menu value such as `vote_S` to its tier.
fn parse_tier_value(value: &str) -> Option<Tier> {
    value.strip_prefix(TIER_VALUE_PREFIX).and_then(Tier::from_key)
}

pub async fn handle_tier_select(
    registry: &Arc<PollRegistry>,
    ctx: &Context,
    component: &MessageComponentInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(tier) = component.data.values.first().and_then(|value| parse_tier_value(value)) else {
        error!("Unrecognised tier selection: {:?}", component.data.values);
        component
            .create_interaction_response(&ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredUpdateMessage)
            })
            .await?;
        return Ok(());
    };

    let channel_id = component.channel_id.0.to_string();
    let voter_id = component.user.id.0.to_string();

    match registry.submit_vote(&channel_id, &voter_id, tier).await {
        Ok(outcome) => {
            info!("{:?} {} vote from {} in channel {}", outcome, tier.key(), voter_id, channel_id);
            component
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message
                                .ephemeral(true)
                                .embed(|e| vote_receipt_embed(e, tier, outcome))
                        })
                })
                .await?;
        }
        Err(PollError::Expired) => {
            component
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| {
                            message.ephemeral(true).embed(|e| {
                                notice_embed(
                                    e,
                                    "Vote Expired",
                                    "This vote has already ended or expired.",
                                    ERROR_COLOR,
                                )
                            })
                        })
                })
                .await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
