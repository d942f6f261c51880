use crate::error::PollError;
use crate::models::StartRequest;
use crate::presentation::discord::{
    notice_embed, DiscordPresenter, ERROR_COLOR, SUCCESS_COLOR, WARNING_COLOR,
};
use crate::presentation::PollPresenter;
use crate::registry::PollRegistry;
use crate::tasks::poll_lifecycle::start_poll;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::*;
use std::sync::Arc;

pub const COMMAND_NAME: &str = "tier-vote";

const USAGE: &str = "**Correct Usage:**\n```/tier-vote topic:<topic> duration:<duration>```\n\n\
    **Examples:**\n• `/tier-vote topic:Best Development Framework duration:1m`\n\
    • `/tier-vote topic:Test Topic duration:30s`";

const DURATION_HELP: &str = "**Valid Duration Formats:**\n• `30s` - 30 seconds\n\
    • `1m` - 1 minute\n• `5m` - 5 minutes\n\n**Duration Limits:** 15 seconds to 10 minutes";

pub fn create_tier_vote_command(
    command: &mut CreateApplicationCommand,
) -> &mut CreateApplicationCommand {
    command
        .name(COMMAND_NAME)
        .description("Start a timed tier list vote in this channel")
        .create_option(|option| {
            option
                .name("topic")
                .description("What is being rated")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("duration")
                .description("How long the vote runs, e.g. 30s or 2m (15s to 10m)")
                .kind(CommandOptionType::String)
                .required(true)
        })
}

fn string_option(command: &ApplicationCommandInteraction, name: &str) -> Option<String> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_ref())
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// Title, body and colour of the reply shown to an initiator whose vote could not start.
pub fn describe_start_error(error: &PollError) -> (&'static str, String, u32) {
    match error {
        PollError::Duration(e) => (
            "Invalid Duration Format",
            format!("{}\n\n{}", e, DURATION_HELP),
            ERROR_COLOR,
        ),
        PollError::EmptyTopic => (
            "Invalid Command Usage",
            format!("{}\n\n{}", error, USAGE),
            ERROR_COLOR,
        ),
        PollError::AlreadyActive => (
            "Vote Already Active",
            "There is already an active vote in this channel. \
             Please wait for it to complete before starting a new one."
                .to_string(),
            WARNING_COLOR,
        ),
        PollError::Expired | PollError::Presentation(_) => {
            ("Vote Could Not Start", error.to_string(), ERROR_COLOR)
        }
    }
}

pub async fn handle_tier_vote_command(
    registry: &Arc<PollRegistry>,
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let creator_name = command
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| command.user.name.clone());

    let request = StartRequest {
        guild_id: command.guild_id.map(|id| id.0.to_string()),
        channel_id: command.channel_id.0.to_string(),
        creator_id: command.user.id.0.to_string(),
        creator_name,
        topic: string_option(command, "topic").unwrap_or_default(),
        // Units are matched case-insensitively at the command surface.
        duration_token: string_option(command, "duration").unwrap_or_default().to_lowercase(),
    };

    let presenter: Arc<dyn PollPresenter> = Arc::new(DiscordPresenter::new(Arc::clone(&ctx.http)));

    let (title, description, colour) = match start_poll(registry, &presenter, request).await {
        Ok(poll) => {
            info!("{} started tier vote {} on \"{}\"", command.user.name, poll.id, poll.topic);
            (
                "Vote Started",
                format!("Voting on **{}** is open for {}.", poll.topic, poll.duration),
                SUCCESS_COLOR,
            )
        }
        Err(e) => {
            info!("Rejected tier vote from {}: {}", command.user.name, e);
            describe_start_error(&e)
        }
    };

    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message
                        .ephemeral(true)
                        .embed(|e| notice_embed(e, title, &description, colour))
                })
        })
        .await?;

    Ok(())
}
