use crate::models::Tier;
use crate::presentation::discord::{BRAND_COLOR, FOOTER_BRAND};
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::Timestamp;
use serenity::prelude::*;

pub const COMMAND_NAME: &str = "tier-help";

const START_USAGE: &str = "```/tier-vote topic:<topic> duration:<duration>```\n**Examples:**\n\
    • `/tier-vote topic:Performance Framework duration:2m`\n\
    • `/tier-vote topic:Product Quality Assessment duration:1m`";

const DURATION_FORMATS: &str =
    "• `30s` - 30 seconds\n• `1m` - 1 minute\n• `5m` - 5 minutes\n• **Range:** 15s to 10m";

const FEATURES: &str = "• Live vote tracking\n• Automatic tier averaging\n\
    • Highest and lowest rater analysis\n• One vote per user\n\
    • Vote changes allowed until the timer runs out";

pub fn create_help_command(
    command: &mut CreateApplicationCommand,
) -> &mut CreateApplicationCommand {
    command
        .name(COMMAND_NAME)
        .description("How to run a tier list vote")
}

fn tier_system() -> String {
    Tier::ALL
        .iter()
        .map(|tier| format!("**{}** - {}", tier.key(), tier.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle_help_command(
    ctx: &Context,
    command: &ApplicationCommandInteraction,
) -> Result<(), serenity::Error> {
    command
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| {
                    message.embed(|e| {
                        e.title("TierVote - Command Guide")
                            .description("**Tier list voting for Discord communities**")
                            .colour(BRAND_COLOR)
                            .field(
                                "Start a Vote",
                                START_USAGE,
                                false,
                            )
                            .field(
                                "Duration Formats",
                                DURATION_FORMATS,
                                true,
                            )
                            .field("Tier System", tier_system(), true)
                            .field(
                                "Features",
                                FEATURES,
                                false,
                            )
                            .footer(|f| f.text(FOOTER_BRAND))
                            .timestamp(Timestamp::now())
                    })
                })
        })
        .await
}
