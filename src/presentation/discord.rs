use crate::models::{Poll, Tier, VoteOutcome};
use crate::presentation::{
    format_names, format_time_remaining, format_vote_count, resolve_names, IdentityResolver,
    MessageHandle, PollPresenter, PresentResult, ProgressBand, UNKNOWN_USER,
};
use crate::voting::{ExtremalVoters, TierResults};
use async_trait::async_trait;
use log::{debug, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::Timestamp;
use std::sync::Arc;
use std::time::Duration;

pub const TIER_SELECT_ID: &str = "tier_vote_select";
pub const TIER_VALUE_PREFIX: &str = "vote_";

pub const BRAND_COLOR: u32 = 0x5865F2;
pub const SUCCESS_COLOR: u32 = 0x57F287;
pub const WARNING_COLOR: u32 = 0xFEE75C;
pub const ERROR_COLOR: u32 = 0xED4245;
const ENDED_COLOR: u32 = 0x747F8D;

pub const FOOTER_BRAND: &str = "TierVote";

/// Renders polls as Discord embeds with a tier select menu.
pub struct DiscordPresenter {
    http: Arc<Http>,
}

impl DiscordPresenter {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn parse_snowflake(raw: &str) -> PresentResult<u64> {
    raw.parse::<u64>()
        .map_err(|e| format!("invalid Discord id `{}`: {}", raw, e).into())
}

fn tier_overview() -> String {
    Tier::ALL
        .iter()
        .map(|tier| format!("**{}** - {}", tier.label(), tier.summary()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn poll_embed<'a>(e: &'a mut CreateEmbed, poll: &Poll) -> &'a mut CreateEmbed {
    e.title("Tier List Vote")
        .description(format!(
            "**Topic:** {}\n\nSelect your tier classification from the dropdown menu below. \
             Each tier represents a different level of quality and performance.\n\n\
             **Tier Classifications:**\n{}",
            poll.topic,
            tier_overview()
        ))
        .footer(|f| f.text(format!("Started by {} • {}", poll.creator_name, FOOTER_BRAND)))
        .timestamp(Timestamp::now())
}

fn tier_select(c: &mut CreateComponents) -> &mut CreateComponents {
    c.create_action_row(|row| {
        row.create_select_menu(|menu| {
            menu.custom_id(TIER_SELECT_ID)
                .placeholder("Select a tier classification")
                .options(|opts| {
                    for tier in Tier::ALL {
                        opts.create_option(|opt| {
                            opt.label(tier.label())
                                .description(tier.description())
                                .value(format!("{}{}", TIER_VALUE_PREFIX, tier.key()))
                        });
                    }
                    opts
                })
        })
    })
}

fn disabled_select(c: &mut CreateComponents) -> &mut CreateComponents {
    c.create_action_row(|row| {
        row.create_select_menu(|menu| {
            menu.custom_id(format!("{}_disabled", TIER_SELECT_ID))
                .placeholder("Vote has ended")
                .disabled(true)
                .options(|opts| {
                    opts.create_option(|opt| {
                        opt.label("Vote Ended")
                            .description("This vote is no longer active")
                            .value("disabled")
                    })
                })
        })
    })
}

/// Lines like `**A-Tier**: 2 votes (50.0%)` for every tier that received a vote.
pub fn distribution_lines(results: &TierResults) -> String {
    let lines: Vec<String> = results
        .counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(tier, count)| {
            let percentage = results.percentage(*tier).unwrap_or(0.0);
            format!("**{}**: {} ({:.1}%)", tier.label(), format_vote_count(*count), percentage)
        })
        .collect();

    if lines.is_empty() {
        "No votes received".to_string()
    } else {
        lines.join("\n")
    }
}

impl DiscordPresenter {
    async fn extremal_line(
        &self,
        heading: &str,
        poll: &Poll,
        extremal: Option<&ExtremalVoters>,
    ) -> String {
        match extremal {
            Some(extremal) => {
                let names = resolve_names(self, poll.guild_id.as_deref(), &extremal.voters).await;
                format!("**{} ({}):** {}", heading, extremal.tier.label(), format_names(&names))
            }
            None => format!("**{}:** None", heading),
        }
    }
}

#[async_trait]
impl PollPresenter for DiscordPresenter {
    async fn announce_start(&self, poll: &Poll) -> PresentResult<MessageHandle> {
        let channel = ChannelId(parse_snowflake(&poll.channel_id)?);
        let message = channel
            .send_message(&self.http, |m| {
                m.embed(|e| {
                    poll_embed(e, poll)
                        .colour(BRAND_COLOR)
                        .field("Vote Duration", poll.duration.to_string(), true)
                        .field("Participants", format_vote_count(0), true)
                        .field("Status", ProgressBand::Fresh.status_label(), true)
                        .field("Ends", format!("<t:{}:R>", poll.ends_at().timestamp()), false)
                })
                .components(tier_select)
            })
            .await?;

        Ok(MessageHandle {
            channel_id: poll.channel_id.clone(),
            message_id: message.id.0.to_string(),
        })
    }

    async fn refresh(
        &self,
        handle: &MessageHandle,
        poll: &Poll,
        remaining: Duration,
        band: ProgressBand,
    ) -> PresentResult<()> {
        let channel = ChannelId(parse_snowflake(&handle.channel_id)?);
        let message = MessageId(parse_snowflake(&handle.message_id)?);
        channel
            .edit_message(&self.http, message, |m| {
                m.embed(|e| {
                    poll_embed(e, poll)
                        .colour(band.color())
                        .field("Time Remaining", format_time_remaining(remaining), true)
                        .field("Participants", format_vote_count(poll.participant_count()), true)
                        .field("Status", band.status_label(), true)
                })
            })
            .await?;
        Ok(())
    }

    async fn announce_results(
        &self,
        handle: &MessageHandle,
        poll: &Poll,
        results: &TierResults,
    ) -> PresentResult<()> {
        let channel = ChannelId(parse_snowflake(&handle.channel_id)?);
        let message = MessageId(parse_snowflake(&handle.message_id)?);
        let final_tier = results.final_tier;

        // The live message may be gone; results are still worth posting.
        if let Err(e) = channel
            .edit_message(&self.http, message, |m| {
                m.embed(|e| {
                    poll_embed(e, poll)
                        .colour(ENDED_COLOR)
                        .field("Status", "Ended", true)
                        .field("Final Count", format_vote_count(results.total_votes), true)
                        .field("Result", final_tier.label(), true)
                })
                .components(disabled_select)
            })
            .await
        {
            warn!("Could not close poll message {}: {}", handle.message_id, e);
        }

        let analysis = if results.total_votes > 0 {
            let highest = self
                .extremal_line("Highest Rating", poll, results.highest.as_ref())
                .await;
            let lowest = self
                .extremal_line("Lowest Rating", poll, results.lowest.as_ref())
                .await;
            Some(format!("{}\n{}", highest, lowest))
        } else {
            None
        };

        channel
            .send_message(&self.http, |m| {
                m.embed(|e| {
                    e.title("Vote Results")
                        .description(format!("**Topic:** {}", poll.topic))
                        .colour(final_tier.color())
                        .field(
                            "Final Tier Classification",
                            format!(
                                "**{}**\n{}\n\nAverage Score: {:.2}/{}.00",
                                final_tier.label(),
                                final_tier.description(),
                                results.average_score,
                                Tier::MAX_WEIGHT
                            ),
                            false,
                        )
                        .field("Vote Distribution", distribution_lines(results), true)
                        .field(
                            "Statistics",
                            format!(
                                "**Total Participants:** {}\n**Vote Duration:** {}",
                                results.total_votes, poll.duration
                            ),
                            true,
                        );
                    if let Some(analysis) = &analysis {
                        e.field("Voter Analysis", analysis, false);
                    }
                    e.footer(|f| {
                        f.text(format!(
                            "Vote ended • Started by {} • {}",
                            poll.creator_name, FOOTER_BRAND
                        ))
                    })
                    .timestamp(Timestamp::now())
                })
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for DiscordPresenter {
    async fn display_name(&self, guild_id: Option<&str>, user_id: &str) -> String {
        let Ok(user) = user_id.parse::<u64>() else {
            return UNKNOWN_USER.to_string();
        };

        if let Some(guild) = guild_id.and_then(|g| g.parse::<u64>().ok()) {
            match self.http.get_member(guild, user).await {
                Ok(member) => return member.nick.unwrap_or(member.user.name),
                Err(e) => debug!("Member lookup failed for {} in guild {}: {}", user, guild, e),
            }
        }

        match self.http.get_user(user).await {
            Ok(user) => user.name,
            Err(e) => {
                warn!("User lookup failed for {}: {}", user_id, e);
                UNKNOWN_USER.to_string()
            }
        }
    }
}

/// Ephemeral confirmation shown to a voter.
pub fn vote_receipt_embed(
    e: &mut CreateEmbed,
    tier: Tier,
    outcome: VoteOutcome,
) -> &mut CreateEmbed {
    let footer = match outcome {
        VoteOutcome::Recorded => "Vote recorded",
        VoteOutcome::Updated => "Vote updated",
    };
    e.title("Vote Recorded")
        .description(format!("You selected **{}**\n\n{}", tier.label(), tier.description()))
        .colour(tier.color())
        .footer(|f| f.text(format!("{} • {}", footer, FOOTER_BRAND)))
        .timestamp(Timestamp::now())
}

pub fn notice_embed<'a>(
    e: &'a mut CreateEmbed,
    title: &str,
    description: &str,
    colour: u32,
) -> &'a mut CreateEmbed {
    e.title(title)
        .description(description)
        .colour(colour)
        .footer(|f| f.text(FOOTER_BRAND))
        .timestamp(Timestamp::now())
}
