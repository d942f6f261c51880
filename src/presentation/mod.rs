pub mod discord;

use crate::models::Poll;
use crate::voting::TierResults;
use async_trait::async_trait;
use std::time::Duration;

pub type PresentResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub const UNKNOWN_USER: &str = "Unknown User";

/// Where a poll's live view was published, kept so later updates can edit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel_id: String,
    pub message_id: String,
}

/// Renders polls and results on the chat platform.
#[async_trait]
pub trait PollPresenter: Send + Sync {
    async fn announce_start(&self, poll: &Poll) -> PresentResult<MessageHandle>;

    /// Must tolerate the message having been deleted; the scheduler only logs failures.
    async fn refresh(
        &self,
        handle: &MessageHandle,
        poll: &Poll,
        remaining: Duration,
        band: ProgressBand,
    ) -> PresentResult<()>;

    async fn announce_results(
        &self,
        handle: &MessageHandle,
        poll: &Poll,
        results: &TierResults,
    ) -> PresentResult<()>;
}

/// Best-effort user id to display name lookup. Never fails; unknown users get a placeholder.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn display_name(&self, guild_id: Option<&str>, user_id: &str) -> String;
}

pub async fn resolve_names(
    resolver: &dyn IdentityResolver,
    guild_id: Option<&str>,
    user_ids: &[String],
) -> Vec<String> {
    let mut names = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        names.push(resolver.display_name(guild_id, user_id).await);
    }
    names
}

/// Cosmetic escalation of a live poll as its deadline approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Fresh,
    Underway,
    Halfway,
    Closing,
    Ending,
}

impl ProgressBand {
    /// Buckets progress (`1 - remaining / total`) into fifths. Works in whole
    /// milliseconds so exact boundaries like 20% land in the upper band.
    pub fn from_remaining(remaining: Duration, total: Duration) -> Self {
        let total = total.as_millis().max(1);
        let spent = total.saturating_sub(remaining.as_millis());
        match spent * 5 / total {
            0 => ProgressBand::Fresh,
            1 => ProgressBand::Underway,
            2 => ProgressBand::Halfway,
            3 => ProgressBand::Closing,
            _ => ProgressBand::Ending,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            ProgressBand::Fresh => 0x5865F2,
            ProgressBand::Underway => 0x57F287,
            ProgressBand::Halfway => 0xFEE75C,
            ProgressBand::Closing => 0xFFA500,
            ProgressBand::Ending => 0xED4245,
        }
    }

    pub fn status_label(self) -> &'static str {
        match self {
            ProgressBand::Fresh => "Active",
            ProgressBand::Underway => "Active",
            ProgressBand::Halfway => "Halfway",
            ProgressBand::Closing => "Closing Soon",
            ProgressBand::Ending => "Ending",
        }
    }
}

/// `45s`, `2m` or `1m 5s`; partial seconds round up so a live poll never shows `0s`.
pub fn format_time_remaining(remaining: Duration) -> String {
    if remaining.is_zero() {
        return "0s".to_string();
    }
    let seconds = remaining.as_millis().div_ceil(1_000);
    if seconds < 60 {
        return format!("{}s", seconds);
    }
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    if seconds > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}m", minutes)
    }
}

pub fn format_vote_count(count: usize) -> String {
    format!("{} vote{}", count, if count == 1 { "" } else { "s" })
}

/// Joins names as prose: `A`, `A and B`, `A, B, and C`.
pub fn format_names(names: &[String]) -> String {
    match names {
        [] => "None".to_string(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn bands_split_at_fifths() {
        let total = Duration::from_secs(50);
        let band = |remaining_ms: u64| {
            ProgressBand::from_remaining(Duration::from_millis(remaining_ms), total)
        };
        assert_eq!(band(50_000), ProgressBand::Fresh);
        assert_eq!(band(40_001), ProgressBand::Fresh);
        assert_eq!(band(40_000), ProgressBand::Underway);
        assert_eq!(band(30_000), ProgressBand::Halfway);
        assert_eq!(band(20_000), ProgressBand::Closing);
        assert_eq!(band(10_000), ProgressBand::Ending);
        assert_eq!(band(0), ProgressBand::Ending);
    }

    #[test]
    fn time_remaining_rounds_up_seconds() {
        assert_eq!(format_time_remaining(Duration::ZERO), "0s");
        assert_eq!(format_time_remaining(Duration::from_millis(1)), "1s");
        assert_eq!(format_time_remaining(Duration::from_millis(29_400)), "30s");
        assert_eq!(format_time_remaining(Duration::from_secs(60)), "1m");
        assert_eq!(format_time_remaining(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_time_remaining(Duration::from_secs(600)), "10m");
    }

    #[test]
    fn vote_count_pluralises() {
        assert_eq!(format_vote_count(0), "0 votes");
        assert_eq!(format_vote_count(1), "1 vote");
        assert_eq!(format_vote_count(2), "2 votes");
    }

    #[test]
    fn names_join_as_prose() {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(format_names(&[]), "None");
        assert_eq!(format_names(&names(&["Ana"])), "Ana");
        assert_eq!(format_names(&names(&["Ana", "Bo"])), "Ana and Bo");
        assert_eq!(format_names(&names(&["Ana", "Bo", "Cy"])), "Ana, Bo, and Cy");
    }

    struct Directory(HashMap<String, String>);

    #[async_trait]
    impl IdentityResolver for Directory {
        async fn display_name(&self, _guild_id: Option<&str>, user_id: &str) -> String {
            self.0
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_USER.to_string())
        }
    }

    #[tokio::test]
    async fn resolve_names_falls_back_to_placeholder() {
        let directory = Directory(HashMap::from([("1".to_string(), "Ana".to_string())]));
        let names = resolve_names(&directory, None, &["1".to_string(), "2".to_string()]).await;
        assert_eq!(names, vec!["Ana".to_string(), UNKNOWN_USER.to_string()]);
    }
}
