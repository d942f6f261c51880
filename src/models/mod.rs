pub mod duration;
pub mod tier;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

pub use duration::PollDuration;
pub use tier::Tier;

/// What the command layer hands to the core when someone starts a vote.
#[derive(Debug, Clone)]
pub struct StartRequest {
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub creator_id: String,
    pub creator_name: String,
    pub topic: String,
    pub duration_token: String,
}

/// One in-flight tier vote. The registry owns the live copy; everything
/// else works on clones.
#[derive(Debug, Clone)]
pub struct Poll {
    pub id: Uuid,
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub creator_id: String,
    pub creator_name: String,
    pub topic: String,
    pub duration: PollDuration,
    pub created_at: DateTime<Utc>,
    pub started_at: Instant,
    /// voter id -> chosen tier, one entry per voter
    pub votes: HashMap<String, Tier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    Updated,
}

impl Poll {
    pub fn new(
        guild_id: Option<String>,
        channel_id: String,
        creator_id: String,
        creator_name: String,
        topic: String,
        duration: PollDuration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            guild_id,
            channel_id,
            creator_id,
            creator_name,
            topic,
            duration,
            created_at: Utc::now(),
            started_at: Instant::now(),
            votes: HashMap::new(),
        }
    }

    /// Last write wins: a second vote from the same voter replaces the first.
    pub fn record_vote(&mut self, voter_id: &str, tier: Tier) -> VoteOutcome {
        match self.votes.insert(voter_id.to_string(), tier) {
            Some(_) => VoteOutcome::Updated,
            None => VoteOutcome::Recorded,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.votes.len()
    }

    pub fn deadline(&self) -> Instant {
        self.started_at + self.duration.as_std()
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.created_at + chrono::Duration::milliseconds(self.duration.as_millis() as i64)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started_at);
        self.duration.as_std().saturating_sub(elapsed)
    }
}
