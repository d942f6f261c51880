use crate::error::PollError;
use crate::models::{Poll, Tier, VoteOutcome};
use crate::presentation::MessageHandle;
use crate::tasks::poll_lifecycle::PollTasks;
use log::debug;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollPhase {
    Active,
    Finalizing,
}

struct PollEntry {
    poll: Poll,
    phase: PollPhase,
    message: Option<MessageHandle>,
    tasks: Option<PollTasks>,
}

/// Channel id -> the one poll running there.
///
/// Every change to a poll goes through the single lock below, so vote
/// submissions, finalization and removal never interleave mid-update.
/// Owned by the process and shared through `Arc`.
#[derive(Default)]
pub struct PollRegistry {
    polls: Mutex<HashMap<String, PollEntry>>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `poll` for its channel unless one is already registered there.
    pub async fn try_start(&self, poll: Poll) -> Result<Poll, PollError> {
        let mut polls = self.polls.lock().await;
        if polls.contains_key(&poll.channel_id) {
            return Err(PollError::AlreadyActive);
        }
        polls.insert(
            poll.channel_id.clone(),
            PollEntry {
                poll: poll.clone(),
                phase: PollPhase::Active,
                message: None,
                tasks: None,
            },
        );
        Ok(poll)
    }

    pub async fn get(&self, channel_id: &str) -> Option<Poll> {
        let polls = self.polls.lock().await;
        polls.get(channel_id).map(|entry| entry.poll.clone())
    }

    /// Snapshot of poll `poll_id` if it is still taking votes.
    pub async fn get_active(&self, channel_id: &str, poll_id: Uuid) -> Option<Poll> {
        let polls = self.polls.lock().await;
        polls
            .get(channel_id)
            .filter(|entry| entry.poll.id == poll_id && entry.phase == PollPhase::Active)
            .map(|entry| entry.poll.clone())
    }

    /// Hands the published message and scheduled tasks to the entry. Returns
    /// the tasks back when the poll is already gone so the caller can stop them.
    pub async fn attach(
        &self,
        channel_id: &str,
        poll_id: Uuid,
        message: MessageHandle,
        tasks: PollTasks,
    ) -> Result<(), PollTasks> {
        let mut polls = self.polls.lock().await;
        match polls.get_mut(channel_id) {
            Some(entry) if entry.poll.id == poll_id => {
                entry.message = Some(message);
                entry.tasks = Some(tasks);
                Ok(())
            }
            _ => Err(tasks),
        }
    }

    pub async fn submit_vote(
        &self,
        channel_id: &str,
        voter_id: &str,
        tier: Tier,
    ) -> Result<VoteOutcome, PollError> {
        let mut polls = self.polls.lock().await;
        let entry = polls
            .get_mut(channel_id)
            .filter(|entry| entry.phase == PollPhase::Active)
            .ok_or(PollError::Expired)?;

        let outcome = entry.poll.record_vote(voter_id, tier);
        debug!(
            "Vote {:?} for poll {} in channel {}: {} -> {}",
            outcome,
            entry.poll.id,
            channel_id,
            voter_id,
            tier.key()
        );
        Ok(outcome)
    }

    /// Moves poll `poll_id` from Active to Finalizing and returns its frozen
    /// state. Only the first caller gets `Some`; votes are refused from here on
    /// and the refresh task is stopped so no live edit can follow the results.
    pub async fn begin_finalize(
        &self,
        channel_id: &str,
        poll_id: Uuid,
    ) -> Option<(Poll, Option<MessageHandle>)> {
        let mut polls = self.polls.lock().await;
        let entry = polls
            .get_mut(channel_id)
            .filter(|entry| entry.poll.id == poll_id && entry.phase == PollPhase::Active)?;
        entry.phase = PollPhase::Finalizing;
        if let Some(tasks) = &entry.tasks {
            tasks.stop_refresh();
        }
        Some((entry.poll.clone(), entry.message.clone()))
    }

    /// Drops whatever poll the channel holds and stops its scheduled tasks.
    pub async fn remove(&self, channel_id: &str) -> Option<Poll> {
        let entry = self.polls.lock().await.remove(channel_id)?;
        if let Some(tasks) = &entry.tasks {
            tasks.abort();
        }
        Some(entry.poll)
    }

    /// Removes the channel's entry only if it still belongs to `poll_id`.
    pub async fn remove_poll(&self, channel_id: &str, poll_id: Uuid) -> Option<Poll> {
        let entry = {
            let mut polls = self.polls.lock().await;
            if polls.get(channel_id).map(|entry| entry.poll.id) != Some(poll_id) {
                return None;
            }
            polls.remove(channel_id)?
        };
        if let Some(tasks) = &entry.tasks {
            tasks.abort();
        }
        Some(entry.poll)
    }

    pub async fn channel_ids(&self) -> Vec<String> {
        self.polls.lock().await.keys().cloned().collect()
    }

    pub async fn active_count(&self) -> usize {
        self.polls.lock().await.len()
    }
}
