use crate::error::PollError;
use crate::models::{Poll, PollDuration, StartRequest};
use crate::presentation::{MessageHandle, PollPresenter, ProgressBand};
use crate::registry::PollRegistry;
use crate::voting::calculate_results;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use uuid::Uuid;

pub const REFRESH_INTERVAL: StdDuration = StdDuration::from_secs(10);

/// The two timers that drive one poll. Aborting them is the only way a poll
/// stops early.
#[derive(Debug)]
pub struct PollTasks {
    deadline: JoinHandle<()>,
    refresh: JoinHandle<()>,
}

impl PollTasks {
    pub fn abort(&self) {
        self.deadline.abort();
        self.refresh.abort();
    }

    /// Stops the refresh loop, including an edit still in flight, and leaves
    /// the deadline task running.
    pub fn stop_refresh(&self) {
        self.refresh.abort();
    }
}

/// Validates the request, reserves the channel, publishes the poll and
/// schedules its refresh and deadline.
pub async fn start_poll(
    registry: &Arc<PollRegistry>,
    presenter: &Arc<dyn PollPresenter>,
    request: StartRequest,
) -> Result<Poll, PollError> {
    let duration = PollDuration::parse(&request.duration_token)?;
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(PollError::EmptyTopic);
    }

    let poll = registry
        .try_start(Poll::new(
            request.guild_id,
            request.channel_id,
            request.creator_id,
            request.creator_name,
            topic.to_string(),
            duration,
        ))
        .await?;

    let handle = match presenter.announce_start(&poll).await {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to announce poll {} in channel {}: {}", poll.id, poll.channel_id, e);
            cancel_poll(registry, &poll.channel_id).await;
            return Err(PollError::Presentation(e.to_string()));
        }
    };

    let tasks = PollTasks {
        deadline: spawn_deadline(registry, presenter, &poll),
        refresh: spawn_refresh(registry, presenter, &poll, handle.clone()),
    };

    if let Err(tasks) = registry.attach(&poll.channel_id, poll.id, handle, tasks).await {
        // Only possible if the poll was torn down while announcing.
        warn!("Poll {} vanished before its timers were attached", poll.id);
        tasks.abort();
        return Err(PollError::Expired);
    }

    info!(
        "Started poll {} in channel {} by {}: \"{}\" for {} (ends {})",
        poll.id,
        poll.channel_id,
        poll.creator_id,
        poll.topic,
        poll.duration,
        poll.ends_at().to_rfc3339()
    );
    Ok(poll)
}

fn spawn_deadline(
    registry: &Arc<PollRegistry>,
    presenter: &Arc<dyn PollPresenter>,
    poll: &Poll,
) -> JoinHandle<()> {
    let registry = Arc::clone(registry);
    let presenter = Arc::clone(presenter);
    let channel_id = poll.channel_id.clone();
    let poll_id = poll.id;
    let deadline = poll.deadline();

    tokio::spawn(async move {
        sleep_until(deadline).await;
        finalize_poll(&registry, presenter.as_ref(), &channel_id, poll_id).await;
    })
}

fn spawn_refresh(
    registry: &Arc<PollRegistry>,
    presenter: &Arc<dyn PollPresenter>,
    poll: &Poll,
    handle: MessageHandle,
) -> JoinHandle<()> {
    let registry = Arc::clone(registry);
    let presenter = Arc::clone(presenter);
    let channel_id = poll.channel_id.clone();
    let poll_id = poll.id;
    let first_tick = poll.started_at + REFRESH_INTERVAL;

    tokio::spawn(async move {
        let mut ticker = interval_at(first_tick, REFRESH_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let Some(poll) = registry.get_active(&channel_id, poll_id).await else {
                debug!("Poll {} no longer active, stopping refresh", poll_id);
                break;
            };

            let remaining = poll.remaining(Instant::now());
            let band = ProgressBand::from_remaining(remaining, poll.duration.as_std());

            if let Err(e) = presenter.refresh(&handle, &poll, remaining, band).await {
                warn!("Failed to refresh poll {} in channel {}: {}", poll_id, channel_id, e);
            }
        }
    })
}

/// Scores and publishes poll `poll_id`, then frees its channel. Returns false
/// without doing anything when the poll was already finalized or removed.
pub async fn finalize_poll(
    registry: &PollRegistry,
    presenter: &dyn PollPresenter,
    channel_id: &str,
    poll_id: Uuid,
) -> bool {
    let Some((poll, handle)) = registry.begin_finalize(channel_id, poll_id).await else {
        debug!("Poll {} in channel {} already finalized", poll_id, channel_id);
        return false;
    };

    let results = calculate_results(&poll);
    info!(
        "Poll {} in channel {} ended as {} ({} votes, average {:.2}): {}",
        poll.id,
        channel_id,
        results.final_tier.label(),
        results.total_votes,
        results.average_score,
        serde_json::to_string(&results).unwrap_or_default()
    );

    match handle {
        Some(handle) => {
            if let Err(e) = presenter.announce_results(&handle, &poll, &results).await {
                error!("Failed to publish results for poll {}: {}", poll.id, e);
            }
        }
        None => warn!("Poll {} has no published message, skipping results", poll.id),
    }

    registry.remove_poll(channel_id, poll_id).await;
    true
}

/// Tears down whatever poll runs in the channel without publishing results.
pub async fn cancel_poll(registry: &PollRegistry, channel_id: &str) -> Option<Poll> {
    let poll = registry.remove(channel_id).await?;
    info!("Cancelled poll {} in channel {}", poll.id, channel_id);
    Some(poll)
}

/// Cancels every active poll, used when the process shuts down.
pub async fn cancel_all(registry: &PollRegistry) -> usize {
    let mut cancelled = 0;
    for channel_id in registry.channel_ids().await {
        if cancel_poll(registry, &channel_id).await.is_some() {
            cancelled += 1;
        }
    }
    cancelled
}
