use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use wife_database::{Assignment, AssignmentStore, GuildScope};
use wife_utils::time::next_cutoff;

use crate::directory::MemberDirectory;

/// A guild member as seen by the pairing engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: u64,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_bot: bool,
    /// True for the account the bot itself runs as.
    pub is_self: bool,
}

/// Independent toggles that widen the candidate pool. All default to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Let the requester draw themselves.
    pub allow_self_as_target: bool,
    /// Let a member already drawn today be drawn again by someone else.
    pub allow_reuse_of_assignee: bool,
    /// Let bot-flagged accounts other than our own be drawn.
    pub allow_bot_accounts: bool,
    /// Let our own bot account be drawn.
    pub allow_bot_self_account: bool,
}

impl FilterConfig {
    /// Whether `member` may be drawn by `requester_id`.
    pub fn admits(&self, member: &Member, requester_id: u64, taken: &HashSet<u64>) -> bool {
        let reuse_ok = self.allow_reuse_of_assignee || !taken.contains(&member.id);
        // Our own account is judged by `allow_bot_self_account` alone.
        let bot_ok = member.is_self || self.allow_bot_accounts || !member.is_bot;
        let bot_self_ok = self.allow_bot_self_account || !member.is_self;
        let requester_ok = self.allow_self_as_target || member.id != requester_id;

        reuse_ok && bot_ok && bot_self_ok && requester_ok
    }
}

/// Members of `pool` that pass every filter, in pool order.
pub fn eligible_candidates<'a>(
    requester_id: u64,
    pool: &'a [Member],
    taken: &HashSet<u64>,
    filter: &FilterConfig,
) -> Vec<&'a Member> {
    pool.iter()
        .filter(|member| filter.admits(member, requester_id, taken))
        .collect()
}

/// Pick one eligible member uniformly at random, or `None` if nobody is left.
pub fn select_assignee<R: Rng + ?Sized>(
    requester_id: u64,
    pool: &[Member],
    taken: &HashSet<u64>,
    filter: &FilterConfig,
    rng: &mut R,
) -> Option<Member> {
    eligible_candidates(requester_id, pool, taken, filter)
        .choose(rng)
        .map(|member| (*member).clone())
}

/// Result of a `wife` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The requester already has an active pairing for this period.
    Existing(Assignment),
    /// A fresh pairing was drawn and stored.
    Created {
        assignment: Assignment,
        assignee: Member,
    },
    /// Nobody passed the filters. Nothing was stored.
    NoCandidate,
}

/// Reuses the requester's pairing for the day or draws and stores a new one.
///
/// The lookup and the write are not atomic: two concurrent calls for the same
/// requester may both draw, and the later write wins.
pub struct PairingEngine {
    store: Arc<dyn AssignmentStore>,
    filter: FilterConfig,
    cutoff_hour: u32,
}

impl PairingEngine {
    pub fn new(store: Arc<dyn AssignmentStore>, filter: FilterConfig, cutoff_hour: u32) -> Self {
        Self {
            store,
            filter,
            cutoff_hour,
        }
    }

    pub async fn get_or_create<Tz, D, R>(
        &self,
        scope: &GuildScope,
        requester_id: u64,
        directory: &D,
        now: &DateTime<Tz>,
        rng: &mut R,
    ) -> anyhow::Result<Outcome>
    where
        Tz: TimeZone,
        D: MemberDirectory + ?Sized,
        R: Rng + ?Sized,
    {
        let now_utc = now.with_timezone(&Utc);

        if let Some(assignment) = self.store.find(scope, requester_id, now_utc).await? {
            debug!(
                scope = %scope,
                requester_id,
                assignee_id = assignment.assignee_id,
                "reusing today's pairing"
            );
            return Ok(Outcome::Existing(assignment));
        }

        let taken = self.store.list_assignee_ids(scope, now_utc).await?;
        let pool = directory.list_members(scope).await?;

        let Some(assignee) = select_assignee(requester_id, &pool, &taken, &self.filter, rng)
        else {
            debug!(
                scope = %scope,
                requester_id,
                pool = pool.len(),
                taken = taken.len(),
                "no eligible candidate"
            );
            return Ok(Outcome::NoCandidate);
        };

        let assignment = Assignment {
            guild_scope: scope.clone(),
            requester_id,
            assignee_id: assignee.id,
            created_at: now_utc,
            expires_at: next_cutoff(now, self.cutoff_hour).with_timezone(&Utc),
        };
        self.store.create(&assignment).await?;

        debug!(
            scope = %scope,
            requester_id,
            assignee_id = assignee.id,
            expires_at = %assignment.expires_at,
            "drew new pairing"
        );

        Ok(Outcome::Created {
            assignment,
            assignee,
        })
    }
}
