// 🔍 Deduplication Engine - collapse duplicate leads into one survivor per group
// Leads are duplicates when they share an _id or an email (case-insensitive),
// directly or transitively. Each group keeps one lead, picked by a strategy.

use crate::change_log::ChangeLog;
use crate::lead::{normalize_email, Lead};
use crate::strategy::{ComparisonStrategy, LatestEntryWins, Preference};
use crate::union_find::group_indices;
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ============================================================================
// DEDUP SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DedupSummary {
    /// Leads handed to the engine, valid or not
    pub input_count: usize,

    /// Leads missing _id or email
    pub rejected_count: usize,

    /// Groups formed from valid leads (singletons included)
    pub group_count: usize,

    /// Leads discarded in favour of a survivor (one change log entry each)
    pub duplicate_count: usize,

    /// Leads in the deduplicated output
    pub survivor_count: usize,
}

impl DedupSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} leads: {} kept, {} duplicates merged across {} groups, {} rejected",
            self.input_count,
            self.survivor_count,
            self.duplicate_count,
            self.group_count,
            self.rejected_count
        )
    }
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

/// Owns the three outputs of a run: survivors, rejected leads, change log.
///
/// Meant to be used once per batch. Calling `process_leads` again appends to
/// the existing outputs instead of starting over.
pub struct LeadDeduplicator<S = LatestEntryWins> {
    strategy: S,

    /// Survivors in insertion order, plus their position keyed by _id
    deduplicated: Vec<Lead>,
    survivor_index: HashMap<String, usize>,

    /// Invalid leads, untouched, in input order
    rejected: Vec<Lead>,

    change_logs: Vec<ChangeLog>,

    input_count: usize,
    group_count: usize,
}

impl LeadDeduplicator<LatestEntryWins> {
    /// Engine with the default "latest entry wins" strategy
    pub fn new() -> Self {
        Self::with_strategy(LatestEntryWins)
    }
}

impl Default for LeadDeduplicator<LatestEntryWins> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ComparisonStrategy> LeadDeduplicator<S> {
    pub fn with_strategy(strategy: S) -> Self {
        LeadDeduplicator {
            strategy,
            deduplicated: Vec::new(),
            survivor_index: HashMap::new(),
            rejected: Vec::new(),
            change_logs: Vec::new(),
            input_count: 0,
            group_count: 0,
        }
    }

    /// Run one batch through the engine:
    /// 1. split invalid leads off to the rejected list
    /// 2. group valid leads by shared _id / email (transitively)
    /// 3. reduce each group to one survivor with the strategy
    /// 4. log a change entry for every discarded member
    pub fn process_leads<I>(&mut self, leads: I)
    where
        I: IntoIterator<Item = Lead>,
    {
        let (valid, rejected): (Vec<Lead>, Vec<Lead>) =
            leads.into_iter().partition(Lead::is_valid);

        self.input_count += valid.len() + rejected.len();
        if !rejected.is_empty() {
            debug!(count = rejected.len(), "rejecting leads without _id or email");
        }
        self.rejected.extend(rejected);

        if valid.is_empty() {
            return;
        }

        let groups = group_indices(&valid);
        for members in &groups {
            self.resolve_group(&valid, members);
        }
        self.group_count += groups.len();

        info!(
            valid = valid.len(),
            groups = groups.len(),
            "deduplicated batch"
        );
    }

    /// Fold the group in input order, offering each lead as the challenger
    /// against the current winner. Ties go to the challenger, i.e. the later lead.
    fn resolve_group(&mut self, leads: &[Lead], members: &[usize]) {
        let Some((&first, rest)) = members.split_first() else {
            return;
        };

        let mut winner = first;
        for &next in rest {
            winner = match self.strategy.choose_preferred(&leads[next], &leads[winner]) {
                Preference::First => next,
                Preference::Second => winner,
            };
        }

        let survivor = &leads[winner];
        let survivor_email = survivor.email.as_deref().map(normalize_email);

        for &member in members.iter().filter(|&&m| m != winner) {
            let discarded = &leads[member];
            let deduped_by_id = discarded.id == survivor.id;
            let deduped_by_email = discarded.email.as_deref().map(normalize_email) == survivor_email;

            self.change_logs.push(ChangeLog::new(
                discarded.clone(),
                survivor.clone(),
                deduped_by_id,
                deduped_by_email,
            ));
        }

        if members.len() > 1 {
            debug!(
                survivor = survivor.id.as_deref().unwrap_or_default(),
                size = members.len(),
                "resolved duplicate group"
            );
        }

        self.insert_survivor(survivor.clone());
    }

    /// Later writes for the same _id replace the earlier survivor in place
    fn insert_survivor(&mut self, survivor: Lead) {
        let key = survivor.id.clone().unwrap_or_default();

        match self.survivor_index.get(&key) {
            Some(&position) => {
                warn!(id = %key, "survivor replaces an earlier survivor with the same _id");
                self.deduplicated[position] = survivor;
            }
            None => {
                self.survivor_index.insert(key, self.deduplicated.len());
                self.deduplicated.push(survivor);
            }
        }
    }

    pub fn deduplicated_leads(&self) -> &[Lead] {
        &self.deduplicated
    }

    pub fn rejected_leads(&self) -> &[Lead] {
        &self.rejected
    }

    pub fn change_logs(&self) -> &[ChangeLog] {
        &self.change_logs
    }

    pub fn summary(&self) -> DedupSummary {
        DedupSummary {
            input_count: self.input_count,
            rejected_count: self.rejected.len(),
            group_count: self.group_count,
            duplicate_count: self.change_logs.len(),
            survivor_count: self.deduplicated.len(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
