// ⚖️ Comparison Strategy - pick the lead to keep out of two duplicates

use crate::lead::Lead;

// ============================================================================
// PREFERENCE
// ============================================================================

/// Which of the two candidates a strategy keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    First,
    Second,
}

// ============================================================================
// STRATEGY
// ============================================================================

/// Decides which of two duplicate leads survives.
///
/// Implementations must be pure. The engine folds each group in input order
/// and calls `choose_preferred(challenger, incumbent)`: the *next* lead comes
/// first, the current winner second. A strategy that returns `First` on ties
/// therefore keeps the later record in input order.
///
/// ```
/// use lead_dedup::{Lead, LeadDeduplicator, Preference};
///
/// // Argument order: (challenger = next lead, incumbent = current winner)
/// let keep_named = |challenger: &Lead, incumbent: &Lead| {
///     if incumbent.first_name.is_some() && challenger.first_name.is_none() {
///         Preference::Second
///     } else {
///         Preference::First
///     }
/// };
///
/// let mut named = Lead::new("1", "a@example.com");
/// named.first_name = Some("Ann".to_string());
/// let unnamed = Lead::new("1", "a@example.com");
///
/// let mut engine = LeadDeduplicator::with_strategy(keep_named);
/// engine.process_leads(vec![named, unnamed]);
///
/// assert_eq!(engine.deduplicated_leads()[0].first_name.as_deref(), Some("Ann"));
/// ```
pub trait ComparisonStrategy {
    /// `challenger` is the next lead of the group, `incumbent` the winner so far
    fn choose_preferred(&self, challenger: &Lead, incumbent: &Lead) -> Preference;

    /// Resolve the preference to the lead itself
    fn choose<'a>(&self, challenger: &'a Lead, incumbent: &'a Lead) -> &'a Lead {
        match self.choose_preferred(challenger, incumbent) {
            Preference::First => challenger,
            Preference::Second => incumbent,
        }
    }
}

/// Any `Fn(&Lead, &Lead) -> Preference` can be injected as a strategy
impl<F> ComparisonStrategy for F
where
    F: Fn(&Lead, &Lead) -> Preference,
{
    fn choose_preferred(&self, challenger: &Lead, incumbent: &Lead) -> Preference {
        self(challenger, incumbent)
    }
}

// ============================================================================
// LATEST ENTRY WINS
// ============================================================================

/// Keeps the lead with the most recent `entryDate`.
///
/// - both dates absent → first
/// - only one date present → the dated lead
/// - both present → the strictly later one, first on an exact tie
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestEntryWins;

impl ComparisonStrategy for LatestEntryWins {
    fn choose_preferred(&self, challenger: &Lead, incumbent: &Lead) -> Preference {
        match (&challenger.entry_date, &incumbent.entry_date) {
            (None, None) => Preference::First,
            (None, Some(_)) => Preference::Second,
            (Some(_), None) => Preference::First,
            (Some(a), Some(b)) => {
                if b > a {
                    Preference::Second
                } else {
                    Preference::First
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::parse_entry_date;

    fn create_test_lead(id: &str, entry_date: Option<&str>) -> Lead {
        let mut lead = Lead::new(id, "a@example.com");
        lead.entry_date = entry_date.map(|d| parse_entry_date(d).unwrap());
        lead
    }

    #[test]
    fn test_both_dates_absent_keeps_first() {
        let a = create_test_lead("a", None);
        let b = create_test_lead("b", None);

        assert_eq!(LatestEntryWins.choose_preferred(&a, &b), Preference::First);
        assert_eq!(LatestEntryWins.choose_preferred(&b, &a), Preference::First);
    }

    #[test]
    fn test_dated_lead_beats_undated() {
        let dated = create_test_lead("dated", Some("2023-01-01T00:00:00Z"));
        let undated = create_test_lead("undated", None);

        assert_eq!(LatestEntryWins.choose(&dated, &undated).id.as_deref(), Some("dated"));
        assert_eq!(LatestEntryWins.choose(&undated, &dated).id.as_deref(), Some("dated"));
    }

    #[test]
    fn test_later_date_wins_in_either_order() {
        let old = create_test_lead("old", Some("2024-01-01T10:00:00Z"));
        let new = create_test_lead("new", Some("2024-01-02T10:00:00Z"));

        assert_eq!(LatestEntryWins.choose(&old, &new).id.as_deref(), Some("new"));
        assert_eq!(LatestEntryWins.choose(&new, &old).id.as_deref(), Some("new"));
    }

    #[test]
    fn test_offsets_compare_as_instants() {
        // 10:00-05:00 is 15:00Z, later than 12:00Z
        let east = create_test_lead("utc", Some("2024-01-01T12:00:00Z"));
        let west = create_test_lead("west", Some("2024-01-01T10:00:00-05:00"));

        assert_eq!(LatestEntryWins.choose(&east, &west).id.as_deref(), Some("west"));
    }

    #[test]
    fn test_equal_dates_keep_first() {
        let a = create_test_lead("a", Some("2024-01-01T10:00:00Z"));
        let b = create_test_lead("b", Some("2024-01-01T05:00:00-05:00"));

        assert_eq!(LatestEntryWins.choose_preferred(&a, &b), Preference::First);
        assert_eq!(LatestEntryWins.choose_preferred(&b, &a), Preference::First);
    }

    #[test]
    fn test_closure_strategy() {
        let always_second = |_: &Lead, _: &Lead| Preference::Second;
        let a = create_test_lead("a", Some("2030-01-01T00:00:00Z"));
        let b = create_test_lead("b", None);

        assert_eq!(always_second.choose(&a, &b).id.as_deref(), Some("b"));
    }
}
