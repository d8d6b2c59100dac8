// Lead Deduplication - Core Library
// Exposes the engine for the CLI and for tests

pub mod lead;           // Lead record + validity + entryDate codec
pub mod strategy;       // Which duplicate survives
pub mod union_find;     // Transitive grouping by _id / email
pub mod change_log;     // Audit entries for discarded leads
pub mod deduplication;  // Deduplication Engine
pub mod io;             // JSON / text file collaborators

// Re-export commonly used types
pub use lead::{Lead, normalize_email, parse_entry_date, format_entry_date};
pub use strategy::{ComparisonStrategy, LatestEntryWins, Preference};
pub use union_find::{DisjointSet, group_indices};
pub use change_log::{ChangeLog, FieldChange, diff_fields, display_value, display_timestamp};
pub use deduplication::{LeadDeduplicator, DedupSummary};
pub use io::{DocumentShape, load_leads, parse_document, write_leads, write_change_logs};
