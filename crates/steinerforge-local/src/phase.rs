//! Improvement phases run by the local search.

use std::fmt::Debug;

use crate::scope::SearchScope;

/// A phase of the local search.
///
/// Phases run in sequence on the working solution held by the scope. A
/// phase must leave the working solution feasible and may only replace it
/// by one with a strictly smaller objective.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    fn solve(&mut self, scope: &mut SearchScope<'_>);

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
