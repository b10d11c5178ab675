//! Route lookup.
//!
//! # Design Decisions
//! - Linear scan in declaration order; the first matching rule wins
//! - No reordering, no hashing: declaration-order semantics are exact
//! - Explicit `None` for no match rather than a silent default

use crate::routes::rule::RouteRule;
use crate::routes::table::RouteTable;

/// Resolve a request path against a tenant's route table.
pub fn find_rule<'t>(table: &'t RouteTable, path: &str) -> Option<&'t RouteRule> {
    table.rules().iter().find(|rule| rule.matches(path))
}
