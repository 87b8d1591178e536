pub mod pursuit;

pub use pursuit::PursuitAgent;

use crate::agent::{DecisionAgent, NoopAgent};

/// Names accepted by `resolve`, in display order.
pub const AGENT_NAMES: &[&str] = &["noop", "pursuit"];

/// Resolve an agent by name; `None` for unknown names.
pub fn resolve(name: &str) -> Option<Box<dyn DecisionAgent>> {
    match name {
        "noop" => Some(Box::new(NoopAgent)),
        "pursuit" => Some(Box::new(PursuitAgent::new())),
        _ => None,
    }
}
