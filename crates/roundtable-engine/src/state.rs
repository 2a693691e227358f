//! Shared conversation state threaded through every node of a run.

use serde::{Deserialize, Serialize};

/// Node id of the routing node.
pub const SUPERVISOR: &str = "supervisor";

/// Terminal sentinel: the routing value that ends a run.
pub const FINISH: &str = "FINISH";

/// Name of the function the routing agent must call to announce a decision.
pub const ROUTE_FN: &str = "route";

/// Where control goes after the node that just ran.
///
/// Decoded exactly once at the supervisor boundary. The graph engine
/// resolves `Agent` names against its worker registry when it follows the
/// edge; an unregistered name aborts the run there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The routing node. Initial value, and what every worker writes back.
    Supervisor,
    /// A named worker agent.
    Agent(String),
    /// End the run.
    Finish,
}

impl Destination {
    /// Decode the wire value used by the routing schema: the terminal
    /// sentinel or an agent name. Unknown names are kept as-is and rejected
    /// later, at edge resolution.
    pub fn from_route_value(value: &str) -> Self {
        if value == FINISH {
            Destination::Finish
        } else {
            Destination::Agent(value.to_string())
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Supervisor => f.write_str(SUPERVISOR),
            Destination::Agent(name) => f.write_str(name),
            Destination::Finish => f.write_str(FINISH),
        }
    }
}

/// One audit record: which actor produced what, at which round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScratchpadEntry {
    pub step: u32,
    pub agent: String,
    pub output: String,
}

/// The mutable record for one scenario run.
///
/// Created fresh per run, exclusively owned by the executing graph for the
/// run's duration, and discarded afterwards. `messages` and `scratchpad`
/// are append-only; `step` never decreases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedState {
    /// Rendered contributions. Never holds two adjacent identical entries.
    pub messages: Vec<String>,
    /// The node that should execute next.
    pub next: Destination,
    /// Audit trail. Nodes only ever read the latest entry.
    pub scratchpad: Vec<ScratchpadEntry>,
    /// Conversation round. Starts at 1; advances only on supervisor turns.
    pub step: u32,
    /// Routing payloads that failed to decode. Diagnostic counter only.
    pub undecided_routes: u32,
}

impl SharedState {
    /// Fresh state for a run, seeded with the scenario banner.
    pub fn seeded(banner: impl Into<String>) -> Self {
        Self {
            messages: vec![banner.into()],
            next: Destination::Supervisor,
            scratchpad: Vec::new(),
            step: 1,
            undecided_routes: 0,
        }
    }

    /// Append unless identical to the last entry. Returns whether appended.
    pub fn append_message_if_new(&mut self, message: String) -> bool {
        if self.messages.last() == Some(&message) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Record an audit entry at the current round.
    pub fn record(&mut self, agent: impl Into<String>, output: impl Into<String>) {
        self.scratchpad.push(ScratchpadEntry {
            step: self.step,
            agent: agent.into(),
            output: output.into(),
        });
    }

    pub fn latest_scratchpad(&self) -> Option<&ScratchpadEntry> {
        self.scratchpad.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_defaults() {
        let state = SharedState::seeded("# Step 1 - Scenario\nA storm rolls in.");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.next, Destination::Supervisor);
        assert!(state.scratchpad.is_empty());
        assert_eq!(state.step, 1);
        assert_eq!(state.undecided_routes, 0);
    }

    #[test]
    fn append_skips_adjacent_duplicate() {
        let mut state = SharedState::seeded("banner");
        assert!(state.append_message_if_new("hello".into()));
        assert!(!state.append_message_if_new("hello".into()));
        assert!(state.append_message_if_new("world".into()));
        // A repeat that is not adjacent is allowed back in.
        assert!(state.append_message_if_new("hello".into()));
        assert_eq!(state.messages, vec!["banner", "hello", "world", "hello"]);
    }

    #[test]
    fn record_tags_current_step() {
        let mut state = SharedState::seeded("banner");
        state.step = 3;
        state.record("Scout", "moved north");
        let entry = state.latest_scratchpad().unwrap();
        assert_eq!(entry.step, 3);
        assert_eq!(entry.agent, "Scout");
        assert_eq!(entry.output, "moved north");
    }

    #[test]
    fn route_value_decoding() {
        assert_eq!(Destination::from_route_value("FINISH"), Destination::Finish);
        assert_eq!(
            Destination::from_route_value("Scout"),
            Destination::Agent("Scout".into())
        );
        // Case matters for the sentinel.
        assert_eq!(
            Destination::from_route_value("finish"),
            Destination::Agent("finish".into())
        );
    }

    #[test]
    fn destination_display() {
        assert_eq!(Destination::Supervisor.to_string(), "supervisor");
        assert_eq!(Destination::Finish.to_string(), "FINISH");
        assert_eq!(Destination::Agent("Medic".into()).to_string(), "Medic");
    }

    #[test]
    fn state_serde_round_trip() {
        let mut state = SharedState::seeded("banner");
        state.record("Scout", "out");
        state.next = Destination::Agent("Scout".into());
        let json = serde_json::to_string(&state).unwrap();
        let back: SharedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.messages, state.messages);
        assert_eq!(back.next, state.next);
        assert_eq!(back.scratchpad, state.scratchpad);
    }
}
