//! State machine runtime
//!
//! Flat state machines for the page's small interaction states: the mobile
//! menu (closed/open) and the contact form submit button
//! (idle/sending/sent). Supports guards, entry/exit actions, transition
//! actions and a transition history.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Identifier for a state within a state machine
pub type StateId = u32;

/// Identifier for an event type
pub type EventId = u32;

/// A guard function that determines if a transition should occur
pub type Guard = Box<dyn Fn() -> bool + Send>;

/// An action function executed during transitions
pub type Action = Box<dyn FnMut() + Send>;

/// Transitions kept in a machine's history; older entries are dropped
pub const HISTORY_LIMIT: usize = 64;

/// A transition in the state machine
pub struct Transition {
    pub from_state: StateId,
    pub event: EventId,
    pub to_state: StateId,
    pub guard: Option<Guard>,
    pub actions: SmallVec<[Action; 2]>,
}

impl Transition {
    /// Create a simple transition without guard or actions
    pub fn new(from: StateId, event: EventId, to: StateId) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
            guard: None,
            actions: SmallVec::new(),
        }
    }

    /// Add a guard condition
    pub fn with_guard<F: Fn() -> bool + Send + 'static>(mut self, guard: F) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Add an action to execute during transition
    pub fn with_action<F: FnMut() + Send + 'static>(mut self, action: F) -> Self {
        self.actions.push(Box::new(action));
        self
    }

    fn accepts(&self, state: StateId, event: EventId) -> bool {
        self.from_state == state
            && self.event == event
            && self.guard.as_ref().map(|guard| guard()).unwrap_or(true)
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder {
    initial_state: StateId,
    transitions: Vec<Transition>,
    entry_callbacks: FxHashMap<StateId, Vec<Action>>,
    exit_callbacks: FxHashMap<StateId, Vec<Action>>,
}

impl StateMachineBuilder {
    pub fn new(initial_state: StateId) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            entry_callbacks: FxHashMap::default(),
            exit_callbacks: FxHashMap::default(),
        }
    }

    /// Add a transition
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add an entry action for a state
    pub fn on_enter<F: FnMut() + Send + 'static>(mut self, state: StateId, action: F) -> Self {
        self.entry_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Add an exit action for a state
    pub fn on_exit<F: FnMut() + Send + 'static>(mut self, state: StateId, action: F) -> Self {
        self.exit_callbacks
            .entry(state)
            .or_default()
            .push(Box::new(action));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
            entry_callbacks: self.entry_callbacks,
            exit_callbacks: self.exit_callbacks,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine {
    current_state: StateId,
    transitions: Vec<Transition>,
    entry_callbacks: FxHashMap<StateId, Vec<Action>>,
    exit_callbacks: FxHashMap<StateId, Vec<Action>>,
    /// History of state transitions (for debugging)
    history: Vec<(StateId, EventId, StateId)>,
}

impl StateMachine {
    /// Create a new state machine with an initial state and transitions
    pub fn new(initial_state: StateId, transitions: Vec<Transition>) -> Self {
        Self {
            current_state: initial_state,
            transitions,
            entry_callbacks: FxHashMap::default(),
            exit_callbacks: FxHashMap::default(),
            history: Vec::new(),
        }
    }

    /// Create a builder for a state machine
    pub fn builder(initial_state: StateId) -> StateMachineBuilder {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    /// Get transition history, oldest first. Holds at most [`HISTORY_LIMIT`]
    /// entries.
    pub fn history(&self) -> &[(StateId, EventId, StateId)] {
        &self.history
    }

    /// Clear transition history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.transitions
            .iter()
            .any(|t| t.accepts(self.current_state, event))
    }

    /// Send an event to the state machine, potentially triggering a transition.
    ///
    /// Returns the state after the event. Events without a matching
    /// transition leave the machine untouched.
    pub fn send(&mut self, event: EventId) -> StateId {
        let current = self.current_state;

        let Some(idx) = self
            .transitions
            .iter()
            .position(|t| t.accepts(current, event))
        else {
            return current;
        };

        let to_state = self.transitions[idx].to_state;

        if let Some(callbacks) = self.exit_callbacks.get_mut(&current) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        for action in self.transitions[idx].actions.iter_mut() {
            action();
        }

        self.current_state = to_state;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((current, event, to_state));
        tracing::trace!("fsm {current} --{event}--> {to_state}");

        if let Some(callbacks) = self.entry_callbacks.get_mut(&to_state) {
            for callback in callbacks.iter_mut() {
                callback();
            }
        }

        to_state
    }
}

// ============================================================================
// Page interaction machines
// ============================================================================

/// Mobile navigation menu states
pub mod menu {
    use super::{EventId, StateId, StateMachine};

    pub const CLOSED: StateId = 0;
    pub const OPEN: StateId = 1;

    /// Hamburger button clicked
    pub const TOGGLE: EventId = 1;
    /// Nav link clicked, click outside the menu, or Escape
    pub const DISMISS: EventId = 2;

    pub fn machine() -> StateMachine {
        StateMachine::builder(CLOSED)
            .on(CLOSED, TOGGLE, OPEN)
            .on(OPEN, TOGGLE, CLOSED)
            .on(OPEN, DISMISS, CLOSED)
            .build()
    }
}

/// Contact form submit button states
pub mod submit {
    use super::{EventId, StateId, StateMachine};

    pub const IDLE: StateId = 0;
    pub const SENDING: StateId = 1;
    pub const SENT: StateId = 2;

    /// Valid form submitted
    pub const SUBMIT: EventId = 1;
    /// Simulated delivery finished
    pub const DELIVERED: EventId = 2;
    /// User started editing again after a send
    pub const RESET: EventId = 3;

    pub fn machine() -> StateMachine {
        StateMachine::builder(IDLE)
            .on(IDLE, SUBMIT, SENDING)
            .on(SENDING, DELIVERED, SENT)
            .on(SENT, RESET, IDLE)
            .on(SENT, SUBMIT, SENDING)
            .build()
    }
}
