//! State Machine
//!
//! Generic container of exclusive states keyed by concrete type. Exactly one state
//! is active once the machine has been started.
//!
//! States never hold a reference to the machine. Lifecycle hooks return an
//! optional [`Transition`] instead, and the machine applies it synchronously: a
//! transition requested from `enter` runs the next `exit`/`enter` pair right away,
//! before control returns to the caller. Chains are bounded so two states that
//! bounce between each other surface as [`LocomotionError::TransitionLoop`].
//!
//! # Example
//!
//! ```ignore
//! let mut machine: StateMachine<dyn MyState, MyContext> = StateMachine::new();
//! machine.register(Box::new(Idle))?;
//! machine.register(Box::new(Running))?;
//! machine.change_state::<Idle>(&mut ctx)?;
//! machine.update(&mut ctx)?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::LocomotionError;

/// Transitions chained from `enter` hooks before the machine gives up.
pub const MAX_CHAINED_TRANSITIONS: usize = 8;

/// Request to switch to the state registered under a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    target: TypeId,
    name: &'static str,
}

impl Transition {
    pub fn to<T: 'static>() -> Self {
        Self {
            target: TypeId::of::<T>(),
            name: short_type_name::<T>(),
        }
    }

    pub fn target(&self) -> TypeId {
        self.target
    }

    /// Unqualified type name of the target, for logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.target == TypeId::of::<T>()
    }
}

/// Last path segment of a type name (`a::b::Standing` -> `Standing`).
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Lifecycle of one state operating on a shared context `C`.
pub trait MachineState<C> {
    /// Display name, used for logs and camera notifications.
    fn name(&self) -> &'static str;

    fn enter(&mut self, _ctx: &mut C) -> Option<Transition> {
        None
    }

    fn update(&mut self, _ctx: &mut C) -> Option<Transition> {
        None
    }

    fn exit(&mut self, _ctx: &mut C) {}

    /// Veto hook for outgoing transitions.
    fn can_transition_to(&self, _target: &Transition) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Registry of states plus the index of the active one.
pub struct StateMachine<S: ?Sized, C> {
    states: Vec<Box<S>>,
    index: HashMap<TypeId, usize>,
    current: Option<usize>,
    _context: PhantomData<fn(&mut C)>,
}

impl<S: ?Sized + MachineState<C>, C> Default for StateMachine<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized + MachineState<C>, C> StateMachine<S, C> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
            current: None,
            _context: PhantomData,
        }
    }

    /// Add a state. Each concrete type may be registered once.
    pub fn register(&mut self, state: Box<S>) -> Result<(), LocomotionError> {
        let type_id = state.as_any().type_id();
        if self.index.contains_key(&type_id) {
            return Err(LocomotionError::DuplicateState(state.name()));
        }
        self.index.insert(type_id, self.states.len());
        self.states.push(state);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    pub fn current(&self) -> Option<&S> {
        self.current.map(|i| &*self.states[i])
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.current().map(|s| s.name())
    }

    pub fn is_in_state<T: 'static>(&self) -> bool {
        match (self.current, self.index.get(&TypeId::of::<T>())) {
            (Some(current), Some(&wanted)) => current == wanted,
            _ => false,
        }
    }

    /// Borrow a registered state by its concrete type.
    pub fn state<T: 'static>(&self) -> Option<&T> {
        let &i = self.index.get(&TypeId::of::<T>())?;
        self.states[i].as_any().downcast_ref::<T>()
    }

    pub fn state_mut<T: 'static>(&mut self) -> Option<&mut T> {
        let &i = self.index.get(&TypeId::of::<T>())?;
        self.states[i].as_any_mut().downcast_mut::<T>()
    }

    /// Switch to `T`. Returns `Ok(false)` when `T` is already active.
    pub fn change_state<T: 'static>(&mut self, ctx: &mut C) -> Result<bool, LocomotionError> {
        self.transition(Transition::to::<T>(), ctx)
    }

    /// Apply a transition request and any transitions its `enter` chains into.
    ///
    /// Returns whether the active state changed.
    pub fn transition(&mut self, request: Transition, ctx: &mut C) -> Result<bool, LocomotionError> {
        let mut request = request;
        let mut changed = false;

        for _ in 0..MAX_CHAINED_TRANSITIONS {
            let target = *self
                .index
                .get(&request.target)
                .ok_or(LocomotionError::UnregisteredState(request.name))?;

            if self.current == Some(target) {
                return Ok(changed);
            }

            let from = match self.current {
                Some(current) => {
                    if !self.states[current].can_transition_to(&request) {
                        debug!(
                            from = self.states[current].name(),
                            to = request.name,
                            "transition rejected"
                        );
                        return Ok(changed);
                    }
                    self.states[current].exit(ctx);
                    self.states[current].name()
                }
                None => "none",
            };

            debug!(from, to = self.states[target].name(), "state transition");
            self.current = Some(target);
            changed = true;

            match self.states[target].enter(ctx) {
                Some(next) => request = next,
                None => return Ok(true),
            }
        }

        Err(LocomotionError::TransitionLoop {
            hops: MAX_CHAINED_TRANSITIONS,
            last: request.name,
        })
    }

    /// Apply `request` if there is one.
    pub fn apply(&mut self, request: Option<Transition>, ctx: &mut C) -> Result<bool, LocomotionError> {
        match request {
            Some(request) => self.transition(request, ctx),
            None => Ok(false),
        }
    }

    /// Run a hook on the active state and apply whatever it requests.
    pub fn dispatch<F>(&mut self, ctx: &mut C, hook: F) -> Result<bool, LocomotionError>
    where
        F: FnOnce(&mut S, &mut C) -> Option<Transition>,
    {
        let current = self.current.ok_or(LocomotionError::NoActiveState)?;
        let request = hook(&mut *self.states[current], ctx);
        if let Some(request) = &request {
            trace!(from = self.states[current].name(), to = request.name, "transition requested");
        }
        self.apply(request, ctx)
    }

    /// Tick the active state.
    pub fn update(&mut self, ctx: &mut C) -> Result<bool, LocomotionError> {
        self.dispatch(ctx, |state, ctx| state.update(ctx))
    }
}
