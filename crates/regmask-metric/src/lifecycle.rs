use crate::error::MetricError;

/// What a registration driver exposes to its components.
pub trait RegistrationContext {
    /// The current resolution level, 0 being the coarsest.
    fn current_level(&self) -> usize;

    /// Number of parameters of the transform being optimized.
    fn number_of_parameters(&self) -> usize;
}

/// Where a component is in the registration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing has run yet.
    Uninitialized,
    /// `before_all` has run.
    Configured,
    /// `before_registration` has run.
    MasksLoaded,
    /// `initialize` has run.
    Initialized,
    /// `before_each_resolution` has run for the given level.
    Resolving(usize),
    /// `after_registration` has run.
    Finalized,
}

/// Hooks a registration driver calls on a component, in this order:
///
/// `before_all`, `before_registration`, `initialize`,
/// `before_each_resolution` once per level, `after_registration`.
///
/// Each hook blocks the driver until it returns.
pub trait RegistrationComponent {
    /// Inspect the configuration before anything is loaded.
    fn before_all(&mut self) -> Result<(), MetricError>;

    /// Load resources needed for the whole registration run.
    fn before_registration(&mut self) -> Result<(), MetricError>;

    /// Set up the component for evaluation.
    fn initialize(&mut self) -> Result<(), MetricError>;

    /// Adapt the component to the level the pyramid has just selected.
    fn before_each_resolution(
        &mut self,
        context: &dyn RegistrationContext,
    ) -> Result<(), MetricError>;

    /// Called once after the last level.
    fn after_registration(&mut self) -> Result<(), MetricError> {
        Ok(())
    }
}

/// A lifecycle hook, as seen by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    BeforeAll,
    BeforeRegistration,
    Initialize,
    BeforeEachResolution(usize),
    AfterRegistration,
}

impl Hook {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Hook::BeforeAll => "before_all",
            Hook::BeforeRegistration => "before_registration",
            Hook::Initialize => "initialize",
            Hook::BeforeEachResolution(_) => "before_each_resolution",
            Hook::AfterRegistration => "after_registration",
        }
    }
}

impl LifecycleState {
    /// Check that `hook` may run from this state and return the state it leads to.
    pub(crate) fn advance(self, hook: Hook) -> Result<LifecycleState, MetricError> {
        use LifecycleState::*;

        let next = match (hook, self) {
            (Hook::BeforeAll, Uninitialized) => Configured,
            (Hook::BeforeRegistration, Configured) => MasksLoaded,
            (Hook::Initialize, MasksLoaded) => Initialized,
            (Hook::BeforeEachResolution(level), Initialized | Resolving(_)) => Resolving(level),
            (Hook::AfterRegistration, Initialized | Resolving(_)) => Finalized,
            _ => {
                return Err(MetricError::InvalidLifecycle {
                    hook: hook.name(),
                    state: self,
                })
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_in_order() -> Result<(), MetricError> {
        let state = LifecycleState::Uninitialized
            .advance(Hook::BeforeAll)?
            .advance(Hook::BeforeRegistration)?
            .advance(Hook::Initialize)?
            .advance(Hook::BeforeEachResolution(0))?
            .advance(Hook::BeforeEachResolution(1))?;
        assert_eq!(state, LifecycleState::Resolving(1));

        let state = state.advance(Hook::AfterRegistration)?;
        assert_eq!(state, LifecycleState::Finalized);
        Ok(())
    }

    #[test]
    fn lifecycle_out_of_order() {
        let res = LifecycleState::Uninitialized.advance(Hook::Initialize);
        assert!(matches!(
            res,
            Err(MetricError::InvalidLifecycle {
                hook: "initialize",
                state: LifecycleState::Uninitialized
            })
        ));

        let res = LifecycleState::Finalized.advance(Hook::BeforeEachResolution(0));
        assert!(res.is_err());

        let res = LifecycleState::MasksLoaded.advance(Hook::BeforeRegistration);
        assert!(res.is_err());
    }
}
