//! Finite state machine (Mealy machine).

/// A synchronous component described by its transition function.
///
/// `fsm` generates (1) the current-cycle output and (2) the next-cycle state from the current state and the
/// current-cycle input. It never observes a value written in the same cycle, so composing machines by calling
/// their `fsm` functions on the *current* states yields register-transfer semantics.
pub trait Fsm: Sized {
    /// Input of one cycle.
    type Input;

    /// Output of one cycle.
    type Output;

    /// Returns the output of this cycle and the state of the next cycle.
    fn fsm(&self, input: Self::Input) -> (Self::Output, Self);

    /// Advances the machine by one cycle and returns the output of the cycle.
    fn step(&mut self, input: Self::Input) -> Self::Output {
        let (output, next) = self.fsm(input);
        *self = next;
        output
    }
}
