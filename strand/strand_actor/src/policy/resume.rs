//! Post-envelope strategies.

/// What the actor does after one envelope has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumption {
    /// Keep the thread and carry on
    Continue,
    /// Give the rest of the time slice back to the OS scheduler
    Yield,
}

/// Decides how a suspended actor continues after processing an envelope.
pub trait ResumePolicy: Default + 'static {
    /// Called once per processed envelope.
    fn after_envelope(&mut self) -> Resumption;
}

/// Blocking actors never suspend mid-batch, so there is nothing to resume.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResume;

impl ResumePolicy for NoResume {
    fn after_envelope(&mut self) -> Resumption {
        Resumption::Continue
    }
}
