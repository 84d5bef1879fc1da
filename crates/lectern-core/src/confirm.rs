// Yes/no gate in front of destructive operations.
//
// The store never decides how to ask; the CLI passes a terminal prompt,
// `--yes` passes `AutoConfirm`, and tests pass closures.

/// Asks the operator to approve a destructive step.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
