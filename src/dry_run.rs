/// Whether a release really happens. On a dry run nothing is written and no command is run,
/// what _would_ happen is reported instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunType<T> {
    DryRun(T),
    Real(T),
}

impl RunType<()> {
    pub(crate) const fn new(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun(())
        } else {
            Self::Real(())
        }
    }
}

impl<T> RunType<T> {
    #[must_use]
    pub(crate) fn of<R>(&self, new_value: R) -> RunType<R> {
        match self {
            RunType::DryRun(_) => RunType::DryRun(new_value),
            RunType::Real(_) => RunType::Real(new_value),
        }
    }
}
