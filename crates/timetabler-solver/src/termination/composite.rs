//! OR-composition of terminations over tuples.

use std::fmt::Debug;

use super::{StopReason, Termination};
use crate::scope::RestartScope;

/// Terminates when ANY child terminates.
///
/// The reported reason is that of the first child, in tuple order, that
/// fires.
///
/// # Examples
///
/// ```
/// use timetabler_solver::termination::{NodeCountTermination, OrTermination, TimeTermination};
///
/// let termination = OrTermination((
///     TimeTermination::seconds(30),
///     NodeCountTermination::new(10_000),
/// ));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrTermination<T>(pub T);

impl<T> OrTermination<T> {
    pub fn new(terminations: T) -> Self {
        Self(terminations)
    }
}

macro_rules! impl_or_termination {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Termination for OrTermination<($($T,)+)>
        where
            $($T: Termination,)+
        {
            fn is_terminated(&self, scope: &RestartScope) -> bool {
                $((self.0).$idx.is_terminated(scope))||+
            }

            fn reason(&self) -> StopReason {
                (self.0).0.reason()
            }

            fn check(&self, scope: &RestartScope) -> Option<StopReason> {
                None$(.or_else(|| (self.0).$idx.check(scope)))+
            }
        }
    };
}

impl_or_termination!(0: T0);
impl_or_termination!(0: T0, 1: T1);
impl_or_termination!(0: T0, 1: T1, 2: T2);
impl_or_termination!(0: T0, 1: T1, 2: T2, 3: T3);
