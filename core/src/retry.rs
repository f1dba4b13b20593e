//! Bounded retry-then-fallback control flow shared by the generators.
//!
//! Both generators follow the same shape: produce a random candidate, keep it
//! if it passes validation, otherwise try again until the attempt ceiling is
//! reached and then substitute a fallback that is valid by construction.
//! [`retry_or_fallback`] captures that shape once so the bound on the loop is
//! auditable apart from the generation logic.

use log::{debug, warn};

/// Where the value returned by [`retry_or_fallback`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A generated candidate was accepted on the given one-based attempt.
    Accepted {
        /// Attempt that produced the accepted value.
        attempt: u32,
    },
    /// Every attempt was rejected and the fallback was used instead.
    Fallback {
        /// Number of attempts made before falling back.
        attempts: u32,
    },
}

/// Value produced by [`retry_or_fallback`] together with its provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Retried<T> {
    /// Accepted candidate or fallback value.
    pub value: T,
    /// How the value was obtained.
    pub resolution: Resolution,
}

impl<T> Retried<T> {
    /// Reports whether the fallback supplied the value.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.resolution, Resolution::Fallback { .. })
    }

    /// Discards the provenance, yielding the value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Generates candidates until one is accepted or `attempts` run out.
///
/// `context` is threaded through both `generate` and `fallback` so that a
/// single mutable handle, typically the random number generator, can serve
/// both. The loop runs at most `attempts` times; an `attempts` of zero goes
/// straight to the fallback.
pub fn retry_or_fallback<C, T, G, A, F>(
    attempts: u32,
    context: &mut C,
    mut generate: G,
    mut accept: A,
    fallback: F,
) -> Retried<T>
where
    C: ?Sized,
    G: FnMut(&mut C, u32) -> T,
    A: FnMut(&T) -> bool,
    F: FnOnce(&mut C) -> T,
{
    for attempt in 1..=attempts {
        let candidate = generate(context, attempt);
        if accept(&candidate) {
            return Retried {
                value: candidate,
                resolution: Resolution::Accepted { attempt },
            };
        }
        debug!("attempt {attempt}/{attempts} rejected");
    }

    warn!("all {attempts} attempts rejected, using fallback");
    Retried {
        value: fallback(context),
        resolution: Resolution::Fallback { attempts },
    }
}
