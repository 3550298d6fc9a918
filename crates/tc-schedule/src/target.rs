//! Who an event's action runs for.

/// The resolved recipients of a scheduled action.
///
/// The scheduler never inspects `E`; it hands each member back to the action
/// in turn.  Hosts that track entity liveness should skip dead members inside
/// the action itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Target<E> {
    /// A single global invocation with no entity (`None` is passed to the
    /// action).
    Observer,

    /// A single addressable entity.
    Entity(E),

    /// A set of entities, visited in stored order or in an order chosen by
    /// the host's shuffler.
    Entities { members: Vec<E>, shuffled: bool },
}

impl<E> Target<E> {
    /// Entities visited in stored order.
    pub fn entities(members: impl IntoIterator<Item = E>) -> Self {
        Target::Entities {
            members:  members.into_iter().collect(),
            shuffled: false,
        }
    }

    /// Entities visited in a fresh host-shuffled order on every execution.
    pub fn shuffled(members: impl IntoIterator<Item = E>) -> Self {
        Target::Entities {
            members:  members.into_iter().collect(),
            shuffled: true,
        }
    }

    /// Number of action invocations one execution performs.
    pub fn len(&self) -> usize {
        match self {
            Target::Observer | Target::Entity(_) => 1,
            Target::Entities { members, .. } => members.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
