//! Lifecycle events and elections

use serde::{Deserialize, Serialize};

use crate::claim::Tag;

/// A party's choice of one tagged alternative
///
/// `elector_is_owner` records which side of the claim the elector holds;
/// it decides whether realized quantities are consumed or produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Election {
    pub tag: Tag,
    pub elector_is_owner: bool,
}

/// One step of lifecycle input: the passage of time, optionally with an
/// election made at that time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifecycleEvent<T> {
    pub time: T,
    #[serde(default)]
    pub election: Option<Election>,
}

impl<T> LifecycleEvent<T> {
    /// A time-only event
    pub fn at(time: T) -> Self {
        Self {
            time,
            election: None,
        }
    }

    /// An election made at `time`
    pub fn election(time: T, tag: impl Into<Tag>, elector_is_owner: bool) -> Self {
        Self {
            time,
            election: Some(Election {
                tag: tag.into(),
                elector_is_owner,
            }),
        }
    }

    #[inline]
    pub fn is_election(&self) -> bool {
        self.election.is_some()
    }
}
