//! Trip and participant types.
//!
//! A trip is created together with all of its participants. The owner is the
//! participant who requested the trip and is the only one confirmed at
//! creation time; everyone else is an invitee awaiting confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Stored records ──────────────────────────────────────────────────────────

/// A persisted trip with its participants, owner first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
  pub trip_id:      Uuid,
  pub destination:  String,
  pub starts_at:    DateTime<Utc>,
  pub ends_at:      DateTime<Utc>,
  pub created_at:   DateTime<Utc>,
  pub participants: Vec<Participant>,
}

impl Trip {
  /// The participant who created the trip.
  pub fn owner(&self) -> Option<&Participant> {
    self.participants.iter().find(|p| p.is_owner)
  }

  pub fn invitees(&self) -> impl Iterator<Item = &Participant> {
    self.participants.iter().filter(|p| !p.is_owner)
  }
}

/// A person associated with a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: Uuid,
  pub email:          String,
  /// Only known for the owner in the creation flow.
  pub name:           Option<String>,
  pub is_owner:       bool,
  pub is_confirmed:   bool,
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// The requester of a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
  pub name:  String,
  pub email: String,
}

/// A participant row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
  pub email:        String,
  pub name:         Option<String>,
  pub is_owner:     bool,
  pub is_confirmed: bool,
}

impl NewParticipant {
  fn owner(owner: Owner) -> Self {
    Self {
      email:        owner.email,
      name:         Some(owner.name),
      is_owner:     true,
      is_confirmed: true,
    }
  }

  fn invitee(email: String) -> Self {
    Self {
      email,
      name: None,
      is_owner: false,
      is_confirmed: false,
    }
  }
}

/// Everything a [`TripStore`](crate::store::TripStore) needs to create a trip
/// in one atomic write.
///
/// The participant list can only be built through [`NewTrip::new`], which
/// guarantees exactly one owner placed first.
#[derive(Debug, Clone)]
pub struct NewTrip {
  pub destination: String,
  pub starts_at:   DateTime<Utc>,
  pub ends_at:     DateTime<Utc>,
  participants:    Vec<NewParticipant>,
}

impl NewTrip {
  /// Build a trip owned by `owner` with one invitee per email. Duplicate
  /// emails are kept as separate participants.
  pub fn new(
    destination: impl Into<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    owner: Owner,
    invitees: impl IntoIterator<Item = String>,
  ) -> Self {
    let participants = std::iter::once(NewParticipant::owner(owner))
      .chain(invitees.into_iter().map(NewParticipant::invitee))
      .collect();

    Self {
      destination: destination.into(),
      starts_at,
      ends_at,
      participants,
    }
  }

  pub fn participants(&self) -> &[NewParticipant] { &self.participants }
}
