//! Identifiers shared by every component.

/// Stable identifier of a vessel. Rooms, subsystems and crew refer to their
/// vessel by id rather than by entity so references survive despawns.
pub type VesselId = u32;

/// Room index, unique within one vessel.
pub type RoomId = u32;
