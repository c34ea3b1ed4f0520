//! Lane rules.
//!
//! Lanes are parallel tracks within a zone. A lane may be **sticky** (its
//! occupant is fixed forever) and/or **blocking** (its occupant may shuffle
//! within the zone but never advance). Boards configure these per zone via
//! `ZoneConfig`; `LanePolicy` is the read-only lookup built from that.

pub mod policy;

pub use policy::{LanePolicy, LaneRule};
