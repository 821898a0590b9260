//! `hs-calendar` — when resources can work and what they are booked for.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`shift`]   | `Shift` (daily recurring window), `ShiftTable` (per site)   |
//! | [`booking`] | `BookedItem`, `Schedule` (conflict-free booking calendar)   |
//! | [`loader`]  | `load_shifts_csv`, `load_shifts_reader`                     |
//! | [`error`]   | `CalendarError`, `CalendarResult<T>`                        |
//!
//! # Availability vs. bookings
//!
//! A `ShiftTable` says when a staff member is *on site* (recurring daily);
//! a `Schedule` says which concrete intervals are already *taken*.  A slot
//! is usable for a staff member iff the shift table hosts it and the
//! schedule has no interfering booking:
//!
//! ```text
//! usable(slot) = shifts.is_working(slot, site) && !schedule.interferes(slot)
//! ```
//!
//! Equipment and patients have a `Schedule` but no `ShiftTable`.

pub mod booking;
pub mod error;
pub mod loader;
pub mod shift;


pub use booking::{BookedItem, Schedule};
pub use error::{CalendarError, CalendarResult};
pub use loader::{load_shifts_csv, load_shifts_reader};
pub use shift::{Shift, ShiftTable};
