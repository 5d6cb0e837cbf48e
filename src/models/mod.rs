// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the backends.

pub mod formation;
pub mod reservation;
pub mod user;

pub use formation::{Categorie, Formation, FormationRequest};
pub use reservation::{NewReservation, Reservation, ReservationRecord, ReservationStats, ReservationStatus};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};
