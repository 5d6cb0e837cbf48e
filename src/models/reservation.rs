//! Seat reservations.
//!
//! The formation service has shipped several reservation shapes (`statut` vs
//! `status`, `participantId` vs `userId`, nested formation or bare ID).
//! [`ReservationRecord`] accepts all of them and [`Reservation::from_record`]
//! is the one place where missing fields get their defaults.

use super::formation::Formation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reservation lifecycle state, as tagged by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(rename = "CONFIRME")]
    Confirmed,
    #[serde(rename = "EN_ATTENTE")]
    Pending,
    #[serde(rename = "ANNULE")]
    Cancelled,
    #[serde(rename = "REFUSE")]
    Refused,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Confirmed,
        ReservationStatus::Pending,
        ReservationStatus::Cancelled,
        ReservationStatus::Refused,
    ];

    /// Backend tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "CONFIRME",
            ReservationStatus::Pending => "EN_ATTENTE",
            ReservationStatus::Cancelled => "ANNULE",
            ReservationStatus::Refused => "REFUSE",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Refused => "Refused",
        }
    }

    /// Parse a backend tag or its English equivalent, case-insensitively.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "CONFIRME" | "CONFIRMED" => Some(ReservationStatus::Confirmed),
            "EN_ATTENTE" | "PENDING" => Some(ReservationStatus::Pending),
            "ANNULE" | "CANCELLED" | "CANCELED" => Some(ReservationStatus::Cancelled),
            "REFUSE" | "REFUSED" => Some(ReservationStatus::Refused),
            _ => None,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reservation exactly as received, every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub participant_id: Option<u64>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date_reservation: Option<String>,
    #[serde(default)]
    pub formation: Option<Formation>,
    #[serde(default)]
    pub formation_id: Option<u64>,
    #[serde(default)]
    pub participant_name: Option<String>,
    #[serde(default)]
    pub participant_email: Option<String>,
}

/// Normalized reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: Option<u64>,
    pub participant_id: Option<u64>,
    pub status: ReservationStatus,
    pub reserved_at: Option<NaiveDateTime>,
    pub formation_id: Option<u64>,
    pub formation_title: String,
    pub participant_name: String,
    pub participant_email: Option<String>,
}

impl Reservation {
    /// Map a raw record, filling defaults for anything missing.
    pub fn from_record(record: ReservationRecord) -> Self {
        let raw_status = record.statut.or(record.status);
        let status = match raw_status.as_deref().map(ReservationStatus::parse) {
            Some(Some(status)) => status,
            Some(None) => {
                tracing::warn!(
                    id = ?record.id,
                    status = ?raw_status,
                    "Unknown reservation status, treating as pending"
                );
                ReservationStatus::Pending
            }
            None => ReservationStatus::Pending,
        };

        let participant_id = record.participant_id.or(record.user_id);
        let formation_id = record
            .formation
            .as_ref()
            .and_then(|f| f.id)
            .or(record.formation_id);
        let formation_title = record
            .formation
            .map(|f| f.titre)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Unknown formation".to_string());
        let participant_name = record
            .participant_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| match participant_id {
                Some(id) => format!("Participant #{}", id),
                None => "Unknown participant".to_string(),
            });

        Self {
            id: record.id,
            participant_id,
            status,
            reserved_at: record.date_reservation.as_deref().and_then(parse_timestamp),
            formation_id,
            formation_title,
            participant_name,
            participant_email: record.participant_email,
        }
    }
}

impl From<ReservationRecord> for Reservation {
    fn from(record: ReservationRecord) -> Self {
        Reservation::from_record(record)
    }
}

/// Body for creating a reservation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub participant_id: u64,
    pub statut: ReservationStatus,
    pub formation: FormationRef,
}

/// Reference to an existing formation by ID.
#[derive(Debug, Clone, Serialize)]
pub struct FormationRef {
    pub id: u64,
}

impl NewReservation {
    /// A pending reservation of `participant_id` on `formation_id`.
    pub fn pending(participant_id: u64, formation_id: u64) -> Self {
        Self {
            participant_id,
            statut: ReservationStatus::Pending,
            formation: FormationRef { id: formation_id },
        }
    }
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub refused: usize,
}

impl ReservationStats {
    pub fn from_reservations(reservations: &[Reservation]) -> Self {
        reservations
            .iter()
            .fold(Self::default(), |mut stats, r| {
                stats.total += 1;
                match r.status {
                    ReservationStatus::Confirmed => stats.confirmed += 1,
                    ReservationStatus::Pending => stats.pending += 1,
                    ReservationStatus::Cancelled => stats.cancelled += 1,
                    ReservationStatus::Refused => stats.refused += 1,
                }
                stats
            })
    }
}

/// Reservations with the given status (all of them for `None`), newest first.
pub fn filter_by_status(
    reservations: &[Reservation],
    status: Option<ReservationStatus>,
) -> Vec<Reservation> {
    let mut selected: Vec<Reservation> = reservations
        .iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.reserved_at.cmp(&a.reserved_at));
    selected
}

/// Parse the backend's `LocalDateTime` format, with or without fractions.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}
