// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Formation service client: categories, formations and reservations.

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::middleware::ApiClient;
use crate::models::{
    Categorie, Formation, FormationRequest, NewReservation, Reservation, ReservationRecord,
    ReservationStatus,
};
use reqwest::multipart::{Form, Part};
use reqwest::Method;

/// Client for the formation backend.
#[derive(Clone)]
pub struct FormationService {
    api: ApiClient,
    base_url: String,
}

impl FormationService {
    pub fn new(config: &Config, api: ApiClient) -> Self {
        Self {
            api,
            base_url: config.formation_api_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // --- Categories ---

    pub async fn categories(&self) -> Result<Vec<Categorie>> {
        self.api.get_json(&self.url("categories")).await
    }

    pub async fn categorie(&self, id: u64) -> Result<Categorie> {
        self.api.get_json(&self.url(&format!("categories/{}", id))).await
    }

    pub async fn add_categorie(&self, categorie: &Categorie) -> Result<Categorie> {
        let url = self.url("categories");
        self.api
            .send_json(self.api.request(Method::POST, &url).json(categorie))
            .await
    }

    pub async fn delete_categorie(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("categories/{}", id));
        self.api
            .send_empty(self.api.request(Method::DELETE, &url))
            .await
    }

    // --- Formations ---

    pub async fn formations(&self) -> Result<Vec<Formation>> {
        self.api.get_json(&self.url("formations")).await
    }

    /// Formations taught by `formateur_id`.
    pub async fn formations_taught_by(&self, formateur_id: u64) -> Result<Vec<Formation>> {
        let all = self.formations().await?;
        Ok(all
            .into_iter()
            .filter(|f| f.is_taught_by(formateur_id))
            .collect())
    }

    pub async fn formation(&self, id: u64) -> Result<Formation> {
        self.api.get_json(&self.url(&format!("formations/{}", id))).await
    }

    /// Create a formation with its cover image (multipart `request` + `image`).
    pub async fn add_formation(
        &self,
        formation: &Formation,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<Formation> {
        let request = serde_json::to_string(&FormationRequest::from(formation))
            .map_err(|e| PortalError::Internal(e.into()))?;

        let form = Form::new()
            .part("request", with_mime(Part::text(request), "application/json")?)
            .part(
                "image",
                with_mime(
                    Part::bytes(image).file_name(file_name.to_string()),
                    image_mime(file_name),
                )?,
            );

        let url = self.url("formations/upload");
        let created: Formation = self
            .api
            .send_json(self.api.request(Method::POST, &url).multipart(form))
            .await?;

        tracing::info!(formation_id = ?created.id, titre = %created.titre, "Formation created");
        Ok(created)
    }

    pub async fn update_formation(&self, formation: &Formation) -> Result<Formation> {
        let url = self.url("formations");
        self.api
            .send_json(self.api.request(Method::PUT, &url).json(formation))
            .await
    }

    pub async fn delete_formation(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("formations/{}", id));
        self.api
            .send_empty(self.api.request(Method::DELETE, &url))
            .await
    }

    // --- Reservations ---

    pub async fn reservations(&self) -> Result<Vec<Reservation>> {
        self.reservation_list(&self.url("reservations")).await
    }

    pub async fn reservations_by_participant(&self, participant_id: u64) -> Result<Vec<Reservation>> {
        self.reservation_list(&self.url(&format!("reservations/participant/{}", participant_id)))
            .await
    }

    pub async fn reservations_by_formation(&self, formation_id: u64) -> Result<Vec<Reservation>> {
        self.reservation_list(&self.url(&format!("reservations/formation/{}", formation_id)))
            .await
    }

    pub async fn add_reservation(&self, reservation: &NewReservation) -> Result<Reservation> {
        let url = self.url("reservations");
        let record: ReservationRecord = self
            .api
            .send_json(self.api.request(Method::POST, &url).json(reservation))
            .await?;
        Ok(Reservation::from_record(record))
    }

    pub async fn delete_reservation(&self, id: u64) -> Result<()> {
        let url = self.url(&format!("reservations/{}", id));
        self.api
            .send_empty(self.api.request(Method::DELETE, &url))
            .await
    }

    pub async fn update_reservation_status(
        &self,
        id: u64,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let url = self.url(&format!("reservations/{}/status", id));
        let record: ReservationRecord = self
            .api
            .send_json(
                self.api
                    .request(Method::PUT, &url)
                    .query(&[("status", status.as_tag())]),
            )
            .await?;

        tracing::info!(reservation_id = id, status = status.as_tag(), "Reservation status updated");
        Ok(Reservation::from_record(record))
    }

    async fn reservation_list(&self, url: &str) -> Result<Vec<Reservation>> {
        let records: Vec<ReservationRecord> = self.api.get_json(url).await?;
        Ok(records.into_iter().map(Reservation::from_record).collect())
    }
}

fn with_mime(part: Part, mime: &str) -> Result<Part> {
    part.mime_str(mime)
        .map_err(|e| PortalError::Internal(anyhow::anyhow!("bad content type {}: {}", mime, e)))
}

/// Content type for an image, from its file extension.
fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
