//! Formation (course) and category records.

use serde::{Deserialize, Serialize};

/// Course category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorie {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub description: String,
}

/// Course offering.
///
/// Dates are kept as the backend's ISO-8601 strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<String>,
    #[serde(default)]
    pub en_ligne: bool,
    /// Venue, for on-site sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lieu: Option<String>,
    /// Meeting link, for online sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_publication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duree_pause_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titre_pause: Option<String>,
    /// Enseignant running the course
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formateur_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evenement_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie: Option<Categorie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacite: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Formation {
    /// Where the course happens: the venue, the meeting link, or a placeholder.
    pub fn location(&self) -> &str {
        let place = if self.en_ligne {
            self.meet_link.as_deref()
        } else {
            self.lieu.as_deref()
        };
        place
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(if self.en_ligne { "En ligne" } else { "N/A" })
    }

    pub fn is_taught_by(&self, user_id: u64) -> bool {
        self.formateur_id == Some(user_id)
    }
}

/// Body of the `request` part when creating a formation.
///
/// The create endpoint takes its own field names (`mode`, `categorieId`,
/// `pauseTitle`, `pauseDuration`) rather than the formation record's.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationRequest {
    pub titre: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formateur_id: Option<u64>,
    /// `enligne` or `presentiel`
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lieu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_duration: Option<u32>,
}

impl From<&Formation> for FormationRequest {
    fn from(formation: &Formation) -> Self {
        Self {
            titre: formation.titre.clone(),
            description: formation.description.clone(),
            prix: formation.prix,
            formateur_id: formation.formateur_id,
            mode: if formation.en_ligne { "enligne" } else { "presentiel" },
            date_debut: formation.date_debut.clone(),
            date_fin: formation.date_fin.clone(),
            categorie_id: formation.categorie.as_ref().and_then(|c| c.id),
            lieu: formation.lieu.clone(),
            pause_title: formation.titre_pause.clone(),
            pause_duration: formation.duree_pause_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formation_from_backend_json() {
        let formation: Formation = serde_json::from_str(
            r#"{"id": 3, "titre": "Rust", "description": "Intro", "enLigne": false,
                "lieu": "Bloc E", "dateDebut": "2025-03-01T09:00:00", "formateurId": 7,
                "categorie": {"id": 1, "nom": "Dev", "description": ""},
                "reservations": []}"#,
        )
        .unwrap();

        assert_eq!(formation.location(), "Bloc E");
        assert!(formation.is_taught_by(7));
        assert_eq!(formation.categorie.unwrap().nom, "Dev");
    }

    #[test]
    fn test_online_formation_without_link() {
        let formation = Formation {
            en_ligne: true,
            meet_link: Some(" ".to_string()),
            ..Formation::default()
        };
        assert_eq!(formation.location(), "En ligne");
    }

    #[test]
    fn test_create_request_fields() {
        let formation = Formation {
            titre: "Rust".to_string(),
            en_ligne: true,
            formateur_id: Some(7),
            titre_pause: Some("Café".to_string()),
            duree_pause_minutes: Some(15),
            categorie: Some(Categorie {
                id: Some(2),
                ..Categorie::default()
            }),
            ..Formation::default()
        };

        assert_eq!(
            serde_json::to_value(FormationRequest::from(&formation)).unwrap(),
            serde_json::json!({
                "titre": "Rust", "description": "", "formateurId": 7, "mode": "enligne",
                "categorieId": 2, "pauseTitle": "Café", "pauseDuration": 15
            })
        );
    }
}
