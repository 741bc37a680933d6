use quiz_core::model::ChallengeId;
use services::CatalogEntry;

/// Presentation shape for one catalog card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeCardVm {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    pub navigable: bool,
    pub status_label: Option<String>,
}

#[must_use]
pub fn map_catalog_cards(entries: &[CatalogEntry]) -> Vec<ChallengeCardVm> {
    entries
        .iter()
        .map(|entry| {
            let status_label = if !entry.playable {
                Some("Em breve".to_string())
            } else if !entry.unlocked {
                Some(format!(
                    "Bloqueado: requer {} pontos",
                    entry.challenge.required_score()
                ))
            } else {
                None
            };

            ChallengeCardVm {
                id: entry.challenge.id(),
                title: entry.challenge.title().to_string(),
                description: entry.challenge.description().to_string(),
                navigable: entry.is_navigable(),
                status_label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Challenge;
    use uuid::Uuid;

    fn entry(required_score: u32, has_questions: bool, unlocked: bool) -> CatalogEntry {
        CatalogEntry {
            challenge: Challenge::new(
                ChallengeId::new(Uuid::new_v4()),
                "Letra B",
                "Segundas letras",
                required_score,
                has_questions,
            )
            .unwrap(),
            unlocked,
            playable: has_questions,
        }
    }

    #[test]
    fn open_card_has_no_status_label() {
        let cards = map_catalog_cards(&[entry(0, true, true)]);
        assert!(cards[0].navigable);
        assert!(cards[0].status_label.is_none());
    }

    #[test]
    fn locked_card_names_the_required_score() {
        let cards = map_catalog_cards(&[entry(100, true, false)]);
        assert!(!cards[0].navigable);
        assert_eq!(
            cards[0].status_label.as_deref(),
            Some("Bloqueado: requer 100 pontos")
        );
    }

    #[test]
    fn unplayable_card_is_blocked_even_when_unlocked() {
        let cards = map_catalog_cards(&[entry(0, false, true)]);
        assert!(!cards[0].navigable);
        assert_eq!(cards[0].status_label.as_deref(), Some("Em breve"));
    }
}
