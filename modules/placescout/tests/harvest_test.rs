// Review harvester behavior against a scripted surface: tab activation,
// language tally, and unit-retry semantics.

use placescout::config::ScoutConfig;
use placescout::locators;
use placescout::pacing::Pacing;
use placescout::reviews::ReviewHarvester;
use placescout::testing::{review_card, text_region, MockSurface};

fn harvester() -> ReviewHarvester {
    ReviewHarvester::from_config(&ScoutConfig::fast())
}

#[tokio::test]
async fn tallies_languages_from_translation_markers() {
    let cards = vec![
        review_card("Anna", "Great food", Some("See original (Russian)"), Some("5.0 stars")),
        review_card("Boris", "Отлично", Some("(Russian)"), Some("4.0 stars")),
        review_card("Carol", "Decent", None, Some("3.0 stars")),
        review_card("Dmitri", "Fine", None, None),
        review_card("Eve", "Lovely", None, Some("not a number")),
    ];
    let surface = MockSurface::new()
        .with_region(&locators::tab_slot(1), text_region("Reviews"))
        .with_regions(locators::REVIEW_CARD, cards);

    let harvest = harvester().harvest(&surface, &Pacing::zero()).await;

    assert_eq!(harvest.reviews.len(), 5);
    assert_eq!(harvest.other_language, 2);
    assert_eq!(harvest.of_interest, 2);

    assert_eq!(harvest.reviews[0].language, "Russian");
    assert_eq!(harvest.reviews[0].rating, Some(5.0));
    assert_eq!(harvest.reviews[2].language, "English");
    // Rating region present but label unparseable: absent, not an error.
    assert_eq!(harvest.reviews[4].rating, None);
    assert_eq!(harvest.reviews[3].rating, None);
}

#[tokio::test]
async fn marker_naming_the_baseline_still_counts_as_translated() {
    let cards = vec![
        review_card("Frank", "Good", Some("(English)"), None),
        review_card("Grace", "Nice", None, None),
    ];
    let surface = MockSurface::new()
        .with_region(&locators::tab_slot(1), text_region("Reviews"))
        .with_regions(locators::REVIEW_CARD, cards);

    let harvest = harvester().harvest(&surface, &Pacing::zero()).await;

    // The marker only appears on translated reviews; an unmarked review is
    // the baseline, a marked one is not, whatever name the marker parses to.
    assert_eq!(harvest.reviews[0].language, "English");
    assert_eq!(harvest.other_language, 1);
    assert_eq!(harvest.of_interest, 0);
}

#[tokio::test]
async fn probes_tab_slots_until_label_matches() {
    let reviews_tab = text_region("Reviews");
    let surface = MockSurface::new()
        .with_region(&locators::tab_slot(1), text_region("Overview"))
        .with_region(&locators::tab_slot(2), reviews_tab.clone())
        .with_regions(
            locators::REVIEW_CARD,
            vec![review_card("Anna", "ok", None, None)],
        );

    let harvest = harvester().harvest(&surface, &Pacing::zero()).await;

    assert_eq!(reviews_tab.click_count(), 1);
    assert_eq!(harvest.reviews.len(), 1);
}

#[tokio::test]
async fn missing_tab_degrades_to_best_effort() {
    let surface = MockSurface::new().with_regions(
        locators::REVIEW_CARD,
        vec![review_card("Anna", "ok", None, None)],
    );

    let harvest = harvester().harvest(&surface, &Pacing::zero()).await;
    assert_eq!(harvest.reviews.len(), 1);
}

#[tokio::test]
async fn exhausted_retries_degrade_to_empty_not_error() {
    let surface = MockSurface::new().failing_find(locators::REVIEW_CARD);

    let harvest = harvester().harvest(&surface, &Pacing::zero()).await;

    assert!(harvest.reviews.is_empty());
    assert_eq!(harvest.of_interest, 0);
    // One attempt per retry slot, a reload between attempts only.
    assert_eq!(surface.find_count(locators::REVIEW_CARD), 3);
    assert_eq!(surface.reload_count(), 2);
}
