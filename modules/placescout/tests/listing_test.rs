// Listing extraction: full record assembly, the skip-before-extract
// short-circuit, and the hard parse faults that abort one record.

use placescout::config::ScoutConfig;
use placescout::dedup::DedupIndex;
use placescout::listing::{ListingExtractor, Outcome};
use placescout::locators;
use placescout::model::ExtractError;
use placescout::pacing::Pacing;
use placescout::reviews::ReviewHarvester;
use placescout::testing::{review_card, text_region, MockRegion, MockSurface};

fn extractor() -> ListingExtractor {
    ListingExtractor::new(ReviewHarvester::from_config(&ScoutConfig::fast()))
}

/// A fully rendered place detail pane.
fn place_surface() -> MockSurface {
    MockSurface::new()
        .with_region(locators::PLACE_NAME, text_region("Bait Al Mandi"))
        .with_region(locators::PLACE_CATEGORY, text_region("Yemeni restaurant"))
        .with_region(locators::PLACE_PRICE, text_region("AED 50–100"))
        .with_region(locators::PLACE_ADDRESS, text_region("12 Spice Souk Rd"))
        .with_region(locators::PLACE_PHONE, text_region("+971 4 123 4567"))
        .with_region(locators::PLACE_REVIEW_COUNT, text_region("1,234 reviews"))
        .with_region(locators::PLACE_RATING, text_region("4.7"))
        .with_region(&locators::tab_slot(1), text_region("Reviews"))
        .with_regions(
            locators::REVIEW_CARD,
            vec![
                review_card("Anna", "Great", Some("(Russian)"), Some("5.0 stars")),
                review_card("Olek", "Smaczne", Some("(Ukrainian)"), Some("4.0 stars")),
                review_card("Carol", "Fine", None, Some("3.0 stars")),
            ],
        )
}

#[tokio::test]
async fn extracts_full_record_and_registers_dedup() {
    let surface = place_surface();
    let dedup = DedupIndex::new();
    let listing = text_region("");

    let outcome = extractor()
        .extract(&surface, &listing, "@25.2,55.3,14z", &dedup, &Pacing::zero())
        .await
        .unwrap();

    let Outcome::Extracted(place) = outcome else {
        panic!("expected an extracted place");
    };
    assert_eq!(place.search_key, "@25.2,55.3,14z");
    assert_eq!(place.name, "Bait Al Mandi");
    assert_eq!(place.category, "Yemeni restaurant");
    assert_eq!(place.price_tier, 2);
    assert_eq!(place.address, "12 Spice Souk Rd");
    // Website was never rendered: defaulted, not an error.
    assert_eq!(place.website, "N/A");
    assert_eq!(place.review_count_label, "1,234 reviews");
    assert_eq!(place.rating_label, "4.7");
    assert_eq!(place.latitude, 25.276);
    assert_eq!(place.longitude, 55.296);
    assert_eq!(place.harvested_review_count, 3);
    assert_eq!(place.reviews_of_interest, 1);
    assert_eq!(place.reviews_other_language, 2);

    assert!(dedup.contains("Bait Al Mandi"));
    assert_eq!(listing.click_count(), 1);
}

#[tokio::test]
async fn known_name_skips_before_any_other_extraction() {
    let surface = place_surface();
    let dedup = DedupIndex::new();
    dedup.insert("Bait Al Mandi");
    let listing = text_region("");

    let outcome = extractor()
        .extract(&surface, &listing, "t", &dedup, &Pacing::zero())
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Skipped));
    // The name lookup is the only surface access after the click.
    assert_eq!(surface.find_log(), vec![locators::PLACE_NAME.to_string()]);
}

#[tokio::test]
async fn unknown_price_label_aborts_record_without_poisoning_dedup() {
    let surface = place_surface().with_region(locators::PLACE_PRICE, text_region("AED ???"));
    let dedup = DedupIndex::new();

    let err = extractor()
        .extract(&surface, &text_region(""), "t", &dedup, &Pacing::zero())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExtractError>(),
        Some(ExtractError::PriceTier(_))
    ));
    assert!(dedup.is_empty());
}

#[tokio::test]
async fn missing_price_region_defaults_to_unlisted_tier() {
    let surface = place_surface().with_regions(locators::PLACE_PRICE, Vec::new());
    let dedup = DedupIndex::new();

    let outcome = extractor()
        .extract(&surface, &text_region(""), "t", &dedup, &Pacing::zero())
        .await
        .unwrap();

    let Outcome::Extracted(place) = outcome else {
        panic!("expected an extracted place");
    };
    assert_eq!(place.price_tier, 0);
}

#[tokio::test]
async fn view_url_without_marker_aborts_record() {
    let surface = place_surface().with_url("https://maps.example.com/plain");
    let dedup = DedupIndex::new();

    let err = extractor()
        .extract(&surface, &text_region(""), "t", &dedup, &Pacing::zero())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExtractError>(),
        Some(ExtractError::Coordinates(_))
    ));
    assert!(dedup.is_empty());
}

#[tokio::test]
async fn stale_listing_click_is_an_error_for_caller() {
    let surface = place_surface();
    let dedup = DedupIndex::new();
    let listing = MockRegion::new().failing_click();

    let result = extractor()
        .extract(&surface, &listing, "t", &dedup, &Pacing::zero())
        .await;

    assert!(result.is_err());
    assert!(dedup.is_empty());
}
