use thiserror::Error;

/// Placeholder for text fields the surface did not render.
pub const ABSENT: &str = "N/A";

/// Language assumed for a review with no translation marker.
pub const BASELINE_LANGUAGE: &str = "English";

/// Field-level parse faults. Unlike an ordinary extraction miss (which
/// silently defaults), these abort the current record: a price label or a
/// view URL we cannot decode is a data-quality problem worth surfacing.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Unknown price tier label: {0:?}")]
    PriceTier(String),

    #[error("Cannot parse coordinates from view URL: {0:?}")]
    Coordinates(String),

    #[error("Listing rendered without a name")]
    MissingName,
}

/// One harvested review. Immutable once built; owned by its parent Place.
#[derive(Debug, Clone)]
pub struct Review {
    pub reviewer_name: String,
    pub reviewer_info: String,
    pub language: String,
    /// Relative date as rendered ("2 weeks ago").
    pub date: String,
    /// None when the rating label was missing or unparseable.
    pub rating: Option<f64>,
    pub photo_count: u32,
    pub text: String,
}

/// Everything one harvest pass produced.
#[derive(Debug, Default)]
pub struct Harvest {
    /// Harvest order, not chronological.
    pub reviews: Vec<Review>,
    /// Translated reviews whose language matches the configured one.
    pub of_interest: u32,
    /// Reviews that carried a translation marker.
    pub other_language: u32,
}

/// One fully extracted place.
#[derive(Debug, Clone)]
pub struct Place {
    pub search_key: String,
    /// Dedup identity.
    pub name: String,
    pub category: String,
    /// 0 = no range listed, 1..=6 ascending buckets.
    pub price_tier: u8,
    pub address: String,
    pub website: String,
    pub phone: String,
    /// Raw source text ("1,234 reviews") — the surface does not guarantee a
    /// number, so parsing is a downstream concern.
    pub review_count_label: String,
    /// Raw advertised average ("4.7"), same caveat.
    pub rating_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub harvested_review_count: u32,
    pub reviews_of_interest: u32,
    pub reviews_other_language: u32,
    pub reviews: Vec<Review>,
}

/// Assembles a Place and validates the identity invariant before the record
/// can reach the dedup index.
#[derive(Debug, Default)]
pub struct PlaceBuilder {
    pub search_key: String,
    pub name: String,
    pub category: String,
    pub price_tier: u8,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub review_count_label: String,
    pub rating_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub harvest: Harvest,
}

impl PlaceBuilder {
    pub fn build(self) -> Result<Place, ExtractError> {
        if self.name.trim().is_empty() {
            return Err(ExtractError::MissingName);
        }
        Ok(Place {
            search_key: self.search_key,
            name: self.name,
            category: self.category,
            price_tier: self.price_tier,
            address: self.address,
            website: self.website,
            phone: self.phone,
            review_count_label: self.review_count_label,
            rating_label: self.rating_label,
            latitude: self.latitude,
            longitude: self.longitude,
            harvested_review_count: self.harvest.reviews.len() as u32,
            reviews_of_interest: self.harvest.of_interest,
            reviews_other_language: self.harvest.other_language,
            reviews: self.harvest.reviews,
        })
    }
}

/// Ordered records collected for one target, flushed to the sink as a unit.
#[derive(Debug, Default)]
pub struct PlaceBatch {
    pub places: Vec<Place>,
}

impl PlaceBatch {
    pub fn push(&mut self, place: Place) {
        self.places.push(place);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Widest review list in the batch; decides how many flattened review
    /// columns the CSV needs.
    pub fn max_review_count(&self) -> usize {
        self.places
            .iter()
            .map(|p| p.reviews.len())
            .max()
            .unwrap_or(0)
    }
}

const PRICE_TIERS: [(&str, u8); 7] = [
    ("0", 0),
    ("1–50", 1),
    ("50–100", 2),
    ("100–150", 3),
    ("150–200", 4),
    ("200–500", 5),
    ("500+", 6),
];

/// Map a price-range label to its tier code.
///
/// Raw labels carry a four-byte currency prefix ("AED 1–50"); the bare "0"
/// means no range listed. An unrecognized label is a hard parse fault, not a
/// silent default.
pub fn price_tier(raw: &str) -> Result<u8, ExtractError> {
    let label = match raw {
        "0" => "0",
        s if s.len() > 4 && s.as_bytes()[3] == b' ' => &s[4..],
        s => s,
    };
    PRICE_TIERS
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, tier)| *tier)
        .ok_or_else(|| ExtractError::PriceTier(raw.to_string()))
}

/// Coordinates ride in the view URL as ".../@25.276,55.296,15z/...".
pub fn coordinates_from_url(url: &str) -> Result<(f64, f64), ExtractError> {
    let fragment = url
        .rsplit_once("/@")
        .map(|(_, rest)| rest)
        .ok_or_else(|| ExtractError::Coordinates(url.to_string()))?;
    let fragment = fragment.split('/').next().unwrap_or(fragment);

    let mut parts = fragment.split(',');
    let lat = parts.next().and_then(|s| s.parse::<f64>().ok());
    let lng = parts.next().and_then(|s| s.parse::<f64>().ok());
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(ExtractError::Coordinates(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tier_maps_normalized_labels() {
        assert_eq!(price_tier("0").unwrap(), 0);
        assert_eq!(price_tier("50–100").unwrap(), 2);
        assert_eq!(price_tier("500+").unwrap(), 6);
    }

    #[test]
    fn price_tier_strips_currency_prefix() {
        assert_eq!(price_tier("AED 1–50").unwrap(), 1);
        assert_eq!(price_tier("AED 200–500").unwrap(), 5);
    }

    #[test]
    fn price_tier_rejects_unknown_labels() {
        assert_eq!(
            price_tier("moderate"),
            Err(ExtractError::PriceTier("moderate".to_string()))
        );
        assert!(price_tier("AED 13–37").is_err());
    }

    #[test]
    fn coordinates_parse_from_view_url() {
        let (lat, lng) =
            coordinates_from_url("https://maps.example.com/search/@25.276,55.296,15z/data=x")
                .unwrap();
        assert_eq!(lat, 25.276);
        assert_eq!(lng, 55.296);
    }

    #[test]
    fn coordinates_use_last_marker() {
        let (lat, _) = coordinates_from_url("https://e.com/@1.0,2.0,3z/thing/@9.5,8.5,2z").unwrap();
        assert_eq!(lat, 9.5);
    }

    #[test]
    fn coordinates_require_marker_and_numbers() {
        assert!(matches!(
            coordinates_from_url("https://maps.example.com/search/place"),
            Err(ExtractError::Coordinates(_))
        ));
        assert!(matches!(
            coordinates_from_url("https://maps.example.com/@north,west,15z"),
            Err(ExtractError::Coordinates(_))
        ));
    }

    #[test]
    fn builder_rejects_empty_identity() {
        let builder = PlaceBuilder {
            name: "  ".to_string(),
            ..PlaceBuilder::default()
        };
        assert_eq!(builder.build().unwrap_err(), ExtractError::MissingName);
    }

    #[test]
    fn builder_derives_review_counts() {
        let harvest = Harvest {
            reviews: vec![
                Review {
                    reviewer_name: "A".into(),
                    reviewer_info: ABSENT.into(),
                    language: BASELINE_LANGUAGE.into(),
                    date: "a week ago".into(),
                    rating: Some(5.0),
                    photo_count: 0,
                    text: "fine".into(),
                },
                Review {
                    reviewer_name: "B".into(),
                    reviewer_info: ABSENT.into(),
                    language: "Russian".into(),
                    date: "a month ago".into(),
                    rating: None,
                    photo_count: 2,
                    text: "отлично".into(),
                },
            ],
            of_interest: 1,
            other_language: 1,
        };
        let place = PlaceBuilder {
            search_key: "@25.2,55.3,14z".into(),
            name: "Bait Al Mandi".into(),
            harvest,
            ..PlaceBuilder::default()
        }
        .build()
        .unwrap();

        assert_eq!(place.harvested_review_count, 2);
        assert_eq!(place.reviews_of_interest, 1);
        assert_eq!(place.reviews_other_language, 1);
        assert_eq!(place.reviews.len(), 2);
    }
}
