//! Integration tests for flight-inspo
//!
//! These tests drive the public API the way the inspiration flow does:
//! resolve origin cities against the catalog, then filter and group the
//! results that came back from the search.

use chrono::NaiveDate;
use flight_inspo::{
    edit_distance, group_and_dedup, group_by_destination, prepare_results, suggest, CityCatalog,
    CityLookup, FlightResult, Itinerary, TripWindow, DEFAULT_SIMILARITY_THRESHOLD,
};
use std::collections::HashSet;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Helper function to create an inspiration result
fn create_result(origin: &str, destination: &str, depart: &str, return_date: &str, city: &str, country: &str) -> FlightResult {
    FlightResult::new(origin, destination, date(depart), date(return_date)).with_destination(city, country)
}

/// A mixed batch of results as the inspiration search returns them
fn create_mixed_results() -> Vec<FlightResult> {
    vec![
        create_result("YUL", "LIS", "2025-08-02", "2025-08-10", "Lisbon", "Portugal"),
        create_result("YUL", "CDG", "2025-08-03", "2025-08-11", "Paris", "France"),
        create_result("YYZ", "NRT", "2025-08-04", "2025-08-12", "Tokyo", "Japan"),
        create_result("YUL", "NCE", "2025-08-05", "2025-08-13", "Nice", "France"),
        create_result("YUL", "CDG", "2025-08-03", "2025-08-11", "Paris", "France"),
        create_result("YUL", "OPO", "2025-08-06", "2025-08-14", "Porto", "Portugal"),
        create_result("YYZ", "ORY", "2025-08-03", "2025-08-11", "Paris", "France"),
        create_result("YUL", "LIS", "2025-08-07", "2025-08-15", "Lisbon", "Portugal"),
        create_result("YYZ", "NRT", "2025-08-04", "2025-08-12", "Tokyo", "Japan"),
    ]
}

fn destinations(results: &[FlightResult]) -> Vec<(String, String)> {
    results
        .iter()
        .map(|r| {
            (
                r.destination_country.clone().unwrap_or_default(),
                r.destination_city.clone().unwrap_or_default(),
            )
        })
        .collect()
}

#[test]
fn test_edit_distance_properties() {
    let words = ["", "a", "london", "londno", "lagos", "são paulo", "new york"];

    for a in words {
        assert_eq!(edit_distance(a, a), 0);
        assert_eq!(edit_distance("", a), a.chars().count());
        assert_eq!(edit_distance(a, ""), a.chars().count());
        for b in words {
            assert_eq!(edit_distance(a, b), edit_distance(b, a), "{} / {}", a, b);
        }
    }
}

#[test]
fn test_edit_distance_matches_strsim() {
    let pairs = [
        ("london", "londno"),
        ("montreal", "montréal"),
        ("saint petersburg", "st. petersburg"),
        ("kyiv", "kiev"),
        ("", "bogotá"),
        ("ho chi minh city", "hochiminh"),
    ];

    for (a, b) in pairs {
        assert_eq!(edit_distance(a, b), strsim::levenshtein(a, b), "{} / {}", a, b);
    }
}

#[test]
fn test_suggest_examples() {
    let catalog = ["london", "paris", "lagos"];

    let suggestions = suggest("londno", catalog, DEFAULT_SIMILARITY_THRESHOLD);
    assert!(suggestions.contains(&"london".to_string()));
    assert!(!suggestions.contains(&"paris".to_string()));

    assert_eq!(suggest("lagos", catalog, 1.0), vec!["lagos".to_string()]);
    assert!(suggest("lagoss", catalog, 1.0).is_empty());
}

#[test]
fn test_suggestions_have_no_duplicates() {
    let catalog = CityCatalog::new([
        ("berlin", "BER"),
        ("Berlin", "BER"),
        ("bern", "BRN"),
        ("bremen", "BRE"),
    ]);

    match catalog.resolve("berln", 0.6) {
        CityLookup::Suggestions { candidates, .. } => {
            let unique: HashSet<&String> = candidates.iter().collect();
            assert_eq!(unique.len(), candidates.len());
            assert!(candidates.contains(&"berlin".to_string()));
        }
        other => panic!("Expected suggestions, got {:?}", other),
    }
}

#[test]
fn test_catalog_resolution_flow() {
    let catalog = CityCatalog::from_json_str(
        r#"{"london": "LON", "paris": "PAR", "lagos": "LOS", "montreal": "YMQ"}"#,
    )
    .unwrap();

    assert!(matches!(
        catalog.resolve("Montreal", DEFAULT_SIMILARITY_THRESHOLD),
        CityLookup::Found { ref code, .. } if code == "YMQ"
    ));

    match catalog.resolve("montreel", DEFAULT_SIMILARITY_THRESHOLD) {
        CityLookup::Suggestions { candidates, .. } => assert_eq!(candidates, vec!["montreal"]),
        other => panic!("Expected suggestions, got {:?}", other),
    }

    assert!(matches!(
        catalog.resolve("reykjavik", DEFAULT_SIMILARITY_THRESHOLD),
        CityLookup::NotFound { .. }
    ));
}

#[test]
fn test_paris_tokyo_scenario() {
    let input = vec![
        create_result("YUL", "CDG", "2025-08-12", "2025-08-20", "Paris", "France"),
        create_result("YUL", "CDG", "2025-08-12", "2025-08-20", "Paris", "France"),
        create_result("YUL", "ORY", "2025-08-13", "2025-08-21", "Paris", "France"),
        create_result("YUL", "NRT", "2025-08-12", "2025-08-20", "Tokyo", "Japan"),
    ];

    let grouped = group_by_destination(input.clone());

    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped[0], input[0]);
    assert_eq!(grouped[1], input[2]);
    assert_eq!(grouped[2], input[3]);
}

#[test]
fn test_scenario_follows_first_seen_country() {
    let input = vec![
        create_result("YUL", "NRT", "2025-08-12", "2025-08-20", "Tokyo", "Japan"),
        create_result("YUL", "CDG", "2025-08-12", "2025-08-20", "Paris", "France"),
        create_result("YUL", "CDG", "2025-08-12", "2025-08-20", "Paris", "France"),
    ];

    let grouped = group_by_destination(input);
    assert_eq!(
        destinations(&grouped),
        vec![
            ("Japan".to_string(), "Tokyo".to_string()),
            ("France".to_string(), "Paris".to_string()),
        ]
    );
}

#[test]
fn test_empty_and_single_inputs() {
    assert!(group_by_destination(Vec::new()).is_empty());

    let single = vec![create_result("YUL", "LIS", "2025-08-02", "2025-08-10", "Lisbon", "Portugal")];
    assert_eq!(group_by_destination(single.clone()), single);
}

#[test]
fn test_grouping_properties() {
    let input = create_mixed_results();
    let grouped = group_by_destination(input.clone());

    // Subset of the input, never longer
    assert!(grouped.len() <= input.len());
    for record in &grouped {
        assert!(input.contains(record));
    }

    // Each (country, city) forms one contiguous run without duplicate itineraries
    let keys = destinations(&grouped);
    let mut finished: HashSet<(String, String)> = HashSet::new();
    let mut run_keys = HashSet::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 && keys[i - 1] != *key {
            finished.insert(keys[i - 1].clone());
            run_keys.clear();
        }
        assert!(!finished.contains(key), "{:?} is split into two runs", key);
        assert!(run_keys.insert(grouped[i].dedup_key()), "duplicate itinerary in {:?}", key);
    }

    assert_eq!(
        keys,
        vec![
            ("Portugal".to_string(), "Lisbon".to_string()),
            ("Portugal".to_string(), "Lisbon".to_string()),
            ("Portugal".to_string(), "Porto".to_string()),
            ("France".to_string(), "Paris".to_string()),
            ("France".to_string(), "Paris".to_string()),
            ("France".to_string(), "Nice".to_string()),
            ("Japan".to_string(), "Tokyo".to_string()),
        ]
    );
}

#[test]
fn test_grouping_is_idempotent() {
    let once = group_by_destination(create_mixed_results());
    let twice = group_by_destination(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_missing_names_form_their_own_group() {
    let unnamed = FlightResult::new("YUL", "XXX", date("2025-08-02"), date("2025-08-09"));
    let input = vec![
        unnamed.clone(),
        create_result("YUL", "CDG", "2025-08-03", "2025-08-11", "Paris", "France"),
        unnamed.clone(),
    ];

    let grouped = group_by_destination(input);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0], unnamed);
    assert_eq!(grouped[1].destination_city.as_deref(), Some("Paris"));
}

#[test]
fn test_group_and_dedup_with_custom_keys() {
    // Group by origin airport, then destination airport
    let grouped = group_and_dedup(
        create_mixed_results(),
        |r: &FlightResult| r.origin_airport.clone(),
        |r: &FlightResult| r.destination_airport.clone(),
    );

    let routes: Vec<(&str, &str)> = grouped
        .iter()
        .map(|r| (r.origin_airport.as_str(), r.destination_airport.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("YUL", "LIS"),
            ("YUL", "LIS"),
            ("YUL", "CDG"),
            ("YUL", "NCE"),
            ("YUL", "OPO"),
            ("YYZ", "NRT"),
            ("YYZ", "ORY"),
        ]
    );
}

#[test]
fn test_extra_payload_travels_with_record() {
    let json = r#"[
        {"origin_airport": "YUL", "destination_airport": "CDG", "departure_date": "2025-08-03",
         "return_date": "2025-08-11", "destination_city_name": "Paris", "destination_country_name": "France",
         "price": {"total": "640.10"}, "links": {"flightOffers": "https://example.test/offers/1"}},
        {"origin_airport": "YUL", "destination_airport": "CDG", "departure_date": "2025-08-03",
         "return_date": "2025-08-11", "destination_city_name": "Paris", "destination_country_name": "France",
         "price": {"total": "655.00"}}
    ]"#;

    let results: Vec<FlightResult> = serde_json::from_str(json).unwrap();
    let grouped = group_by_destination(results);

    // First occurrence wins, payload included
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].extra["price"]["total"], "640.10");
    assert!(grouped[0].extra.contains_key("links"));
}

#[test]
fn test_prepare_results_with_window() {
    let window = TripWindow::new(date("2025-08-01"), date("2025-08-13"), 9, 9).unwrap();
    let prepared = prepare_results(create_mixed_results(), Some(&window));

    // Only trips of nine days returning by 2025-08-13 remain
    assert_eq!(
        destinations(&prepared),
        vec![
            ("Portugal".to_string(), "Lisbon".to_string()),
            ("France".to_string(), "Paris".to_string()),
            ("France".to_string(), "Paris".to_string()),
            ("France".to_string(), "Nice".to_string()),
            ("Japan".to_string(), "Tokyo".to_string()),
        ]
    );
}
