//! HTTP-level integration tests for movie listing and creation.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener, backed by the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, memory_store, post_json, post_raw, seed_scenario};
use chrono::NaiveDate;
use cinedash_core::movie::NewMovie;
use serde_json::json;

fn titles(json: &serde_json::Value) -> Vec<String> {
    json["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movieTitle"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// POST /movies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_movie_returns_201_with_message() {
    let app = build_test_app(memory_store());
    let response = post_json(
        app,
        "/movies",
        json!({
            "releaseDate": "2010-07-16T00:00:00.000Z",
            "movieTitle": "Inception",
            "productionBudget": "160000000",
            "domesticGross": 292_576_195,
            "worldwideGross": 835_524_642
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Movie created successfully");
    assert_eq!(json["movie"]["movieTitle"], "Inception");
    assert_eq!(json["movie"]["releaseDate"], "2010-07-16");
    assert_eq!(json["movie"]["productionBudget"].as_f64(), Some(160_000_000.0));
    assert!(json["movie"]["id"].is_number());
}

#[tokio::test]
async fn omitted_budget_is_persisted_as_zero() {
    let store = memory_store();
    let app = build_test_app(store.clone());
    let response = post_json(
        app,
        "/movies",
        json!({
            "releaseDate": "2021-01-01",
            "movieTitle": "Shoestring",
            "domesticGross": 10,
            "worldwideGross": 20
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(build_test_app(store), "/movies").await).await;
    assert_eq!(json["movies"][0]["productionBudget"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn missing_required_fields_return_400() {
    let app = build_test_app(memory_store());
    let response = post_json(app, "/movies", json!({"movieTitle": "Half"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("releaseDate is required"));
    assert!(message.contains("domesticGross is required"));
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = build_test_app(memory_store());
    let response = post_raw(app, "/movies", "{not json".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// GET /movies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_catalog_has_zero_pages() {
    let app = build_test_app(memory_store());
    let response = get(app, "/movies").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["movies"], json!([]));
    assert_eq!(json["totalPages"], 0);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["totalCount"], 0);
}

#[tokio::test]
async fn second_page_of_size_one() {
    let store = memory_store();
    seed_scenario(&store).await;

    let json = body_json(get(build_test_app(store), "/movies?page=2&limit=1").await).await;
    assert_eq!(json["movies"].as_array().unwrap().len(), 1);
    assert_eq!(json["currentPage"], 2);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["totalCount"], 3);
    assert_eq!(titles(&json), vec!["Movie B"]);
}

#[tokio::test]
async fn default_limit_is_ten() {
    let store = memory_store();
    for i in 0..12 {
        common::create_movie(&store, &format!("Movie {i}"), "2020-01-01", 1.0, 1.0).await;
    }

    let json = body_json(get(build_test_app(store), "/movies").await).await;
    assert_eq!(json["movies"].as_array().unwrap().len(), 10);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["totalCount"], 12);
}

#[tokio::test]
async fn large_limit_is_honored() {
    let store = memory_store();
    let movies: Vec<NewMovie> = (0..150)
        .map(|i| NewMovie {
            movie_title: format!("Movie {i}"),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            production_budget: 1.0,
            domestic_gross: 1.0,
            worldwide_gross: 1.0,
        })
        .collect();
    store.create_many(&movies).await.unwrap();

    let json = body_json(get(build_test_app(store), "/movies?limit=200").await).await;
    assert_eq!(json["movies"].as_array().unwrap().len(), 150);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["totalCount"], 150);
}

#[tokio::test]
async fn title_sort_ignores_case() {
    let store = memory_store();
    common::create_movie(&store, "apple", "2020-01-01", 1.0, 1.0).await;
    common::create_movie(&store, "Banana", "2020-01-01", 1.0, 1.0).await;

    let json = body_json(get(build_test_app(store), "/movies?orderBy=movieTitle").await).await;
    assert_eq!(titles(&json), vec!["Banana", "apple"]);
}

#[tokio::test]
async fn trailing_slash_reaches_collection() {
    let store = memory_store();
    let response = post_json(
        build_test_app(store.clone()),
        "/movies/",
        json!({
            "releaseDate": "2020-01-01",
            "movieTitle": "Slashed",
            "domesticGross": 1,
            "worldwideGross": 1
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(build_test_app(store), "/movies/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), vec!["Slashed"]);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let store = memory_store();
    common::create_movie(&store, "The Godfather", "1972-03-24", 6e6, 250e6).await;
    common::create_movie(&store, "Goodfellas", "1990-09-19", 25e6, 46e6).await;

    let lower = body_json(get(build_test_app(store.clone()), "/movies?search=godfather").await).await;
    let upper = body_json(get(build_test_app(store), "/movies?search=GODFATHER").await).await;

    assert_eq!(titles(&lower), vec!["The Godfather"]);
    assert_eq!(lower, upper);
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let store = memory_store();
    common::create_movie(&store, "Before", "2020-08-31", 1.0, 1.0).await;
    common::create_movie(&store, "On Start", "2020-09-01", 1.0, 1.0).await;
    common::create_movie(&store, "On End", "2020-10-01", 1.0, 1.0).await;
    common::create_movie(&store, "After", "2020-10-02", 1.0, 1.0).await;

    let json = body_json(
        get(
            build_test_app(store),
            "/movies?startDate=9/1/2020&endDate=2020-10-01T00:00:00.000Z",
        )
        .await,
    )
    .await;
    assert_eq!(titles(&json), vec!["On Start", "On End"]);
}

#[tokio::test]
async fn budget_range_with_descending_sort() {
    let store = memory_store();
    seed_scenario(&store).await;

    let json = body_json(
        get(
            build_test_app(store),
            "/movies?minBudget=150&maxBudget=300&orderBy=Production%20Budget",
        )
        .await,
    )
    .await;
    assert_eq!(titles(&json), vec!["Movie B", "Movie C"]);
}

#[tokio::test]
async fn empty_parameters_are_ignored() {
    let store = memory_store();
    seed_scenario(&store).await;

    let json = body_json(
        get(
            build_test_app(store),
            "/movies?search=&startDate=&endDate=&minBudget=&maxBudget=&orderBy=",
        )
        .await,
    )
    .await;
    assert_eq!(json["totalCount"], 3);
    assert_eq!(titles(&json), vec!["Movie A", "Movie B", "Movie C"]);
}

#[tokio::test]
async fn invalid_parameters_return_400() {
    let store = memory_store();
    for uri in [
        "/movies?page=abc",
        "/movies?startDate=someday",
        "/movies?minBudget=cheap",
        "/movies?orderBy=rating",
    ] {
        let response = get(build_test_app(store.clone()), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn storage_failure_returns_generic_500() {
    let store = memory_store();
    seed_scenario(&store).await;
    store.close().await;

    let response = get(build_test_app(store), "/movies").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// POST /movies/import
// ---------------------------------------------------------------------------

#[tokio::test]
async fn legacy_import_normalizes_and_reports_skips() {
    let store = memory_store();
    let response = post_json(
        build_test_app(store.clone()),
        "/movies/import",
        json!([
            {
                "Release Date": "12/18/2009",
                "Movie Title": "Avatar",
                "Production Budget": "$425,000,000",
                "Domestic Gross": "$760,507,625",
                "Worldwide Gross": "$2,783,918,982"
            },
            {
                "Release Date": "",
                "Movie Title": "Undated",
                "Domestic Gross": 0,
                "Worldwide Gross": 0
            },
            {
                "Release Date": "1/1/2000",
                "Domestic Gross": 0,
                "Worldwide Gross": 0
            }
        ]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["imported"], 2);
    assert_eq!(
        json["skipped"],
        json!([{"index": 2, "reason": "Movie Title is required"}])
    );

    let listed = body_json(get(build_test_app(store.clone()), "/movies").await).await;
    assert_eq!(listed["movies"][0]["releaseDate"], "2009-12-18");
    assert_eq!(listed["movies"][1]["releaseDate"], serde_json::Value::Null);

    // The undated record never forms a year bucket.
    let releases =
        body_json(get(build_test_app(store), "/movies/releases-per-year").await).await;
    assert_eq!(releases, json!([{"_id": 2009, "numberOfReleases": 1}]));
}
