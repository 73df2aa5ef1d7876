use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;

use super::*;
use crate::HomeAway;

fn news_body() -> serde_json::Value {
    json!({
        "articles": [{
            "headline": "Celtics clinch top seed",
            "description": "Boston wraps up the East.",
            "links": { "web": { "href": "https://example.com/celtics" } },
            "images": [{ "url": "https://example.com/celtics.jpg", "caption": "TD Garden" }],
        }],
    })
}

fn scoreboard_body() -> serde_json::Value {
    json!({
        "events": [{
            "id": "401585601",
            "name": "Denver Nuggets at Boston Celtics",
            "shortName": "DEN @ BOS",
            "competitions": [{
                "competitors": [
                    {
                        "id": "2",
                        "homeAway": "home",
                        "score": "110",
                        "team": {
                            "location": "Boston",
                            "name": "Celtics",
                            "abbreviation": "BOS",
                            "displayName": "Boston Celtics",
                            "logo": "https://example.com/bos.png",
                        },
                    },
                    {
                        "id": "7",
                        "homeAway": "away",
                        "score": "107",
                        "team": {
                            "location": "Denver",
                            "name": "Nuggets",
                            "abbreviation": "DEN",
                            "displayName": "Denver Nuggets",
                            "logo": "https://example.com/den.png",
                        },
                    },
                ],
            }],
        }],
    })
}

#[test]
fn test_scoreboard_date_is_zero_padded() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(scoreboard_date(date), "20240305");

    let date = NaiveDate::from_ymd_opt(987, 12, 31).unwrap();
    assert_eq!(scoreboard_date(date), "09871231");
}

#[tokio::test]
async fn test_news_parses_valid_response() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/news");
            then.status(200).json_body(news_body());
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    let news = client.news().await.unwrap();

    mock.assert_async().await;
    assert_eq!(news.articles.len(), 1);
    assert_eq!(news.articles[0].headline, "Celtics clinch top seed");
    assert_eq!(
        news.articles[0].links.web.href,
        "https://example.com/celtics"
    );
}

#[tokio::test]
async fn test_news_ignores_unknown_fields() {
    let server = MockServer::start_async().await;
    let mut body = news_body();
    body["header"] = json!("nba news");
    body["articles"][0]["premium"] = json!(false);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/news");
            then.status(200).json_body(body);
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    assert!(client.news().await.is_ok());
}

#[tokio::test]
async fn test_news_rejects_missing_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/news");
            then.status(200)
                .json_body(json!({ "articles": [{ "headline": "no description" }] }));
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    assert!(matches!(client.news().await, Err(Error::Schema(_))));
}

#[tokio::test]
async fn test_scoreboard_formats_date_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/scoreboard")
                .query_param("dates", "20240305");
            then.status(200).json_body(scoreboard_body());
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let scoreboard = client.scoreboard(date).await.unwrap();

    mock.assert_async().await;
    assert_eq!(scoreboard.events.len(), 1);

    let competitors = &scoreboard.events[0].competitions[0].competitors;
    assert_eq!(competitors[0].home_away, HomeAway::Home);
    assert_eq!(competitors[0].score, "110");
    assert_eq!(competitors[1].team.display_name, "Denver Nuggets");
}

#[tokio::test]
async fn test_scoreboard_rejects_unknown_home_away() {
    let server = MockServer::start_async().await;
    let mut body = scoreboard_body();
    body["events"][0]["competitions"][0]["competitors"][0]["homeAway"] = json!("neutral");

    server
        .mock_async(|when, then| {
            when.method(GET).path("/scoreboard");
            then.status(200).json_body(body);
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert!(matches!(
        client.scoreboard(date).await,
        Err(Error::Schema(_))
    ));
}

#[tokio::test]
async fn test_upstream_error_status_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/news");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let client = Client::with_base_url(server.base_url()).unwrap();
    assert!(matches!(
        client.news().await,
        Err(Error::Api { status: 503, .. })
    ));
}
