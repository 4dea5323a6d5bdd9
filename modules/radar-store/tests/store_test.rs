//! Integration tests for RadarStore.
//! Everything runs against an in-memory SQLite database, so no external
//! services are needed.

use chrono::{Duration, Utc};
use radar_common::{NewVenue, Region, ScoreUpdate, Signal, SignalSource};
use radar_store::RadarStore;
use uuid::Uuid;

async fn test_store() -> RadarStore {
    RadarStore::connect("sqlite::memory:")
        .await
        .expect("in-memory store should open")
}

fn shawarma_hazan() -> NewVenue {
    NewVenue {
        place_ref: "place-hazan-haifa".to_string(),
        name: "שווארמה חזן".to_string(),
        city: "חיפה".to_string(),
        region: Region::North,
        address: Some("שדרות העצמאות 32, חיפה".to_string()),
    }
}

fn venue_in(region: Region, place_ref: &str, name: &str) -> NewVenue {
    NewVenue {
        place_ref: place_ref.to_string(),
        name: name.to_string(),
        city: "עיר".to_string(),
        region,
        address: None,
    }
}

fn signal_for(venue_id: Uuid, content: &str) -> Signal {
    Signal {
        id: Uuid::new_v4(),
        venue_id,
        source: SignalSource::Google,
        content: content.to_string(),
        url: None,
        sentiment: 0.8,
        weight: 1.0,
        published_at: Utc::now() - Duration::days(2),
        created_at: Utc::now(),
    }
}

// =========================================================================
// Venue get-or-create
// =========================================================================

#[tokio::test]
async fn get_or_create_is_idempotent_per_place_ref() {
    let store = test_store().await;

    let first = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    // Second call with different defaults must return the original row
    // untouched.
    let mut renamed = shawarma_hazan();
    renamed.name = "שם אחר לגמרי".to_string();
    let second = store.get_or_create_venue(&renamed).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "שווארמה חזן");
}

#[tokio::test]
async fn new_venue_starts_with_default_scores() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    assert_eq!(venue.composite_score, 0.0);
    assert_eq!(venue.net_sentiment, 0.0);
    assert_eq!(venue.signal_count, 0);
    assert_eq!(venue.anchor_rating, None);
    assert_eq!(venue.anchor_rating_count, 0);
    assert!(venue.updated_at.is_none());
    assert_eq!(venue.region, Region::North);
}

#[tokio::test]
async fn find_venue_by_name_matches_substrings() {
    let store = test_store().await;
    store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    let hit = store.find_venue_by_name("חזן").await.unwrap();
    assert!(hit.is_some());

    let miss = store.find_venue_by_name("פלאפל הכרמל").await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn find_venue_by_name_takes_wildcards_literally() {
    let store = test_store().await;
    store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    // Scan queries arrive as raw user text. A stray LIKE metacharacter
    // must not turn the lookup into match-everything.
    assert!(store.find_venue_by_name("%").await.unwrap().is_none());
    assert!(store.find_venue_by_name("ח_ן").await.unwrap().is_none());

    // A name that genuinely contains a metacharacter stays findable.
    store
        .get_or_create_venue(&venue_in(Region::Center, "ref-humus", "חומוס 100% טבעי"))
        .await
        .unwrap();
    let hit = store.find_venue_by_name("100%").await.unwrap();
    assert_eq!(hit.unwrap().place_ref, "ref-humus");
}

// =========================================================================
// Signal insertion and dedup
// =========================================================================

#[tokio::test]
async fn duplicate_text_on_one_venue_is_written_once() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    let inserted = store
        .insert_signal(&signal_for(venue.id, "הכי טעים בעיר"))
        .await
        .unwrap();
    assert!(inserted);

    // Same text again, fresh id and even another source: the unique
    // constraint decides, not the caller.
    let mut dup = signal_for(venue.id, "הכי טעים בעיר");
    dup.source = SignalSource::Tiktok;
    let inserted_again = store.insert_signal(&dup).await.unwrap();
    assert!(!inserted_again);

    assert_eq!(store.signal_count(venue.id).await.unwrap(), 1);
}

#[tokio::test]
async fn same_text_is_allowed_on_different_venues() {
    let store = test_store().await;
    let a = store
        .get_or_create_venue(&venue_in(Region::North, "ref-a", "מסעדה א"))
        .await
        .unwrap();
    let b = store
        .get_or_create_venue(&venue_in(Region::South, "ref-b", "מסעדה ב"))
        .await
        .unwrap();

    assert!(store.insert_signal(&signal_for(a.id, "מומלץ!")).await.unwrap());
    assert!(store.insert_signal(&signal_for(b.id, "מומלץ!")).await.unwrap());
}

#[tokio::test]
async fn find_signal_is_exact_on_text() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();
    store
        .insert_signal(&signal_for(venue.id, "שווה את התור"))
        .await
        .unwrap();

    let found = store.find_signal(venue.id, "שווה את התור").await.unwrap();
    assert!(found.is_some());
    let signal = found.unwrap();
    assert_eq!(signal.venue_id, venue.id);
    assert_eq!(signal.sentiment, 0.8);

    let missing = store.find_signal(venue.id, "שווה את ה").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn signals_come_back_newest_first() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    let mut old = signal_for(venue.id, "ביקור ראשון");
    old.published_at = Utc::now() - Duration::days(30);
    let mut fresh = signal_for(venue.id, "ביקור שני");
    fresh.published_at = Utc::now() - Duration::hours(2);

    store.insert_signal(&old).await.unwrap();
    store.insert_signal(&fresh).await.unwrap();

    let signals = store.signals_for_venue(venue.id).await.unwrap();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].content, "ביקור שני");
    assert_eq!(signals[1].content, "ביקור ראשון");
}

// =========================================================================
// Score updates and ranking
// =========================================================================

#[tokio::test]
async fn score_update_persists_all_fields() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();

    store
        .update_venue_scores(
            venue.id,
            &ScoreUpdate {
                net_sentiment: 82.5,
                composite_score: 71.3,
                signal_count: 14,
                anchor_rating: Some(4.6),
                anchor_rating_count: 812,
            },
        )
        .await
        .unwrap();

    let reloaded = store
        .find_venue_by_place_ref(&venue.place_ref)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.net_sentiment, 82.5);
    assert_eq!(reloaded.composite_score, 71.3);
    assert_eq!(reloaded.signal_count, 14);
    assert_eq!(reloaded.anchor_rating, Some(4.6));
    assert_eq!(reloaded.anchor_rating_count, 812);
    assert!(reloaded.updated_at.is_some());
}

#[tokio::test]
async fn ranking_orders_by_composite_and_filters_by_region() {
    let store = test_store().await;

    for (region, place_ref, name, score) in [
        (Region::North, "ref-n1", "צפון חזק", 88.0),
        (Region::North, "ref-n2", "צפון בינוני", 55.0),
        (Region::Center, "ref-c1", "מרכז מוביל", 91.0),
    ] {
        let venue = store
            .get_or_create_venue(&venue_in(region, place_ref, name))
            .await
            .unwrap();
        store
            .update_venue_scores(
                venue.id,
                &ScoreUpdate {
                    net_sentiment: 50.0,
                    composite_score: score,
                    signal_count: 1,
                    anchor_rating: None,
                    anchor_rating_count: 0,
                },
            )
            .await
            .unwrap();
    }

    let all = store.ranked_venues(None, 10).await.unwrap();
    let names: Vec<&str> = all.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["מרכז מוביל", "צפון חזק", "צפון בינוני"]);

    let north = store.ranked_venues(Some(Region::North), 10).await.unwrap();
    assert_eq!(north.len(), 2);
    assert!(north.iter().all(|v| v.region == Region::North));

    let top_one = store.ranked_venues(None, 1).await.unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one[0].name, "מרכז מוביל");
}

#[tokio::test]
async fn list_venues_pages_in_creation_order() {
    let store = test_store().await;
    for i in 0..5 {
        store
            .get_or_create_venue(&venue_in(
                Region::Center,
                &format!("ref-{i}"),
                &format!("מקום {i}"),
            ))
            .await
            .unwrap();
    }

    let first_page = store.list_venues(2, 0).await.unwrap();
    assert_eq!(first_page.len(), 2);
    let second_page = store.list_venues(2, 2).await.unwrap();
    assert_eq!(second_page.len(), 2);
    assert_ne!(first_page[0].id, second_page[0].id);

    let tail = store.list_venues(10, 4).await.unwrap();
    assert_eq!(tail.len(), 1);
}

// =========================================================================
// Cascade behavior
// =========================================================================

#[tokio::test]
async fn deleting_a_venue_removes_its_signals() {
    let store = test_store().await;
    let venue = store.get_or_create_venue(&shawarma_hazan()).await.unwrap();
    store
        .insert_signal(&signal_for(venue.id, "יתום בקרוב"))
        .await
        .unwrap();
    assert_eq!(store.signal_count(venue.id).await.unwrap(), 1);

    store.delete_venue(venue.id).await.unwrap();

    assert_eq!(store.signal_count(venue.id).await.unwrap(), 0);
    let gone = store
        .find_venue_by_place_ref("place-hazan-haifa")
        .await
        .unwrap();
    assert!(gone.is_none());
}
