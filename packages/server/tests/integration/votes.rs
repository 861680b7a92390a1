use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use server::entity::vote;

use crate::common::{TestApp, concurrent_statuses, routes};

/// A contestant with one photo and a judge, with the contest in JUDGING.
async fn judging_setup(app: &TestApp) -> (String, i32) {
    let contestant = app.create_user_with_role("Ana", "contestant").await;
    let photo_id = app.create_photo(&contestant, "Puerto").await;
    let judge = app.create_user_with_role("Jueza", "judge").await;
    app.set_phase("JUDGING").await;
    (judge, photo_id)
}

#[tokio::test]
async fn judge_casts_a_vote_and_the_counter_follows() {
    let app = TestApp::spawn().await;
    let (judge, photo_id) = judging_setup(&app).await;

    let res = app
        .post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &judge)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["photo_id"], photo_id);
    assert_eq!(app.vote_count(photo_id).await, 1);

    let me = app.get_with_token(routes::ME, &judge).await;
    assert_eq!(me.body["vote"]["photo_id"], photo_id);
}

#[tokio::test]
async fn second_vote_is_rejected_without_touching_counters() {
    let app = TestApp::spawn().await;
    let ana = app.create_user_with_role("Ana", "contestant").await;
    let beto = app.create_user_with_role("Beto", "contestant").await;
    let photo_id = app.create_photo(&ana, "Puerto").await;
    let other_photo = app.create_photo(&beto, "Muelle").await;
    let judge = app.create_user_with_role("Jueza", "judge").await;
    app.set_phase("JUDGING").await;

    let first = app
        .post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &judge)
        .await;
    assert_eq!(first.status, 200, "{}", first.text);

    let res = app
        .post_with_token(routes::VOTES, &json!({"photo_id": other_photo}), &judge)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "ALREADY_VOTED");
    assert_eq!(app.vote_count(photo_id).await, 1);
    assert_eq!(app.vote_count(other_photo).await, 0);
}

#[tokio::test]
async fn retract_then_vote_again_moves_the_vote() {
    let app = TestApp::spawn().await;
    let (judge, photo_id) = judging_setup(&app).await;
    app.post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &judge)
        .await;

    let res = app.delete_with_token(routes::VOTES, &judge).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(app.vote_count(photo_id).await, 0);

    let again = app
        .post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &judge)
        .await;
    assert_eq!(again.status, 200, "{}", again.text);
    assert_eq!(app.vote_count(photo_id).await, 1);
}

#[tokio::test]
async fn retract_without_a_vote_is_404() {
    let app = TestApp::spawn().await;
    let (judge, _) = judging_setup(&app).await;

    let res = app.delete_with_token(routes::VOTES, &judge).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn voting_for_a_missing_photo_is_404_and_records_nothing() {
    let app = TestApp::spawn().await;
    let (judge, _) = judging_setup(&app).await;

    let res = app
        .post_with_token(routes::VOTES, &json!({"photo_id": 424242}), &judge)
        .await;

    assert_eq!(res.status, 404);
    let me = app.get_with_token(routes::ME, &judge).await;
    assert!(me.body["vote"].is_null());
}

#[tokio::test]
async fn voting_is_closed_outside_judging() {
    let app = TestApp::spawn().await;
    let contestant = app.create_user_with_role("Ana", "contestant").await;
    let photo_id = app.create_photo(&contestant, "Puerto").await;
    let judge = app.create_user_with_role("Jueza", "judge").await;

    let early = app
        .post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &judge)
        .await;
    assert_eq!(early.status, 400);
    assert_eq!(early.body["code"], "PHASE_CLOSED");

    app.set_phase("RESULTS").await;
    let late = app.delete_with_token(routes::VOTES, &judge).await;
    assert_eq!(late.status, 400);
    assert_eq!(late.body["code"], "PHASE_CLOSED");
}

#[tokio::test]
async fn contestants_cannot_vote() {
    let app = TestApp::spawn().await;
    let contestant = app.create_user_with_role("Ana", "contestant").await;
    let photo_id = app.create_photo(&contestant, "Puerto").await;
    app.set_phase("JUDGING").await;

    let res = app
        .post_with_token(routes::VOTES, &json!({"photo_id": photo_id}), &contestant)
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
    assert_eq!(app.vote_count(photo_id).await, 0);
}

#[tokio::test]
async fn concurrent_votes_from_one_judge_count_once() {
    let app = TestApp::spawn().await;
    let (judge, photo_id) = judging_setup(&app).await;

    let attempts = (0..5).map(|_| {
        app.client
            .post(app.url(routes::VOTES))
            .header("Authorization", format!("Bearer {judge}"))
            .json(&json!({"photo_id": photo_id}))
            .send()
    });
    let statuses: Vec<u16> = concurrent_statuses(attempts).await;

    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1, "{statuses:?}");
    assert_eq!(app.vote_count(photo_id).await, 1);
}

#[tokio::test]
async fn concurrent_votes_from_many_judges_are_all_counted() {
    let app = TestApp::spawn().await;
    let contestant = app.create_user_with_role("Ana", "contestant").await;
    let photo_id = app.create_photo(&contestant, "Puerto").await;
    let mut judges = Vec::new();
    for i in 0..8 {
        judges.push(app.create_user_with_role(&format!("Juez{i}"), "judge").await);
    }
    app.set_phase("JUDGING").await;

    let ballots = judges.iter().map(|judge| {
        app.client
            .post(app.url(routes::VOTES))
            .header("Authorization", format!("Bearer {judge}"))
            .json(&json!({"photo_id": photo_id}))
            .send()
    });
    let statuses = concurrent_statuses(ballots).await;

    assert!(statuses.iter().all(|s| *s == 200), "{statuses:?}");
    assert_eq!(app.vote_count(photo_id).await, 8);
    let rows = vote::Entity::find()
        .filter(vote::Column::PhotoId.eq(photo_id))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(rows, 8);
}
