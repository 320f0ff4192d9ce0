use lyricsync_core::segments::Segment;
use lyricsync_db::models::video::CreateVideo;
use lyricsync_db::repositories::{SegmentRepo, VideoRepo};
use sqlx::PgPool;
use uuid::Uuid;

fn seg(id: i32, start_s: f64, end_s: f64, text: &str) -> Segment {
    Segment {
        id,
        start_s,
        end_s,
        text: text.into(),
    }
}

async fn create_video(pool: &PgPool, segments: &[Segment]) -> Uuid {
    let input = CreateVideo {
        id: Uuid::new_v4(),
        owner_key: "k".repeat(48),
        original_uri: "source.mp4".into(),
    };
    VideoRepo::create_with_segments(pool, &input, segments)
        .await
        .expect("video creation should succeed");
    input.id
}

#[sqlx::test(migrations = "./migrations")]
async fn list_returns_segments_sorted_by_start(pool: PgPool) {
    // Insert out of chronological order on purpose.
    let video_id = create_video(
        &pool,
        &[
            seg(0, 4.0, 5.0, "third"),
            seg(1, 0.0, 1.0, "first"),
            seg(2, 2.0, 3.0, "second"),
        ],
    )
    .await;

    let rows = SegmentRepo::list_by_video(&pool, video_id).await.unwrap();
    let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);

    // Sorted and disjoint: start < end and end <= next start.
    for pair in rows.windows(2) {
        assert!(pair[0].start_s < pair[0].end_s);
        assert!(pair[0].end_s <= pair[1].start_s);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_swaps_the_whole_set(pool: PgPool) {
    let video_id = create_video(&pool, &[seg(0, 0.0, 1.0, "old")]).await;

    SegmentRepo::replace_all(
        &pool,
        video_id,
        &[seg(0, 0.0, 2.0, "new a"), seg(1, 2.0, 4.0, "new b")],
    )
    .await
    .unwrap();

    let rows = SegmentRepo::list_by_video(&pool, video_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text, "new a");
    assert_eq!(rows[1].text, "new b");
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_with_empty_set_clears_segments(pool: PgPool) {
    let video_id = create_video(&pool, &[seg(0, 0.0, 1.0, "only")]).await;

    SegmentRepo::replace_all(&pool, video_id, &[]).await.unwrap();

    let rows = SegmentRepo::list_by_video(&pool, video_id).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_replace_leaves_prior_set_untouched(pool: PgPool) {
    let video_id = create_video(&pool, &[seg(0, 0.0, 1.0, "keep me")]).await;

    // The second row violates the end-after-start CHECK constraint, so the
    // whole transaction must roll back.
    let result = SegmentRepo::replace_all(
        &pool,
        video_id,
        &[seg(0, 0.0, 2.0, "half written"), seg(1, 5.0, 4.0, "bad")],
    )
    .await;
    assert!(result.is_err());

    let rows = SegmentRepo::list_by_video(&pool, video_id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text, "keep me");
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_for_unknown_video_is_row_not_found(pool: PgPool) {
    let result = SegmentRepo::replace_all(&pool, Uuid::new_v4(), &[seg(0, 0.0, 1.0, "x")]).await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_segment_id_within_a_video_is_rejected(pool: PgPool) {
    let video_id = create_video(&pool, &[]).await;

    let result =
        SegmentRepo::replace_all(&pool, video_id, &[seg(7, 0.0, 1.0, "a"), seg(7, 2.0, 3.0, "b")])
            .await;
    assert!(result.is_err(), "composite primary key should reject this");
}

#[sqlx::test(migrations = "./migrations")]
async fn same_segment_id_is_fine_across_videos(pool: PgPool) {
    let a = create_video(&pool, &[seg(0, 0.0, 1.0, "video a")]).await;
    let b = create_video(&pool, &[seg(0, 0.0, 1.0, "video b")]).await;

    assert_eq!(SegmentRepo::list_by_video(&pool, a).await.unwrap().len(), 1);
    assert_eq!(SegmentRepo::list_by_video(&pool, b).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_video_create_rolls_back_segments(pool: PgPool) {
    let input = CreateVideo {
        id: Uuid::new_v4(),
        owner_key: "k".repeat(48),
        original_uri: "source.mp4".into(),
    };
    // Violating segment aborts the transaction; the video row must go too.
    let result =
        VideoRepo::create_with_segments(&pool, &input, &[seg(0, -1.0, 1.0, "negative")]).await;
    assert!(result.is_err());

    let video = VideoRepo::find_by_id(&pool, input.id).await.unwrap();
    assert!(video.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_segments(pool: PgPool) {
    let video_id = create_video(&pool, &[seg(0, 0.0, 1.0, "gone soon")]).await;

    assert!(VideoRepo::delete(&pool, video_id).await.unwrap());
    let rows = SegmentRepo::list_by_video(&pool, video_id).await.unwrap();
    assert!(rows.is_empty());
}
