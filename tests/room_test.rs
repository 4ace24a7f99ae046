mod common;

use common::setup;
use liftdesk::{
    domain::{CreateRoomRequest, UpdateRoomRequest},
    error::AppError,
};
use uuid::Uuid;

#[tokio::test]
async fn room_crud_round_trip() -> anyhow::Result<()> {
    let ctx = setup().await?;

    let room = ctx
        .room_repo
        .create(CreateRoomRequest {
            name: "Studio A".to_string(),
            capacity: Some(20),
            location: Some("First floor".to_string()),
            description: None,
        })
        .await?;
    assert_eq!(room.name, "Studio A");
    assert_eq!(room.capacity, Some(20));

    ctx.room_repo
        .create(CreateRoomRequest {
            name: "Free Weights".to_string(),
            capacity: None,
            location: None,
            description: None,
        })
        .await?;

    // Alphabetical listing.
    let rooms = ctx.room_repo.list().await?;
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].name, "Free Weights");
    assert_eq!(rooms[1].name, "Studio A");

    // Partial update leaves untouched fields alone.
    let updated = ctx
        .room_repo
        .update(
            room.id,
            UpdateRoomRequest {
                capacity: Some(25),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "Studio A");
    assert_eq!(updated.capacity, Some(25));
    assert_eq!(updated.location.as_deref(), Some("First floor"));

    ctx.room_repo.delete(room.id).await?;
    assert!(ctx.room_repo.find_by_id(room.id).await?.is_none());
    assert_eq!(ctx.room_repo.list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn updating_a_missing_room_fails() -> anyhow::Result<()> {
    let ctx = setup().await?;

    let err = ctx
        .room_repo
        .update(
            Uuid::new_v4(),
            UpdateRoomRequest {
                name: Some("Ghost room".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}
