//! Behavior every `PlanRepository` implementation must share.
//!
//! Each check uses a fresh company id so it can run against a shared
//! database without cleanup.

use std::time::Duration;

use madori_core::{Error, PlanRepository, UpdatePlanRequest};
use madori_db::test_fixtures::new_plan;
use uuid::Uuid;

pub async fn insert_fetch_list(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();

    let first = repo
        .insert(new_plan(company, "28坪_2LDK_平屋_北_45坪.pdf"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = repo
        .insert(new_plan(company, "32.5坪_3LDK_2階建て_南_50坪_吹き抜け-WIC.pdf"))
        .await
        .unwrap();

    assert_eq!(second.title, "32.5坪 3LDK 2階建て 南道路");
    assert_eq!(second.features, vec!["吹き抜け", "WIC"]);
    assert_eq!(second.version, 1);
    assert!(!second.favorite);

    let fetched = repo.fetch(company, first.id).await.unwrap();
    assert_eq!(fetched.id, first.id);
    assert_eq!(fetched.title, "28坪 2LDK 平屋 北道路");

    let listed = repo.list(company).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

pub async fn duplicate_insert_conflicts(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = new_plan(company, "28坪_2LDK_平屋_北_45坪.pdf");
    repo.insert(plan.clone()).await.unwrap();

    let err = repo.insert(plan).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
}

pub async fn other_company_is_not_found(repo: &dyn PlanRepository) {
    let owner = Uuid::now_v7();
    let intruder = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(owner, "28坪_2LDK_平屋_北_45坪.pdf"))
        .await
        .unwrap();

    assert!(matches!(
        repo.fetch(intruder, plan.id).await,
        Err(Error::PlanNotFound(id)) if id == plan.id
    ));
    assert!(repo.list(intruder).await.unwrap().is_empty());
    assert!(repo.toggle_favorite(intruder, plan.id).await.is_err());
    assert!(repo.delete(intruder, plan.id).await.is_err());
    assert!(repo
        .update(intruder, plan.id, UpdatePlanRequest::default())
        .await
        .is_err());

    // untouched for the owner
    let owned = repo.fetch(owner, plan.id).await.unwrap();
    assert_eq!(owned.version, 1);
    assert!(!owned.favorite);
}

pub async fn update_regenerates_title(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(company, "32.5坪_3LDK_2階建て_南_50坪.pdf"))
        .await
        .unwrap();

    let updated = repo
        .update(
            company,
            plan.id,
            UpdatePlanRequest {
                layout: Some("4LDK".to_string()),
                direction: Some("南東".to_string()),
                version: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.layout, "4LDK");
    assert_eq!(updated.title, "32.5坪 4LDK 2階建て 南東道路");
    assert_eq!(updated.version, 2);
    assert_eq!(repo.fetch(company, plan.id).await.unwrap(), updated);
}

pub async fn stale_version_conflicts(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(company, "32.5坪_3LDK_2階建て_南_50坪.pdf"))
        .await
        .unwrap();
    repo.toggle_favorite(company, plan.id).await.unwrap();

    let err = repo
        .update(
            company,
            plan.id,
            UpdatePlanRequest {
                layout: Some("5LDK".to_string()),
                version: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);
    assert_eq!(repo.fetch(company, plan.id).await.unwrap().layout, "3LDK");
}

pub async fn invalid_update_is_rejected(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(company, "32.5坪_3LDK_2階建て_南_50坪.pdf"))
        .await
        .unwrap();

    let err = repo
        .update(
            company,
            plan.id,
            UpdatePlanRequest {
                floors: Some("4階建て".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)), "got {:?}", err);

    let stored = repo.fetch(company, plan.id).await.unwrap();
    assert_eq!(stored.floors, "2階建て");
    assert_eq!(stored.version, 1);
}

pub async fn toggle_favorite_flips(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(company, "28坪_2LDK_平屋_北_45坪.pdf"))
        .await
        .unwrap();

    let on = repo.toggle_favorite(company, plan.id).await.unwrap();
    assert!(on.favorite);
    assert_eq!(on.version, 2);

    let off = repo.toggle_favorite(company, plan.id).await.unwrap();
    assert!(!off.favorite);
    assert_eq!(off.version, 3);
}

pub async fn delete_removes(repo: &dyn PlanRepository) {
    let company = Uuid::now_v7();
    let plan = repo
        .insert(new_plan(company, "28坪_2LDK_平屋_北_45坪.pdf"))
        .await
        .unwrap();

    let removed = repo.delete(company, plan.id).await.unwrap();
    assert_eq!(removed.id, plan.id);
    assert!(matches!(
        repo.fetch(company, plan.id).await,
        Err(Error::PlanNotFound(_))
    ));
    assert!(matches!(
        repo.delete(company, plan.id).await,
        Err(Error::PlanNotFound(_))
    ));
}
