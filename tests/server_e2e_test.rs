use std::sync::Arc;

use recipes_api::{MemoryRecipeRepository, Recipe, RecipeServer, RecipeService, TagMatch};
use reqwest::StatusCode;
use serde_json::json;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_end_to_end_over_tcp() {
    let service = RecipeService::new(Arc::new(MemoryRecipeRepository::new(TagMatch::CaseInsensitive)));
    let server = RecipeServer::bind("127.0.0.1:0".parse().unwrap(), service)
        .await
        .unwrap();
    let base = format!("http://{}", server.local_addr().unwrap());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/recipes"))
        .json(&json!({
            "name": "Tea",
            "tags": ["drink", "hot"],
            "ingredients": ["water", "tea leaves"],
            "instructions": ["Boil water", "Steep leaves"]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Recipe = response.json().await.unwrap();

    let response = client
        .get(format!("{base}/recipes/search"))
        .query(&[("tag", "HOT")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found: Vec<Recipe> = response.json().await.unwrap();
    assert_eq!(found, vec![created.clone()]);

    let response = client
        .delete(format!("{base}/recipes/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{base}/recipes/{}", created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
