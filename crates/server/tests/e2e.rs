mod support;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use support::{offline, start_server, stub};

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn e2e_catalog_flow() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();

    let res = c.post(format!("{}/api/categories", app.base_url))
        .json(&json!({"name": "Food", "slug": "food", "sort_order": 2}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let food: Value = res.json().await?;
    assert_eq!(food["sortOrder"], 2);

    let res = c.post(format!("{}/api/categories", app.base_url))
        .json(&json!({"name": "Food again", "slug": "food"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.post(format!("{}/api/categories", app.base_url))
        .json(&json!({"slug": "shops"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "name is required");

    let res = c.post(format!("{}/api/services", app.base_url))
        .json(&json!({"name": "Margherita", "price_cents": 900, "kind": "food", "category_id": food["id"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let pizza: Value = res.json().await?;
    c.post(format!("{}/api/services", app.base_url))
        .json(&json!({"name": "Phone case", "price_cents": 1500}))
        .send().await?
        .error_for_status()?;

    let list: Vec<Value> = c.get(format!("{}/api/services?kind=food", app.base_url)).send().await?.json().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["priceCents"], 900);

    let res = c.get(format!("{}/api/services?kind=boats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.get(format!("{}/api/services/{}", app.base_url, pizza["id"].as_str().unwrap())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/api/services/{}", app.base_url, Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let cats: Vec<Value> = c.get(format!("{}/api/categories", app.base_url)).send().await?.json().await?;
    assert_eq!(cats.len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_posts_and_feed() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();

    let res = c.post(format!("{}/api/posts", app.base_url))
        .json(&json!({"user_id": author}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err: Value = res.json().await?;
    assert_eq!(err["error"], "content is required");

    let res = c.post(format!("{}/api/posts", app.base_url))
        .json(&json!({"user_id": author, "content": "New bakery in town", "tags": ["#Food", "food", "bread"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let first: Value = res.json().await?;
    assert_eq!(first["tags"], json!(["bread", "food"]));
    let first_id = first["id"].as_str().unwrap().to_string();

    let second: Value = c.post(format!("{}/api/posts", app.base_url))
        .json(&json!({"user_id": author, "content": "Second post"}))
        .send().await?
        .json().await?;
    let second_id = second["id"].as_str().unwrap().to_string();

    // comments and tags
    let res = c.post(format!("{}/api/posts/{}/comments", app.base_url, first_id))
        .json(&json!({"user_id": fan, "body": "Looks great"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let res = c.post(format!("{}/api/posts/{}/tags", app.base_url, first_id))
        .json(&json!({"tag": "Pastry"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let tags: Vec<String> = res.json().await?;
    assert_eq!(tags, vec!["bread", "food", "pastry"]);
    let res = c.delete(format!("{}/api/posts/{}/tags/bread", app.base_url, first_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    // recommending twice is idempotent
    for _ in 0..2 {
        let res = c.post(format!("{}/api/posts/{}/recommendations", app.base_url, first_id))
            .json(&json!({"user_id": fan}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }
    let recs: Vec<Value> = c.get(format!("{}/api/posts/{}/recommendations", app.base_url, first_id)).send().await?.json().await?;
    assert_eq!(recs.len(), 1);

    let ranked: Vec<Value> = c.get(format!("{}/api/feed/recommended?limit=5", app.base_url)).send().await?.json().await?;
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0]["id"], first_id.as_str());
    assert_eq!(ranked[0]["rank"], 1);
    assert_eq!(ranked[0]["recommendationCount"], 1);
    assert_eq!(ranked[0]["commentCount"], 1);

    let feed: Vec<Value> = c.get(format!("{}/api/feed?per_page=1", app.base_url)).send().await?.json().await?;
    assert_eq!(feed.len(), 1);

    let res = c.put(format!("{}/api/posts/{}", app.base_url, second_id))
        .json(&json!({"location": "Harbor"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["location"], "Harbor");
    assert_eq!(updated["content"], "Second post");

    let res = c.delete(format!("{}/api/posts/{}/recommendations/{}", app.base_url, first_id, fan)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/api/posts/{}", app.base_url, first_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/api/posts/{}", app.base_url, first_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.get(format!("{}/api/posts/{}/comments", app.base_url, first_id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let mine: Vec<Value> = c.get(format!("{}/api/posts?user_id={}", app.base_url, author)).send().await?.json().await?;
    assert_eq!(mine.len(), 1);
    Ok(())
}

#[tokio::test]
async fn e2e_profiles_and_skillsets() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();
    let owner = Uuid::new_v4();

    let res = c.post(format!("{}/api/profiles", app.base_url))
        .json(&json!({"owner_id": owner, "business_name": "Corner Cafe", "category": "food", "rating": 4.5}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let cafe: Value = res.json().await?;
    let cafe_url = format!("{}/api/profiles/{}", app.base_url, cafe["id"].as_str().unwrap());

    let res = c.post(format!("{}/api/profiles", app.base_url))
        .json(&json!({"owner_id": owner, "business_name": "Bad", "rating": 9}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.put(&cafe_url).json(&json!({"address": "1 Main St"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["address"], "1 Main St");
    assert_eq!(body["businessName"], "Corner Cafe");

    let list: Vec<Value> = c.get(format!("{}/api/profiles?owner_id={}", app.base_url, owner)).send().await?.json().await?;
    assert_eq!(list.len(), 1);
    assert_eq!(c.delete(&cafe_url).send().await?.status(), HttpStatusCode::NO_CONTENT);
    assert_eq!(c.get(&cafe_url).send().await?.status(), HttpStatusCode::NOT_FOUND);

    // skillset upsert keyed by user
    let pro = Uuid::new_v4();
    let res = c.post(format!("{}/api/skillset-profiles", app.base_url))
        .json(&json!({"user_id": pro, "full_name": "Dana Lee", "skills": ["Plumbing", "Tiling"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Value = res.json().await?;
    let res = c.post(format!("{}/api/skillset-profiles", app.base_url))
        .json(&json!({"user_id": pro, "headline": "Fast and tidy"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated: Value = res.json().await?;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["fullName"], "Dana Lee");

    let by_user: Value = c.get(format!("{}/api/skillset-profiles/by-user/{}", app.base_url, pro)).send().await?.json().await?;
    assert_eq!(by_user["headline"], "Fast and tidy");
    let found: Vec<Value> = c.get(format!("{}/api/skillset-profiles?skill=plumbing", app.base_url)).send().await?.json().await?;
    assert_eq!(found.len(), 1);
    let res = c.get(format!("{}/api/skillset-profiles/by-user/{}", app.base_url, Uuid::new_v4())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_vehicles() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();
    let user = Uuid::new_v4();

    let res = c.get(format!("{}/api/vehicles", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let first: Value = c.post(format!("{}/api/vehicles", app.base_url))
        .json(&json!({"user_id": user, "make": "Toyota", "model": "Corolla", "year": 2018}))
        .send().await?
        .json().await?;
    assert_eq!(first["isPrimary"], true);

    let res = c.post(format!("{}/api/vehicles", app.base_url))
        .json(&json!({"user_id": user, "make": "Honda", "model": "Fit", "year": 2020, "is_primary": true}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(format!("{}/api/vehicles", app.base_url))
        .json(&json!({"user_id": user, "make": "Ford", "model": "T", "year": 1700}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let list: Vec<Value> = c.get(format!("{}/api/vehicles?user_id={}", app.base_url, user)).send().await?.json().await?;
    assert_eq!(list.len(), 2);
    let primaries = list.iter().filter(|v| v["isPrimary"] == true).count();
    assert_eq!(primaries, 1);
    let first_now: Value = c.get(format!("{}/api/vehicles/{}", app.base_url, first["id"].as_str().unwrap())).send().await?.json().await?;
    assert_eq!(first_now["isPrimary"], false);
    Ok(())
}

#[tokio::test]
async fn e2e_carts() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();
    let user = Uuid::new_v4();

    let res = c.get(format!("{}/api/carts/boats?user_id={}", app.base_url, user)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let pizza: Value = c.post(format!("{}/api/services", app.base_url))
        .json(&json!({"name": "Pizza", "price_cents": 1000, "kind": "food"}))
        .send().await?
        .json().await?;

    for _ in 0..2 {
        let res = c.post(format!("{}/api/carts/food/items", app.base_url))
            .json(&json!({"user_id": user, "service_id": pizza["id"], "quantity": 2}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }
    let cart: Value = c.post(format!("{}/api/carts/food/items", app.base_url))
        .json(&json!({"user_id": user, "name": "Soda", "unit_price_cents": 250}))
        .send().await?
        .json().await?;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["itemCount"], 5);
    assert_eq!(cart["subtotalCents"], 4250);

    // food service cannot go in the shop cart
    let res = c.post(format!("{}/api/carts/shop/items", app.base_url))
        .json(&json!({"user_id": user, "service_id": pizza["id"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let soda_id = cart["items"].as_array().unwrap().iter()
        .find(|l| l["name"] == "Soda")
        .and_then(|l| l["id"].as_str())
        .unwrap()
        .to_string();
    let cart: Value = c.patch(format!("{}/api/carts/food/items/{}", app.base_url, soda_id))
        .json(&json!({"quantity": 0}))
        .send().await?
        .json().await?;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["subtotalCents"], 4000);

    let res = c.delete(format!("{}/api/carts/food?user_id={}", app.base_url, user)).send().await?;
    let cleared: Value = res.json().await?;
    assert_eq!(cleared["removed"], 1);
    let empty: Value = c.get(format!("{}/api/carts/food?user_id={}", app.base_url, user)).send().await?.json().await?;
    assert_eq!(empty["itemCount"], 0);
    Ok(())
}

#[tokio::test]
async fn e2e_search() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();

    c.post(format!("{}/api/posts", app.base_url))
        .json(&json!({"user_id": Uuid::new_v4(), "content": "Best PIZZA downtown"}))
        .send().await?
        .error_for_status()?;
    c.post(format!("{}/api/services", app.base_url))
        .json(&json!({"name": "Pizza slice", "price_cents": 300, "kind": "food"}))
        .send().await?
        .error_for_status()?;

    let res = c.get(format!("{}/api/search?q=%20%20", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let all: Value = c.get(format!("{}/api/search?q=pizza", app.base_url)).send().await?.json().await?;
    assert_eq!(all["posts"].as_array().unwrap().len(), 1);
    assert_eq!(all["services"].as_array().unwrap().len(), 1);

    let only_posts: Value = c.get(format!("{}/api/search?q=pizza&scope=posts", app.base_url)).send().await?.json().await?;
    assert_eq!(only_posts["posts"].as_array().unwrap().len(), 1);
    assert!(only_posts["services"].as_array().unwrap().is_empty());

    let res = c.get(format!("{}/api/search?q=pizza&scope=planets", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_uploads() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();

    let part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("avatar.png")
        .mime_str("image/png")?;
    let form = reqwest::multipart::Form::new().part("file", part).text("folder", "Avatars");
    let res = c.post(format!("{}/api/uploads", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let out: Value = res.json().await?;
    let key = out["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("avatars/") && key.ends_with(".png"));
    assert_eq!(out["url"], format!("/storage/{key}"));
    assert_eq!(out["size"], 4);
    assert_eq!(out["content_type"], "image/png");

    let served = c.get(format!("{}/storage/{}", app.base_url, key)).send().await?;
    assert_eq!(served.status(), HttpStatusCode::OK);
    assert_eq!(served.bytes().await?.as_ref(), &[0x89, b'P', b'N', b'G']);

    let res = c.delete(format!("{}/api/uploads/{}", app.base_url, key)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/api/uploads/{}", app.base_url, key)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // oversized
    let big = reqwest::multipart::Part::bytes(vec![0u8; 5 * 1024 * 1024 + 1])
        .file_name("big.png")
        .mime_str("image/png")?;
    let res = c.post(format!("{}/api/uploads", app.base_url))
        .multipart(reqwest::multipart::Form::new().part("file", big))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // wrong type
    let pdf = reqwest::multipart::Part::bytes(b"%PDF".to_vec())
        .file_name("doc.pdf")
        .mime_str("application/pdf")?;
    let res = c.post(format!("{}/api/uploads", app.base_url))
        .multipart(reqwest::multipart::Form::new().part("file", pdf))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // no file part
    let res = c.post(format!("{}/api/uploads", app.base_url))
        .multipart(reqwest::multipart::Form::new().text("folder", "x"))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_ai_with_model() -> anyhow::Result<()> {
    let app = start_server(stub("{\"suggestions\": [\"pizza\", \"Pizza\", \"pasta\"]}")).await?;
    let c = client();

    let res = c.post(format!("{}/api/ai/search-suggestions", app.base_url))
        .json(&json!({"query": "italian"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["suggestions"], json!(["pizza", "pasta"]));

    let res = c.post(format!("{}/api/ai/ask", app.base_url)).json(&json!({"question": " "})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_ai_fallbacks() -> anyhow::Result<()> {
    let app = start_server(offline()).await?;
    let c = client();

    let res = c.post(format!("{}/api/ai/ask", app.base_url))
        .json(&json!({"question": "Where can I get tacos?"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["answer"], service::ai::assist::ASK_FALLBACK);

    let body: Value = c.post(format!("{}/api/ai/search-suggestions", app.base_url))
        .json(&json!({"query": "tacos"}))
        .send().await?
        .json().await?;
    assert_eq!(body["suggestions"], json!(["tacos"]));
    Ok(())
}
