//! OpenAPI document. Request shapes are mirrored here as schema-only structs
//! so the service crate stays free of doc derives.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String, pub detail: Option<String> }

#[derive(ToSchema)]
pub struct NewCategoryDoc { pub name: String, pub slug: String, pub icon: Option<String>, pub sort_order: Option<i32> }

#[derive(ToSchema)]
pub struct NewServiceDoc {
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub image_url: Option<String>,
    /// shop | food
    pub kind: Option<String>,
}

#[derive(ToSchema)]
pub struct NewPostDoc {
    pub user_id: Uuid,
    pub content: String,
    pub media_url: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct PostUpdateDoc { pub content: Option<String>, pub media_url: Option<String>, pub location: Option<String> }

#[derive(ToSchema)]
pub struct TagDoc { pub tag: String }

#[derive(ToSchema)]
pub struct NewCommentDoc { pub user_id: Uuid, pub body: String }

#[derive(ToSchema)]
pub struct RecommendDoc { pub user_id: Uuid }

#[derive(ToSchema)]
pub struct BusinessProfileDoc {
    pub owner_id: Uuid,
    pub business_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
}

#[derive(ToSchema)]
pub struct SkillsetDoc {
    pub user_id: Uuid,
    pub full_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub portfolio_urls: Option<Vec<String>>,
    pub hourly_rate_cents: Option<i64>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
}

#[derive(ToSchema)]
pub struct VehicleDoc {
    pub user_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub license_plate: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(ToSchema)]
pub struct AddCartItemDoc {
    pub user_id: Uuid,
    pub service_id: Option<Uuid>,
    pub name: Option<String>,
    pub unit_price_cents: Option<i64>,
    pub quantity: Option<i32>,
}

#[derive(ToSchema)]
pub struct QuantityDoc { pub quantity: i32 }

#[derive(ToSchema)]
pub struct UploadFormDoc {
    #[schema(format = Binary)]
    pub file: String,
    pub folder: Option<String>,
}

#[derive(ToSchema)]
pub struct UploadedDoc { pub key: String, pub url: String, pub size: u64, pub content_type: String }

#[derive(ToSchema)]
pub struct AskDoc { pub question: String }

#[derive(ToSchema)]
pub struct SuggestDoc { pub query: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::create_category,
        crate::routes::catalog::list_services,
        crate::routes::catalog::get_service,
        crate::routes::catalog::create_service,
        crate::routes::posts::list_posts,
        crate::routes::posts::create_post,
        crate::routes::posts::get_post,
        crate::routes::posts::update_post,
        crate::routes::posts::delete_post,
        crate::routes::posts::list_tags,
        crate::routes::posts::add_tag,
        crate::routes::posts::remove_tag,
        crate::routes::posts::list_comments,
        crate::routes::posts::add_comment,
        crate::routes::posts::list_recommendations,
        crate::routes::posts::recommend,
        crate::routes::posts::unrecommend,
        crate::routes::posts::feed,
        crate::routes::posts::recommended,
        crate::routes::profiles::list,
        crate::routes::profiles::create,
        crate::routes::profiles::get,
        crate::routes::profiles::update,
        crate::routes::profiles::delete,
        crate::routes::skillsets::list,
        crate::routes::skillsets::upsert,
        crate::routes::skillsets::get,
        crate::routes::skillsets::get_by_user,
        crate::routes::skillsets::delete,
        crate::routes::vehicles::list,
        crate::routes::vehicles::create,
        crate::routes::vehicles::get,
        crate::routes::vehicles::update,
        crate::routes::vehicles::delete,
        crate::routes::carts::get_cart,
        crate::routes::carts::add_item,
        crate::routes::carts::set_quantity,
        crate::routes::carts::remove_item,
        crate::routes::carts::clear_cart,
        crate::routes::search::search,
        crate::routes::uploads::upload,
        crate::routes::uploads::delete,
        crate::routes::ai::ask,
        crate::routes::ai::search_suggestions,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            NewCategoryDoc,
            NewServiceDoc,
            NewPostDoc,
            PostUpdateDoc,
            TagDoc,
            NewCommentDoc,
            RecommendDoc,
            BusinessProfileDoc,
            SkillsetDoc,
            VehicleDoc,
            AddCartItemDoc,
            QuantityDoc,
            UploadFormDoc,
            UploadedDoc,
            AskDoc,
            SuggestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "catalog"),
        (name = "posts"),
        (name = "feed"),
        (name = "profiles"),
        (name = "skillsets"),
        (name = "vehicles"),
        (name = "carts"),
        (name = "search"),
        (name = "uploads"),
        (name = "ai")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for p in [
            "/health",
            "/api/categories",
            "/api/posts/{id}/recommendations/{user_id}",
            "/api/feed/recommended",
            "/api/skillset-profiles/by-user/{user_id}",
            "/api/carts/{kind}/items/{id}",
            "/api/search",
            "/api/uploads",
            "/api/ai/search-suggestions",
        ] {
            assert!(paths.contains_key(p), "missing {p}");
        }
    }
}
