use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{category, material, origin, sword};
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/swords", sword_routes())
        .nest("/categories", category_routes())
        .nest("/materials", material_routes())
        .nest("/origins", origin_routes())
}

fn sword_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sword::list_swords, sword::create_sword))
        .routes(routes!(sword::search_swords))
        .routes(routes!(sword::list_swords_by_category))
        .routes(routes!(sword::list_swords_by_material))
        .routes(routes!(
            sword::get_sword,
            sword::update_sword,
            sword::delete_sword
        ))
}

fn category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(category::list_categories, category::create_category))
        .routes(routes!(
            category::get_category,
            category::update_category,
            category::delete_category
        ))
}

fn material_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(material::list_materials, material::create_material))
        .routes(routes!(
            material::get_material,
            material::update_material,
            material::delete_material
        ))
}

fn origin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(origin::list_origins, origin::create_origin))
        .routes(routes!(
            origin::get_origin,
            origin::update_origin,
            origin::delete_origin
        ))
}
