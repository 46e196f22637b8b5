use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(decode_routes())
        .merge(vin_routes(config))
        .merge(image_routes())
}

fn decode_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::vin::decode_vin))
        .routes(routes!(handlers::vin::decode_structure))
        .routes(routes!(handlers::image::latest_image))
}

fn vin_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let read = OpenApiRouter::new()
        .routes(routes!(handlers::vin::delete_vin))
        .routes(routes!(handlers::image::list_images))
        .routes(routes!(handlers::image::get_image));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::image::upload_image))
        .layer(handlers::image::upload_body_limit(
            config.images.max_upload_size,
        ));

    read.merge(upload)
}

fn image_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::image::images_by_make_model))
}
