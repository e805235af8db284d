use utoipa::OpenApi;

use crate::handlers;

pub struct SecurityAddon;
impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::courseware::courses,
        handlers::courseware::index,
        handlers::courseware::jump_to,
        handlers::courseware::course_info,
        handlers::profile::gradebook,
        handlers::profile::profile,
        handlers::schedules::reset_schedule,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Courseware", description = "Pages are rendered HTML; errors are JSON ErrorResponse bodies. A 404 covers both missing and malformed courses and locations.")
    )
)]
pub struct ApiDoc;
