use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Paging and keyword parameters shared by list endpoints.
#[derive(IntoParams)]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
#[allow(dead_code)]
pub struct ListQueryDoc {
    /// 1-based page, default 1
    page: Option<u64>,
    /// rows per page, default 10
    limit: Option<u64>,
    /// case-sensitive substring match on the module's text columns
    keyword: Option<String>,
    order_by: Option<String>,
    /// `asc` (default) or `desc`
    order_direction: Option<String>,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct StatusFilterDoc {
    /// Only rows in this status
    status: Option<String>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::system::health,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::material::list,
        crate::routes::material::get,
        crate::routes::material::create,
        crate::routes::material::update,
        crate::routes::material::delete,
        crate::routes::material::dropdown,
        crate::routes::table::list,
        crate::routes::table::get,
        crate::routes::table::create,
        crate::routes::table::update,
        crate::routes::table::delete,
        crate::routes::booking::list,
        crate::routes::booking::get,
        crate::routes::booking::create,
        crate::routes::booking::update,
        crate::routes::booking::delete,
        crate::routes::check_inventory::list,
        crate::routes::check_inventory::get,
        crate::routes::check_inventory::create,
        crate::routes::check_inventory::update,
        crate::routes::check_inventory::list_details,
        crate::routes::check_inventory::get_detail,
        crate::routes::check_inventory::update_detail,
        crate::routes::import_material::list,
        crate::routes::import_material::get,
        crate::routes::import_material::create,
        crate::routes::import_material::update,
        crate::routes::import_material::delete,
        crate::routes::import_material::list_orders,
        crate::routes::import_material::get_order,
        crate::routes::import_material::create_order,
        crate::routes::import_material::update_order,
        crate::routes::import_material::delete_order,
        crate::routes::export_material::list,
        crate::routes::export_material::get,
        crate::routes::export_material::create,
        crate::routes::export_material::update,
        crate::routes::export_material::delete,
        crate::routes::export_material::list_orders,
        crate::routes::export_material::get_order,
        crate::routes::export_material::create_order,
        crate::routes::export_material::update_order,
        crate::routes::export_material::delete_order,
        crate::routes::promotion::list,
        crate::routes::promotion::get,
        crate::routes::promotion::create,
        crate::routes::promotion::update,
        crate::routes::promotion::delete,
        crate::routes::dashboard::import_export_chart,
        crate::routes::dashboard::summary,
    ),
    components(schemas(HealthResponse, LoginRequest)),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "material"),
        (name = "table"),
        (name = "booking"),
        (name = "check-inventory"),
        (name = "import-material"),
        (name = "export-material"),
        (name = "promotion"),
        (name = "dashboard")
    )
)]
pub struct ApiDoc;
