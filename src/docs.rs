//! OpenAPI document generated from the endpoint registry.

use utoipa::openapi::path::{HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::security::{
    HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme,
};
use utoipa::openapi::{Content, Required, ResponseBuilder};
use utoipa::{Modify, OpenApi};

use crate::endpoint::{Endpoint, EndpointRegistry, RequestMethod};

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Registration, login and email verification"),
        (name = "Competitions", description = "Competition management")
    ),
    info(
        title = "Scoreboard API",
        version = "0.1.0",
        description = "Competition management backend with role and verification gated endpoints.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn http_method(method: RequestMethod) -> HttpMethod {
    match method {
        RequestMethod::Get => HttpMethod::Get,
        RequestMethod::Post => HttpMethod::Post,
        RequestMethod::Put => HttpMethod::Put,
        RequestMethod::Delete => HttpMethod::Delete,
    }
}

/// Names inside `{}` in an axum path.
fn path_captures(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
}

fn operation_id(endpoint: &Endpoint) -> String {
    let path = endpoint
        .path()
        .trim_matches('/')
        .replace(['{', '}'], "")
        .replace('/', "_");
    format!("{}_{}", endpoint.method().as_str().to_lowercase(), path)
}

fn operation(endpoint: &Endpoint) -> Operation {
    let captures: Vec<&str> = path_captures(endpoint.path()).collect();

    let mut builder = OperationBuilder::new()
        .operation_id(Some(operation_id(endpoint)))
        .summary(endpoint.summary_text())
        .response("200", ResponseBuilder::new().description("Success").build())
        .response(
            "400",
            ResponseBuilder::new()
                .description("Malformed request, failed check or business rule")
                .build(),
        )
        .response("500", ResponseBuilder::new().description("Internal server error").build());

    if let Some(tag) = endpoint.tag_name() {
        builder = builder.tag(tag);
    }

    for name in &captures {
        builder = builder.parameter(
            ParameterBuilder::new()
                .name(*name)
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .build(),
        );
    }

    let body_fields: Vec<&str> = endpoint
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !captures.contains(field))
        .collect();

    if endpoint.method().reads_query() {
        for name in &body_fields {
            builder = builder.parameter(
                ParameterBuilder::new()
                    .name(*name)
                    .parameter_in(ParameterIn::Query)
                    .required(Required::True)
                    .build(),
            );
        }
    } else if !body_fields.is_empty() {
        builder = builder.request_body(Some(
            RequestBodyBuilder::new()
                .description(Some(format!("JSON object with keys: {}", body_fields.join(", "))))
                .content("application/json", Content::default())
                .required(Some(Required::True))
                .build(),
        ));
    }

    if endpoint.auth_required() {
        builder = builder
            .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
            .response(
                "403",
                ResponseBuilder::new().description("Authentication is required").build(),
            );
    }

    if endpoint.path().contains("{id}") {
        builder = builder.response(
            "404",
            ResponseBuilder::new().description("Competition not found").build(),
        );
    }

    builder.build()
}

/// The static document plus one operation per registered endpoint.
pub fn api_doc(registry: &EndpointRegistry) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    for endpoint in registry.endpoints() {
        doc.paths.add_path_operation(
            endpoint.path(),
            vec![http_method(endpoint.method())],
            operation(endpoint),
        );
    }
    doc
}
