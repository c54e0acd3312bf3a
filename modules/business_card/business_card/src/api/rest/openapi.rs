//! OpenAPI document for the JSON API.
//!
//! Built with the utoipa builders from a table of operations, so the
//! document is produced without a macro pass over the handlers.

use std::collections::BTreeMap;

use cardkit::{Problem, ValidationViolation};
use utoipa::openapi::{
    OpenApi, OpenApiBuilder, Ref, RefOr, Required,
    content::ContentBuilder,
    info::InfoBuilder,
    path::{
        HttpMethod, OperationBuilder as UOperationBuilder, ParameterBuilder, ParameterIn,
        PathItemBuilder, PathsBuilder,
    },
    request_body::RequestBodyBuilder,
    response::{ResponseBuilder, ResponsesBuilder},
    schema::{
        ComponentsBuilder, KnownFormat, ObjectBuilder, Schema, SchemaFormat, SchemaType, Type,
    },
    security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme},
};
use utoipa::{PartialSchema, ToSchema};

use super::dto::{
    CardDto, ProfileDto, SendCardRequest, SendCardResponse, SocialLinkDto, UpdateProfileRequest,
};

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";
const IMAGE_SVG: &str = "image/svg+xml";
const BEARER_AUTH: &str = "bearerAuth";

struct Resp {
    status: u16,
    description: &'static str,
    content_type: &'static str,
    schema: Option<&'static str>,
}

const fn json(status: u16, description: &'static str, schema: &'static str) -> Resp {
    Resp {
        status,
        description,
        content_type: APPLICATION_JSON,
        schema: Some(schema),
    }
}

const fn problem(status: u16, description: &'static str) -> Resp {
    Resp {
        status,
        description,
        content_type: APPLICATION_PROBLEM_JSON,
        schema: Some("Problem"),
    }
}

struct Op {
    method: HttpMethod,
    path: &'static str,
    operation_id: &'static str,
    summary: &'static str,
    authenticated: bool,
    path_param: Option<&'static str>,
    request: Option<&'static str>,
    responses: Vec<Resp>,
}

fn operations() -> Vec<Op> {
    vec![
        Op {
            method: HttpMethod::Get,
            path: "/api/profile",
            operation_id: "business_card.get_profile",
            summary: "The caller's profile",
            authenticated: true,
            path_param: None,
            request: None,
            responses: vec![
                json(200, "Stored profile", "ProfileDto"),
                problem(401, "No session"),
                problem(404, "No profile saved yet"),
            ],
        },
        Op {
            method: HttpMethod::Put,
            path: "/api/profile",
            operation_id: "business_card.put_profile",
            summary: "Create or replace the caller's profile",
            authenticated: true,
            path_param: None,
            request: Some("UpdateProfileRequest"),
            responses: vec![
                json(200, "Saved profile", "ProfileDto"),
                problem(401, "No session"),
                problem(422, "Validation failed"),
            ],
        },
        Op {
            method: HttpMethod::Get,
            path: "/api/profile/qr.svg",
            operation_id: "business_card.get_qr_svg",
            summary: "QR code of the caller's share URL",
            authenticated: true,
            path_param: None,
            request: None,
            responses: vec![
                Resp {
                    status: 200,
                    description: "SVG image",
                    content_type: IMAGE_SVG,
                    schema: None,
                },
                problem(401, "No session"),
            ],
        },
        Op {
            method: HttpMethod::Get,
            path: "/api/cards/{userId}",
            operation_id: "business_card.get_card",
            summary: "Public card of one user",
            authenticated: false,
            path_param: Some("userId"),
            request: None,
            responses: vec![
                json(200, "Card", "CardDto"),
                problem(404, "Unknown card"),
            ],
        },
        Op {
            method: HttpMethod::Post,
            path: "/api/send-card",
            operation_id: "business_card.send_card",
            summary: "Email a card link",
            authenticated: false,
            path_param: None,
            request: Some("SendCardRequest"),
            responses: vec![
                json(200, "Email accepted by the provider", "SendCardResponse"),
                json(400, "Missing or invalid input", "SendCardResponse"),
                json(500, "Delivery failed", "SendCardResponse"),
            ],
        },
    ]
}

fn collect<T: ToSchema + PartialSchema>(out: &mut BTreeMap<String, RefOr<Schema>>) {
    let mut collected = vec![(T::name().into_owned(), <T as PartialSchema>::schema())];
    T::schemas(&mut collected);
    out.extend(collected);
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn build_response(r: &Resp) -> utoipa::openapi::Response {
    let schema = match r.schema {
        Some(name) => schema_ref(name),
        None => RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(SchemaType::Type(Type::String))
                .format(Some(SchemaFormat::Custom(r.content_type.to_owned())))
                .build(),
        )),
    };
    ResponseBuilder::new()
        .description(r.description)
        .content(r.content_type, ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

/// The complete API document.
#[must_use]
pub fn document() -> OpenApi {
    let mut paths = PathsBuilder::new();

    for spec in operations() {
        let mut op = UOperationBuilder::new()
            .operation_id(Some(spec.operation_id))
            .summary(Some(spec.summary))
            .tag("business_card");

        if let Some(name) = spec.path_param {
            let uuid = Schema::Object(
                ObjectBuilder::new()
                    .schema_type(SchemaType::Type(Type::String))
                    .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
                    .build(),
            );
            op = op.parameter(
                ParameterBuilder::new()
                    .name(name)
                    .parameter_in(ParameterIn::Path)
                    .required(Required::True)
                    .schema(Some(uuid))
                    .build(),
            );
        }

        if let Some(name) = spec.request {
            let body = RequestBodyBuilder::new()
                .content(
                    APPLICATION_JSON,
                    ContentBuilder::new().schema(Some(schema_ref(name))).build(),
                )
                .required(Some(Required::True))
                .build();
            op = op.request_body(Some(body));
        }

        let mut responses = ResponsesBuilder::new();
        for r in &spec.responses {
            responses = responses.response(r.status.to_string(), build_response(r));
        }
        op = op.responses(responses.build());

        if spec.authenticated {
            op = op.security(SecurityRequirement::new(BEARER_AUTH, Vec::<String>::new()));
        }

        let item = PathItemBuilder::new().operation(spec.method, op.build()).build();
        paths = paths.path(spec.path, item);
    }

    let mut schemas = BTreeMap::new();
    collect::<ProfileDto>(&mut schemas);
    collect::<UpdateProfileRequest>(&mut schemas);
    collect::<CardDto>(&mut schemas);
    collect::<SocialLinkDto>(&mut schemas);
    collect::<SendCardRequest>(&mut schemas);
    collect::<SendCardResponse>(&mut schemas);
    collect::<Problem>(&mut schemas);
    collect::<ValidationViolation>(&mut schemas);

    let mut components = ComponentsBuilder::new();
    for (name, schema) in schemas {
        components = components.schema(name, schema);
    }
    components = components.security_scheme(
        BEARER_AUTH,
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build(),
        ),
    );

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("cardshare API")
                .version(env!("CARGO_PKG_VERSION"))
                .description(Some("Digital business cards: profiles, public cards and sharing."))
                .build(),
        )
        .paths(paths.build())
        .components(Some(components.build()))
        .build()
}
