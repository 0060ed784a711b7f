//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    IdPath, JsonBody,
    errors::responses::{
        BadRequestIdResponse, InternalServerErrorResponse, JsonExtractionResponse,
        ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{NotFoundBody, ProductResult, ValidationErrorsBody};
use crate::models::{
    ListQuery, PageMeta, ProductInput, ProductListResponse, ProductResponse, SearchQuery,
};
use crate::service::ProductCatalog;

/// Path the router is mounted under; used for `Location` headers.
pub const BASE_PATH: &str = "/api/products";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        get_product,
        create_product,
        replace_product,
        patch_product,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse, ProductInput, ProductListResponse, PageMeta,
            NotFoundBody, ValidationErrorsBody
        ),
        responses(
            BadRequestIdResponse,
            JsonExtractionResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Routes relative to [`BASE_PATH`]; the caller nests them.
pub fn router<S: ProductCatalog + 'static>(service: S) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products::<S>).post(create_product::<S>))
        .route("/search", get(search_products::<S>))
        .route(
            "/{id}",
            get(get_product::<S>)
                .put(replace_product::<S>)
                .patch(patch_product::<S>)
                .delete(delete_product::<S>),
        )
        .with_state(shared_service)
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    Query(query): Query<ListQuery>,
) -> ProductResult<Json<ProductListResponse>> {
    let page = service.list(query.page(), query.limit()).await?;
    Ok(Json(page.into()))
}

/// Search products by name, price range and stock
#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of matching products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn search_products<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    Query(query): Query<SearchQuery>,
) -> ProductResult<Json<ProductListResponse>> {
    let page = service
        .search(query.criteria(), query.page(), query.limit())
        .await?;
    Ok(Json(page.into()))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "Product not found", body = NotFoundBody),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_by_id(id).await?;
    Ok(Json(product.into()))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductResponse,
            headers(("Location" = String, description = "URL of the new product"))),
        (status = 400, description = "Validation failed", body = ValidationErrorsBody),
        (status = 422, response = JsonExtractionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    JsonBody(input): JsonBody<ProductInput>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create(input).await?;
    let location = format!("{}/{}", BASE_PATH, product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(product)),
    ))
}

/// Replace every field of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Validation failed or invalid id", body = ValidationErrorsBody),
        (status = 404, description = "Product not found", body = NotFoundBody),
        (status = 422, response = JsonExtractionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_product<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update(id, input, false).await?;
    Ok(Json(product.into()))
}

/// Update only the fields present in the body
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation failed or invalid id", body = ValidationErrorsBody),
        (status = 404, description = "Product not found", body = NotFoundBody),
        (status = 422, response = JsonExtractionResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn patch_product<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update(id, input, true).await?;
    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "Product not found", body = NotFoundBody),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: ProductCatalog>(
    State(service): State<Arc<S>>,
    IdPath(id): IdPath,
) -> ProductResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
