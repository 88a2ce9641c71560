//! GROQ queries for the storefront.
//!
//! Projections are shared fragments so list and detail queries always return
//! the same shape; `documents` deserializes every one of them.

/// Dereferenced image asset with dimensions.
const IMAGE_ASSET: &str = "asset->{ _id, url, metadata { dimensions } }";

/// Fields returned for every product query.
fn product_fields() -> String {
    format!(
        r#"_id,
  title,
  subtitle,
  slug,
  description,
  price,
  originalPrice,
  category,
  tags,
  rating,
  isNew,
  isSale,
  featured,
  mainImage {{ {IMAGE_ASSET} }},
  images[] {{ {IMAGE_ASSET} }},
  sizes,
  colors,
  stock,
  "collection": collection->{{ _id, title, slug }}"#
    )
}

/// Extra fields only needed on the product detail page.
const PRODUCT_DETAIL_FIELDS: &str = "weight,\n  dimensions,\n  materials,\n  care";

fn collection_fields() -> String {
    format!(
        r"_id,
  title,
  subtitle,
  slug,
  description,
  category,
  image {{ {IMAGE_ASSET} }},
  images[] {{ {IMAGE_ASSET} }},
  isNew,
  featured,
  itemCount"
    )
}

fn post_fields() -> String {
    format!(
        r"_id,
  title,
  excerpt,
  content,
  coverImage {{ {IMAGE_ASSET} }},
  _createdAt"
    )
}

/// All products.
#[must_use]
pub fn list_products() -> String {
    format!("*[_type == \"product\"] {{\n  {}\n}}", product_fields())
}

/// One product by slug. Parameter: `$slug`.
#[must_use]
pub fn product_by_slug() -> String {
    format!(
        "*[_type == \"product\" && slug.current == $slug][0] {{\n  {},\n  {PRODUCT_DETAIL_FIELDS}\n}}",
        product_fields()
    )
}

/// Products flagged as featured.
#[must_use]
pub fn featured_products() -> String {
    format!(
        "*[_type == \"product\" && featured == true] {{\n  {}\n}}",
        product_fields()
    )
}

/// Products whose collection reference has the given slug.
/// Parameter: `$collectionSlug`.
#[must_use]
pub fn products_by_collection_slug() -> String {
    format!(
        "*[_type == \"product\" && collection->slug.current == $collectionSlug] {{\n  {}\n}}",
        product_fields()
    )
}

/// All collections.
#[must_use]
pub fn list_collections() -> String {
    format!("*[_type == \"collection\"] {{\n  {}\n}}", collection_fields())
}

/// One collection by slug, including its content body. Parameter: `$slug`.
#[must_use]
pub fn collection_by_slug() -> String {
    format!(
        "*[_type == \"collection\" && slug.current == $slug][0] {{\n  {},\n  content\n}}",
        collection_fields()
    )
}

/// All blog posts, in store order.
#[must_use]
pub fn list_posts() -> String {
    format!("*[_type == \"post\"] {{\n  {}\n}}", post_fields())
}

/// One blog post by document ID. Parameter: `$id`.
#[must_use]
pub fn post_by_id() -> String {
    format!(
        "*[_type == \"post\" && _id == $id][0] {{\n  {}\n}}",
        post_fields()
    )
}
