//! Catalog helpers: slugs, SKUs, image URLs and discount badges.

use rand::distr::Alphanumeric;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Prefix of generated SKUs.
pub const SKU_PREFIX: &str = "SKU-";

/// Number of random characters in a generated SKU.
const SKU_RANDOM_LEN: usize = 8;

/// Turn a display name into a URL slug: lowercase ASCII letters and digits
/// separated by single hyphens.
///
/// Non-ASCII characters are dropped, so a name without any Latin letters or
/// digits yields an empty slug; callers must supply one explicitly then.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' || ch.is_ascii_punctuation() {
            pending_dash = true;
        }
    }
    slug
}

/// Generate a random SKU such as `SKU-7QK2M0ZD`.
pub fn generate_sku() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(SKU_RANDOM_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{SKU_PREFIX}{suffix}")
}

/// Percentage saved versus the compare-at price, rounded to the nearest
/// integer. `None` unless `old_price` is strictly greater than `price`.
pub fn discount_percentage(price: Decimal, old_price: Option<Decimal>) -> Option<i32> {
    let old = old_price?;
    if old <= price || old <= Decimal::ZERO {
        return None;
    }
    let pct = ((old - price) / old * Decimal::ONE_HUNDRED).round();
    pct.to_i32()
}

/// Public URL of a stored image.
///
/// Absolute `http(s)` references pass through; relative storage paths are
/// served from `{base_url}/storage/{path}`.
pub fn media_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/storage/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Men's Winter Jackets"), "men-s-winter-jackets");
        assert_eq!(slugify("  Phones & Tablets  "), "phones-tablets");
        assert_eq!(slugify("USB-C cable_2m"), "usb-c-cable-2m");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Одежда"), "");
        assert_eq!(slugify("Kiyim-kechak 2025"), "kiyim-kechak-2025");
    }

    #[test]
    fn sku_shape() {
        let sku = generate_sku();
        assert!(sku.starts_with(SKU_PREFIX));
        let suffix = &sku[SKU_PREFIX.len()..];
        assert_eq!(suffix.len(), SKU_RANDOM_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn discount_only_when_old_price_higher() {
        let price = Decimal::new(7500, 2);
        assert_eq!(discount_percentage(price, Some(Decimal::new(10000, 2))), Some(25));
        assert_eq!(discount_percentage(price, Some(price)), None);
        assert_eq!(discount_percentage(price, Some(Decimal::new(5000, 2))), None);
        assert_eq!(discount_percentage(price, None), None);
    }

    #[test]
    fn discount_rounds() {
        // (30 - 20) / 30 = 33.33%
        assert_eq!(
            discount_percentage(Decimal::new(20, 0), Some(Decimal::new(30, 0))),
            Some(33)
        );
    }

    #[test]
    fn media_url_prefixes_storage_paths() {
        assert_eq!(
            media_url("http://shop.test/", "products/a.jpg"),
            "http://shop.test/storage/products/a.jpg"
        );
        assert_eq!(
            media_url("http://shop.test", "https://cdn.test/a.jpg"),
            "https://cdn.test/a.jpg"
        );
    }
}
