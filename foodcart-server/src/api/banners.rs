//! Storefront banners

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use shared::models::Banner;

use crate::state::AppState;

/// (title, image file, caption)
const BANNERS: [(&str, &str, &str); 3] = [
    ("Burger", "burger.jpg", "Tasty Burger at your door step"),
    ("Spices", "food.jpg", "All Cuisines"),
    ("New York", "tasty.jpg", "Food is incomplete without a tasty dessert"),
];

pub fn router() -> Router<AppState> {
    Router::new().route("/api/banners/", get(list_banners))
}

pub fn banners(static_url: &str) -> Vec<Banner> {
    BANNERS
        .iter()
        .map(|(title, image, text)| Banner {
            title: title.to_string(),
            src: format!("{static_url}{image}"),
            text: text.to_string(),
        })
        .collect()
}

pub async fn list_banners(State(state): State<AppState>) -> Json<Vec<Banner>> {
    Json(banners(&state.static_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_images_live_under_static_url() {
        let list = banners("https://cdn.example.com/static/");
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].title, "Burger");
        assert_eq!(list[0].src, "https://cdn.example.com/static/burger.jpg");
        assert_eq!(list[2].text, "Food is incomplete without a tasty dessert");
    }
}
