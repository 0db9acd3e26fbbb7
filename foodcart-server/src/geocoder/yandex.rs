//! Yandex HTTP Geocoder client (REST API, no SDK dependency)

use async_trait::async_trait;
use serde_json::Value;
use shared::models::Coordinates;
use std::time::Duration;

use super::{GeocodeError, GeocodeProvider};

/// Geocoder backed by `GET {url}?geocode=…&apikey=…&format=json`
pub struct YandexGeocoder {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl YandexGeocoder {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for YandexGeocoder {
    async fn fetch(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Extract the first match from a geocoder response.
///
/// `Ok(None)` when the collection is empty (unknown address).
pub fn parse_response(body: &Value) -> Result<Option<Coordinates>, GeocodeError> {
    let members = body["response"]["GeoObjectCollection"]["featureMember"]
        .as_array()
        .ok_or_else(|| GeocodeError::Malformed("missing featureMember list".into()))?;

    let Some(first) = members.first() else {
        return Ok(None);
    };

    let pos = first["GeoObject"]["Point"]["pos"]
        .as_str()
        .ok_or_else(|| GeocodeError::Malformed("missing GeoObject.Point.pos".into()))?;

    parse_pos(pos).map(Some)
}

/// Parse a `"lon lat"` position string
pub fn parse_pos(pos: &str) -> Result<Coordinates, GeocodeError> {
    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeocodeError::Malformed(format!("bad position '{pos}'")));
    };
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("bad coordinate '{s}'")))
    };
    Ok(Coordinates::new(parse(lon)?, parse(lat)?))
}
