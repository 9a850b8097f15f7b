use super::Site;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
struct SiteRow {
    #[serde(alias = "Name", alias = "site")]
    name: String,
    #[serde(alias = "latitude", alias = "Latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "Longitude", alias = "lng")]
    lon: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
}

pub(super) fn parse_sites<R: Read>(reader: R) -> Result<Vec<Site>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut sites = Vec::new();

    for record in csv_reader.deserialize::<SiteRow>() {
        let row = record?;
        let rating = row.rating.as_deref().and_then(parse_rating);
        sites.push(Site {
            name: row.name,
            lat: row.lat,
            lon: row.lon,
            description: row.description,
            rating,
        });
    }

    Ok(sites)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

// Ratings are advisory; unparseable values are dropped rather than failing the load.
fn parse_rating(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|rating| rating.is_finite())
}
