use gloo_net::http::Request;
use recognition_map_shared::{
    CitationsIndex, CountryGeometry, LoadError, LoadErrorKind, MapConfig, RecognitionBundle,
    RecognitionDataset, Resource, SchemaError, StyleTokens,
};

/// Everything the map renders from, validated.
pub(crate) struct MapData {
    pub bundle: RecognitionBundle,
    pub geometry: CountryGeometry,
}

async fn fetch_text(resource: Resource, url: &str) -> Result<String, LoadError> {
    let network = |e: gloo_net::Error| LoadError::new(resource, url, LoadErrorKind::Network(e.to_string()));
    let resp = Request::get(url).send().await.map_err(network)?;
    if !resp.ok() {
        return Err(LoadError::new(resource, url, LoadErrorKind::Status(resp.status())));
    }
    resp.text().await.map_err(network)
}

fn parse<T>(
    resource: Resource,
    url: &str,
    text: &str,
    parse: impl FnOnce(&str) -> Result<T, SchemaError>,
) -> Result<T, LoadError> {
    parse(text).map_err(|e| LoadError::new(resource, url, e))
}

/// Fetch all four documents concurrently. The first failure wins and names
/// its resource.
pub(crate) async fn load_map(config: &MapConfig) -> Result<MapData, LoadError> {
    let urls = &config.urls;
    let (dataset, citations, tokens, geometry) = futures::try_join!(
        fetch_text(Resource::Dataset, &urls.dataset),
        fetch_text(Resource::Citations, &urls.citations),
        fetch_text(Resource::StyleTokens, &urls.style_tokens),
        fetch_text(Resource::Geometry, &urls.geometry),
    )?;

    let dataset = parse(Resource::Dataset, &urls.dataset, &dataset, RecognitionDataset::parse)?;
    let citations = parse(Resource::Citations, &urls.citations, &citations, CitationsIndex::parse)?;
    let tokens = parse(Resource::StyleTokens, &urls.style_tokens, &tokens, StyleTokens::parse)?;
    let geometry = parse(Resource::Geometry, &urls.geometry, &geometry, |text| {
        CountryGeometry::parse(text, &config.iso_keys)
    })?;

    Ok(MapData {
        bundle: RecognitionBundle::new(dataset, citations, tokens),
        geometry,
    })
}
