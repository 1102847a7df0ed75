// ============================================================================
// URL - Lectura de query/ruta y construcción de URLs de callback
// ============================================================================

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Caracteres que no pueden ir tal cual dentro de un segmento de ruta
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const FORCE_STRATEGY_PARAMS: [&str; 2] = ["forceStrategy", "force_strategy"];

/// Parámetros que sobreviven a la limpieza tras el callback
pub const PRESERVED_PARAMS: [&str; 3] = ["storeCode", "tableId", "addressId"];

pub fn query_pairs(href: &str) -> Vec<(String, String)> {
    match Url::parse(href) {
        Ok(url) => url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => Vec::new(),
    }
}

pub fn query_param(href: &str, name: &str) -> Option<String> {
    query_pairs(href)
        .into_iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v)
}

/// Código de tienda en la ruta: `/{segment}/{code}/...`
pub fn route_store_code(href: &str, segment: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let mut parts = url.path_segments()?;
    while let Some(part) = parts.next() {
        if part == segment {
            // decodificado igual que los valores de la query
            return parts
                .next()
                .and_then(|code| percent_decode_str(code).decode_utf8().ok())
                .map(|code| code.into_owned())
                .filter(|code| !code.is_empty());
        }
    }
    None
}

pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// href sin query ni fragmento, más los parámetros indicados
pub fn with_query(href: &str, params: &[(&str, &str)]) -> Result<String, String> {
    let mut url = Url::parse(href).map_err(|e| format!("Invalid URL '{}': {}", href, e))?;
    url.set_query(None);
    url.set_fragment(None);
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url.to_string())
}

/// Ruta relativa (path + query filtrada) tras quitar todo lo que no esté en `keep`
pub fn cleaned_relative_url(href: &str, keep: &[&str]) -> Result<String, String> {
    let url = Url::parse(href).map_err(|e| format!("Invalid URL '{}': {}", href, e))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| keep.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        return Ok(url.path().to_string());
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(kept.iter())
        .finish();
    Ok(format!("{}?{}", url.path(), query))
}

/// Fija (o quita con `None`) un parámetro conservando el resto
pub fn set_query_param(href: &str, names: &[&str], value: Option<(&str, &str)>) -> Result<String, String> {
    let mut url = Url::parse(href).map_err(|e| format!("Invalid URL '{}': {}", href, e))?;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !names.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some((name, value)) = value {
        pairs.push((name.to_string(), value.to_string()));
    }

    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs.iter());
    }
    Ok(url.to_string())
}
