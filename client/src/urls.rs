use url::Url;

use kurosuwado_core::GameId;

pub fn session_path(date: &str, game_id: Option<&GameId>) -> String {
    match game_id {
        Some(id) => format!("/crossword/{date}/{id}"),
        None => format!("/crossword/{date}"),
    }
}

pub fn build_puzzle_url(api_base: &str, date: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(api_base)?;
    let base_path = url.path().trim_end_matches('/');
    url.set_path(&format!("{base_path}/api/crossword/{date}"));
    url.set_query(None);
    Ok(url)
}

pub fn build_hub_url(ws_base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(ws_base)?;
    let base_path = url.path().trim_end_matches('/');
    if base_path.is_empty() {
        url.set_path("/ws");
    }
    url.set_query(None);
    Ok(url)
}
