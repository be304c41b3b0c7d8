use kurosuwado_client::build_puzzle_url;
use kurosuwado_core::{Puzzle, PuzzleError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum FetchError {
    #[error("bad puzzle endpoint: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error("puzzle request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("puzzle endpoint returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("puzzle document malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("puzzle rejected: {0}")]
    Invalid(#[from] PuzzleError),
}

pub(crate) async fn fetch_puzzle(api_base: &str, date: &str) -> Result<Puzzle, FetchError> {
    let url = build_puzzle_url(api_base, date)?;
    let response = reqwest::get(url.clone()).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    let puzzle: Puzzle = serde_json::from_str(&body)?;
    puzzle.validate()?;
    Ok(puzzle)
}
