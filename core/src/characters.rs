//! Request builder and response parser for the character listing.

use crate::client::{check_status, from_json};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Character, ResponseData};

#[derive(Debug, Clone)]
pub struct CharacterClient {
    base_url: String,
}

impl CharacterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_characters(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/character", self.base_url))
    }

    /// Returns the `results` of the page, or nothing when the payload
    /// carries no `results` at all.
    pub fn parse_list_characters(&self, response: HttpResponse) -> Result<Vec<Character>, ApiError> {
        check_status(&response, 200)?;
        let page: ResponseData<Vec<Character>> = from_json(&response.body)?;
        Ok(page.results.unwrap_or_default())
    }
}
