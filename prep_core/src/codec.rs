//! Shareable link encoding.
//!
//! A link carries only the form inputs, never derived times, so opening an
//! old link always reflects the current calculation. The token is the JSON
//! form of [`ShareableState`] in URL-safe base64 without padding.

use crate::error::{DecodeError, MalformedToken};
use crate::validation::{validate, RawScheduleInput};
use crate::ScheduleInput;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Query parameter holding the token
pub const QUERY_PARAM: &str = "data";

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Flat plain-data form of a `ScheduleInput`.
///
/// Every key is required and must be a string. `hospital` is accepted for
/// compatibility and ignored; it is never written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareableState {
    pub patient_name: String,
    /// `YYYY-MM-DD`
    pub procedure_date: String,
    /// `HH:MM`
    pub procedure_time: String,
    pub sachets: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
}

impl From<&ScheduleInput> for ShareableState {
    fn from(input: &ScheduleInput) -> Self {
        Self {
            patient_name: input.patient_name().to_string(),
            procedure_date: input.procedure_date().format("%Y-%m-%d").to_string(),
            procedure_time: input.procedure_time().format("%H:%M").to_string(),
            sachets: input.sachets().as_choice().to_string(),
            hospital: None,
        }
    }
}

impl From<ShareableState> for RawScheduleInput {
    fn from(state: ShareableState) -> Self {
        Self {
            patient_name: Some(state.patient_name),
            procedure_date: Some(state.procedure_date),
            procedure_time: Some(state.procedure_time),
            sachets: Some(state.sachets),
        }
    }
}

/// Encode an input into an opaque, URL-safe token
pub fn encode(input: &ScheduleInput) -> String {
    let state = ShareableState::from(input);
    // Only string fields, so serialization cannot fail
    let json = serde_json::to_string(&state).unwrap_or_default();
    TOKEN_ENGINE.encode(json)
}

/// Decode a token back into the flat state, without validating values
pub fn decode_state(token: &str) -> Result<ShareableState, MalformedToken> {
    let token = token.trim();
    if token.is_empty() {
        return Err(MalformedToken::Empty);
    }
    let bytes = TOKEN_ENGINE.decode(token)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode a token and run it through the same validator as form input
pub fn decode(token: &str) -> Result<ScheduleInput, DecodeError> {
    let state = decode_state(token)?;
    if state.hospital.is_some() {
        tracing::debug!("Ignoring hospital field in shared link");
    }
    Ok(validate(&RawScheduleInput::from(state))?)
}

/// Build the shareable URL for `input` under `base_url`
pub fn share_link(base_url: &str, input: &ScheduleInput) -> String {
    format!(
        "{}/?{}={}",
        base_url.trim_end_matches('/'),
        QUERY_PARAM,
        encode(input)
    )
}

/// Pull the token out of a query string or a full URL.
///
/// The value is percent-decoded the way a browser reads query parameters.
/// `None` means there is no schedule in the link.
pub fn token_from_query(query_or_url: &str) -> Option<String> {
    let without_fragment = query_or_url
        .split_once('#')
        .map_or(query_or_url, |(before, _)| before);
    let query = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(_, after)| after);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
