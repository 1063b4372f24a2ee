use serde_json::Value;

use crate::config::CensusConfig;
use crate::domain::{region_code, FeatureProperties};
use crate::error::LookupError;

const STATE_WIDTH: usize = 2;
const COUNTY_WIDTH: usize = 3;

/// Left-pads a decimal code with `'0'` up to `width` characters.
pub fn pad(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

/// One request against the census language endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    state: String,
    county: Option<String>,
}

impl LookupQuery {
    pub fn state(code: &str) -> Self {
        Self {
            state: pad(code, STATE_WIDTH),
            county: None,
        }
    }

    pub fn county(state: &str, county: &str) -> Self {
        Self {
            state: pad(state, STATE_WIDTH),
            county: Some(pad(county, COUNTY_WIDTH)),
        }
    }

    /// `STATE` is required. A `COUNTY` key that is present and not `null`
    /// always gives a county scope; an unreadable value is an error, never a
    /// state-wide query.
    pub fn from_properties(properties: &FeatureProperties) -> Result<Self, LookupError> {
        let state = region_code(properties, "STATE").ok_or(LookupError::MissingRegion)?;
        match properties.get("COUNTY") {
            None | Some(Value::Null) => Ok(Self::state(&state)),
            Some(_) => {
                let county = region_code(properties, "COUNTY").ok_or(LookupError::MissingRegion)?;
                Ok(Self::county(&state, &county))
            }
        }
    }

    pub fn state_code(&self) -> &str {
        &self.state
    }

    pub fn county_code(&self) -> Option<&str> {
        self.county.as_deref()
    }

    /// The `for=` portion of the request, including `&in=` for counties.
    pub fn scope(&self) -> String {
        match &self.county {
            Some(county) => format!("county:{county}&in=state:{}", self.state),
            None => format!("state:{}", self.state),
        }
    }

    pub fn url(&self, census: &CensusConfig) -> String {
        let mut url = format!(
            "{}?get={}&for={}",
            census.base_url.trim_end_matches('?'),
            census.fields,
            self.scope()
        );
        if let Some(key) = census.api_key.as_deref().filter(|key| !key.is_empty()) {
            url.push_str("&key=");
            url.push_str(key);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::{pad, LookupQuery};
    use crate::config::CensusConfig;
    use crate::domain::FeatureProperties;
    use crate::error::LookupError;
    use serde_json::json;

    fn props(value: serde_json::Value) -> FeatureProperties {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn pads_to_requested_width() {
        assert_eq!(pad("5", 2), "05");
        assert_eq!(pad("12", 2), "12");
        assert_eq!(pad("7", 3), "007");
    }

    #[test]
    fn pad_never_truncates() {
        assert_eq!(pad("1234", 3), "1234");
        assert_eq!(pad("", 2), "00");
    }

    #[test]
    fn state_only_scope() {
        let query = LookupQuery::from_properties(&props(json!({ "STATE": 6 }))).unwrap();
        assert_eq!(query.scope(), "state:06");
        assert_eq!(query.county_code(), None);
    }

    #[test]
    fn county_scope_nests_inside_state() {
        let query =
            LookupQuery::from_properties(&props(json!({ "STATE": 6, "COUNTY": 1 }))).unwrap();
        assert_eq!(query.scope(), "county:001&in=state:06");
    }

    #[test]
    fn string_codes_from_boundary_files_are_kept() {
        let query = LookupQuery::from_properties(&props(
            json!({ "GEO_ID": "0500000US06037", "STATE": "06", "COUNTY": "037", "NAME": "Los Angeles" }),
        ))
        .unwrap();
        assert_eq!(query.state_code(), "06");
        assert_eq!(query.county_code(), Some("037"));
    }

    #[test]
    fn missing_state_is_an_error() {
        let result = LookupQuery::from_properties(&props(json!({ "COUNTY": "001" })));
        assert_eq!(result, Err(LookupError::MissingRegion));
    }

    #[test]
    fn null_county_is_a_state_query() {
        let query =
            LookupQuery::from_properties(&props(json!({ "STATE": "06", "COUNTY": null }))).unwrap();
        assert_eq!(query.scope(), "state:06");
    }

    #[test]
    fn unreadable_county_never_falls_back_to_the_state() {
        for county in [json!("03A"), json!(""), json!(1.0), json!(-3), json!(true)] {
            let result =
                LookupQuery::from_properties(&props(json!({ "STATE": "06", "COUNTY": county })));
            assert_eq!(result, Err(LookupError::MissingRegion), "COUNTY = {county}");
        }
    }

    #[test]
    fn url_requests_fixed_fields_and_appends_key() {
        let census = CensusConfig {
            api_key: Some("abc123".into()),
            ..CensusConfig::default()
        };
        let url = LookupQuery::state("6").url(&census);
        assert_eq!(
            url,
            "https://api.census.gov/data/2013/language?get=LAN7,LAN,EST,LANLABEL,NAME&for=state:06&key=abc123"
        );
    }

    #[test]
    fn url_omits_key_when_unset() {
        let url = LookupQuery::county("6", "1").url(&CensusConfig::default());
        assert!(url.ends_with("&for=county:001&in=state:06"));
        assert!(!url.contains("key="));
    }
}
