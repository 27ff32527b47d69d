/// A freeform postal address together with its country.
///
/// Both parts are required: an address without a country (or the other way
/// round) cannot be verified and is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct PostalAddress {
    freeform: String,
    country: String,
}

impl PostalAddress {
    /// Returns `Ok(None)` when neither part was supplied and an error when
    /// only one of them was. Empty strings count as missing.
    pub fn parse(
        freeform: Option<String>,
        country: Option<String>,
    ) -> Result<Option<PostalAddress>, String> {
        let freeform = freeform.filter(|s| !s.is_empty());
        let country = country.filter(|s| !s.is_empty());
        match (freeform, country) {
            (Some(freeform), Some(country)) => Ok(Some(Self { freeform, country })),
            (None, None) => Ok(None),
            (Some(_), None) => Err("An address was supplied without a country.".into()),
            (None, Some(_)) => Err("A country was supplied without an address.".into()),
        }
    }

    pub fn freeform(&self) -> &str {
        &self.freeform
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl std::fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.freeform, self.country)
    }
}
