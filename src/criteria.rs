use serde::{Deserialize, Serialize};

use crate::property::Property;

/// Filter constraints extracted from a free-text query. Every field is
/// optional; an absent field imposes no constraint (absence is not zero).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<f64>,
    pub max_bathrooms: Option<f64>,
    pub min_sqft: Option<u32>,
    pub max_sqft: Option<u32>,
    pub property_types: Option<Vec<String>>,
    pub required_amenities: Option<Vec<String>>,
}

impl SearchCriteria {
    /// All constraints AND-combine; numeric bounds are inclusive. Property
    /// types match exactly (case-sensitive, as produced by the extractor);
    /// required amenities match case-insensitively as substrings, so "park"
    /// matches a listing that offers "parking".
    pub fn matches(&self, property: &Property) -> bool {
        if self.min_price.is_some_and(|min| property.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| property.price > max) {
            return false;
        }
        if self.min_bedrooms.is_some_and(|min| property.bedrooms < min) {
            return false;
        }
        if self.max_bedrooms.is_some_and(|max| property.bedrooms > max) {
            return false;
        }
        if self.min_bathrooms.is_some_and(|min| property.bathrooms < min) {
            return false;
        }
        if self.max_bathrooms.is_some_and(|max| property.bathrooms > max) {
            return false;
        }
        if self.min_sqft.is_some_and(|min| property.sqft < min) {
            return false;
        }
        if self.max_sqft.is_some_and(|max| property.sqft > max) {
            return false;
        }

        if let Some(types) = &self.property_types {
            // An empty list from the extractor means "no preference".
            if !types.is_empty() && !types.iter().any(|t| *t == property.property_type) {
                return false;
            }
        }

        if let Some(required) = &self.required_amenities {
            let offered: Vec<String> = property
                .amenities
                .iter()
                .map(|a| a.to_lowercase())
                .collect();
            for wanted in required {
                let wanted = wanted.to_lowercase();
                if !offered.iter().any(|have| have.contains(&wanted)) {
                    return false;
                }
            }
        }

        true
    }
}

/// Strips a leading/trailing markdown code fence (with optional "json" tag)
/// so a fenced model reply decodes the same as a bare one.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Fail-open decode policy: output that still does not decode after fence
/// stripping degrades to empty criteria, so the caller gets the full listing
/// set back instead of an error.
pub fn parse_criteria(raw: &str) -> SearchCriteria {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str(cleaned) {
        Ok(criteria) => criteria,
        Err(e) => {
            log::warn!(
                "Extractor output did not decode as criteria ({}), returning unfiltered results",
                e
            );
            SearchCriteria::default()
        }
    }
}

/// Applies the criteria over a listing snapshot and orders the matches by
/// ascending price. The sort is stable, so ties keep the store's order.
pub fn filter_and_sort(criteria: &SearchCriteria, properties: &[Property]) -> Vec<Property> {
    let mut matched: Vec<Property> = properties
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.price.total_cmp(&b.price));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::seed_properties;

    fn listing(id: i64, price: f64, bedrooms: u32, amenities: &[&str]) -> Property {
        Property {
            id,
            address: format!("{} Test Street", id),
            price,
            bedrooms,
            bathrooms: 2.0,
            sqft: 1500,
            property_type: "Condo".to_string(),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            lat: 37.7,
            lng: -122.4,
            image: String::new(),
            roommate: None,
            contact: None,
            date_posted: None,
        }
    }

    #[test]
    fn empty_criteria_matches_everything_sorted_by_price() {
        let seeds = seed_properties();
        let result = filter_and_sort(&SearchCriteria::default(), &seeds);

        assert_eq!(result.len(), seeds.len());
        for pair in result.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn price_sort_is_stable_on_ties() {
        let listings = vec![
            listing(1, 700_000.0, 2, &[]),
            listing(2, 500_000.0, 2, &[]),
            listing(3, 700_000.0, 3, &[]),
        ];
        let result = filter_and_sort(&SearchCriteria::default(), &listings);
        let ids: Vec<i64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let criteria = SearchCriteria {
            min_price: Some(500_000.0),
            max_price: Some(700_000.0),
            ..Default::default()
        };

        assert!(criteria.matches(&listing(1, 500_000.0, 2, &[])));
        assert!(criteria.matches(&listing(2, 700_000.0, 2, &[])));
        assert!(!criteria.matches(&listing(3, 700_000.01, 2, &[])));
        assert!(!criteria.matches(&listing(4, 499_999.99, 2, &[])));
    }

    #[test]
    fn bedroom_bounds_are_inclusive() {
        let criteria = SearchCriteria {
            min_bedrooms: Some(2),
            max_bedrooms: Some(4),
            ..Default::default()
        };

        assert!(criteria.matches(&listing(1, 1.0, 2, &[])));
        assert!(criteria.matches(&listing(2, 1.0, 4, &[])));
        assert!(!criteria.matches(&listing(3, 1.0, 1, &[])));
        assert!(!criteria.matches(&listing(4, 1.0, 5, &[])));
    }

    #[test]
    fn property_types_match_exactly() {
        let criteria = SearchCriteria {
            property_types: Some(vec!["Condo".to_string(), "Townhouse".to_string()]),
            ..Default::default()
        };

        assert!(criteria.matches(&listing(1, 1.0, 2, &[])));

        let mut house = listing(2, 1.0, 2, &[]);
        house.property_type = "Single Family".to_string();
        assert!(!criteria.matches(&house));

        // Case-sensitive, as produced by the extractor.
        let mut lowercase = listing(3, 1.0, 2, &[]);
        lowercase.property_type = "condo".to_string();
        assert!(!criteria.matches(&lowercase));
    }

    #[test]
    fn empty_property_types_list_imposes_no_constraint() {
        let criteria = SearchCriteria {
            property_types: Some(vec![]),
            ..Default::default()
        };
        assert!(criteria.matches(&listing(1, 1.0, 2, &[])));
    }

    #[test]
    fn required_amenities_match_as_substrings() {
        let criteria = SearchCriteria {
            required_amenities: Some(vec!["park".to_string()]),
            ..Default::default()
        };

        assert!(criteria.matches(&listing(1, 1.0, 2, &["parking", "gym"])));
        assert!(!criteria.matches(&listing(2, 1.0, 2, &["gym"])));
    }

    #[test]
    fn required_amenities_are_case_insensitive_and_all_required() {
        let criteria = SearchCriteria {
            required_amenities: Some(vec!["Garage".to_string(), "POOL".to_string()]),
            ..Default::default()
        };

        assert!(criteria.matches(&listing(1, 1.0, 2, &["pool", "garage", "spa"])));
        assert!(!criteria.matches(&listing(2, 1.0, 2, &["garage"])));
    }

    #[test]
    fn strip_code_fences_handles_tagged_and_bare_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"minPrice\": 1}\n```"),
            "{\"minPrice\": 1}"
        );
        assert_eq!(
            strip_code_fences("```\n{\"minPrice\": 1}\n```"),
            "{\"minPrice\": 1}"
        );
        assert_eq!(strip_code_fences("{\"minPrice\": 1}"), "{\"minPrice\": 1}");
    }

    #[test]
    fn fenced_and_bare_json_parse_identically() {
        let bare = parse_criteria(r#"{"maxPrice": 900000, "minBedrooms": 3}"#);
        let fenced = parse_criteria("```json\n{\"maxPrice\": 900000, \"minBedrooms\": 3}\n```");

        assert_eq!(bare, fenced);
        assert_eq!(bare.max_price, Some(900_000.0));
        assert_eq!(bare.min_bedrooms, Some(3));
    }

    #[test]
    fn explicit_nulls_decode_as_no_constraint() {
        let criteria = parse_criteria(
            r#"{"minPrice": null, "maxPrice": 800000, "propertyTypes": null, "requiredAmenities": null}"#,
        );
        assert_eq!(criteria.min_price, None);
        assert_eq!(criteria.max_price, Some(800_000.0));
        assert_eq!(criteria.property_types, None);
        assert_eq!(criteria.required_amenities, None);
    }

    #[test]
    fn unparseable_output_falls_open_to_empty_criteria() {
        let criteria = parse_criteria("I'm sorry, I couldn't understand that request.");
        assert_eq!(criteria, SearchCriteria::default());
    }
}
