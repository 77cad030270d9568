//! Directory search.
//!
//! A family matches when the query appears in any of: the primary member's
//! name, the family id, a primary-member phone number, the primary member's
//! blood group, the house name, or any family member's name or blood group.
//!
//! English-script fields (English names, id, English house name, blood groups)
//! are compared after lowercasing both sides. Malayalam fields are compared
//! raw against the raw query, so they are case-sensitive. Phone numbers are a
//! raw substring match.
//!
//! Every field read goes through the total accessors on the shared types, so a
//! record with a missing name, phone list, blood group, address or member list
//! simply does not match on that field.

use shared::{Family, Person};

/// Families matching `query`, in their original order.
/// An empty query returns every family.
pub fn search_families(query: &str, families: &[Family]) -> Vec<Family> {
    if query.is_empty() {
        return families.to_vec();
    }

    let matcher = QueryMatcher::new(query);
    families
        .iter()
        .filter(|family| matcher.matches_family(family))
        .cloned()
        .collect()
}

/// Report filter: case-insensitive match on the primary member's English name
/// or the family id. An empty query matches everything.
pub fn matches_name_or_id(query: &str, family: &Family) -> bool {
    let matcher = QueryMatcher::new(query);
    matcher.latin(family.display_name()) || matcher.latin(&family.id)
}

struct QueryMatcher<'q> {
    raw: &'q str,
    lower: String,
}

impl<'q> QueryMatcher<'q> {
    fn new(query: &'q str) -> Self {
        Self {
            raw: query,
            lower: query.to_lowercase(),
        }
    }

    fn latin(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.lower)
    }

    fn native(&self, field: &str) -> bool {
        field.contains(self.raw)
    }

    fn person_name(&self, person: &Person) -> bool {
        self.latin(person.name_en()) || self.native(person.name_ml())
    }

    fn matches_family(&self, family: &Family) -> bool {
        let primary = family.primary_member();

        let name_match = primary.is_some_and(|pm| self.person_name(pm));
        let id_match = self.latin(&family.id);
        let phone_match = primary.is_some_and(|pm| pm.phones().iter().any(|phone| phone.contains(self.raw)));
        let blood_match = primary.is_some_and(|pm| self.latin(pm.blood_group()));
        let house_match = family
            .house_name()
            .is_some_and(|house| self.latin(house.en()) || self.native(house.ml()));
        let members_match = family
            .members()
            .iter()
            .any(|member| self.person_name(member) || self.latin(member.blood_group()));

        name_match || id_match || phone_match || blood_match || house_match || members_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn family(value: serde_json::Value) -> Family {
        serde_json::from_value(value).unwrap()
    }

    fn directory() -> Vec<Family> {
        vec![
            family(json!({
                "id": "ERA-1",
                "primary_member": {
                    "name": { "en": "Joseph Mathew", "ml": "ജോസഫ് മാത്യു" },
                    "blood_group": "O +ve",
                    "phone": ["9847000001", "04842000001"]
                },
                "address": {
                    "house_name": { "en": "Peedikakkudi House", "ml": "പീടികക്കുടി" },
                    "location": { "en": "Edappally", "ml": "ഇടപ്പള്ളി" },
                    "geo": { "lat": "10.02", "lng": 76.31 }
                },
                "family_members": [
                    { "name": { "en": "Mary Joseph", "ml": "മേരി" }, "blood_group": "A +ve", "age": 48 }
                ]
            })),
            family(json!({
                "id": "ERA-4",
                "primary_member": {
                    "name": { "en": "Suresh Babu", "ml": "" },
                    "blood_group": "B -ve",
                    "phone": ["9847000004"]
                },
                "family_members": [
                    { "name": { "en": "Deepa Mol", "ml": "ദീപ" }, "blood_group": null, "age": "39" }
                ]
            })),
            family(json!({
                "id": "ERA-10",
                "primary_member": {
                    "name": { "en": "Aneesh Kumar K.N" },
                    "blood_group": null
                }
            })),
        ]
    }

    fn ids(results: &[Family]) -> Vec<&str> {
        results.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let families = directory();
        assert_eq!(search_families("", &families), families);
    }

    #[test]
    fn test_empty_query_on_empty_list() {
        assert!(search_families("", &[]).is_empty());
        assert!(search_families("anything", &[]).is_empty());
    }

    #[test]
    fn test_matches_primary_name_case_insensitively() {
        let families = directory();
        assert_eq!(ids(&search_families("joseph", &families)), vec!["ERA-1"]);
        assert_eq!(ids(&search_families("JOSEPH MAT", &families)), vec!["ERA-1"]);
    }

    #[test]
    fn test_matches_id() {
        let families = directory();
        assert_eq!(ids(&search_families("era-4", &families)), vec!["ERA-4"]);
        // "ERA-1" is a prefix of "ERA-10"
        assert_eq!(ids(&search_families("ERA-1", &families)), vec!["ERA-1", "ERA-10"]);
    }

    #[test]
    fn test_matches_any_phone() {
        let families = directory();
        assert_eq!(ids(&search_families("04842", &families)), vec!["ERA-1"]);
        assert_eq!(ids(&search_families("9847", &families)), vec!["ERA-1", "ERA-4"]);
    }

    #[test]
    fn test_blood_group_case_rule() {
        let families = directory();
        let lower = search_families("o +ve", &families);
        let upper = search_families("O +VE", &families);
        assert_eq!(lower, upper);
        assert_eq!(ids(&lower), vec!["ERA-1"]);
    }

    #[test]
    fn test_matches_house_name_in_either_script() {
        let families = directory();
        assert_eq!(ids(&search_families("peedikakkudi", &families)), vec!["ERA-1"]);
        assert_eq!(ids(&search_families("പീടിക", &families)), vec!["ERA-1"]);
    }

    #[test]
    fn test_matches_family_members() {
        let families = directory();
        assert_eq!(ids(&search_families("Deepa Mol", &families)), vec!["ERA-4"]);
        assert_eq!(ids(&search_families("ദീപ", &families)), vec!["ERA-4"]);
        assert_eq!(ids(&search_families("a +VE", &families)), vec!["ERA-1"]);
    }

    #[test]
    fn test_malayalam_comparison_is_exact() {
        let families = vec![family(json!({
            "id": "X-1",
            "primary_member": { "name": { "en": "", "ml": "Ωmega" } }
        }))];
        // No case folding on the Malayalam field
        assert_eq!(ids(&search_families("Ωmega", &families)), vec!["X-1"]);
        assert!(search_families("ωMEGA", &families).is_empty());
    }

    #[test]
    fn test_location_is_not_searched() {
        let families = directory();
        assert!(search_families("Edappally", &families).is_empty());
    }

    #[test]
    fn test_null_blood_group_and_missing_phone_do_not_break_search() {
        let families = directory();
        assert_eq!(ids(&search_families("Aneesh", &families)), vec!["ERA-10"]);
        assert!(!ids(&search_families("O+", &families)).contains(&"ERA-10"));
    }

    #[test]
    fn test_every_missing_null_or_empty_shape_is_tolerated() {
        let shapes = vec![
            json!({}),
            json!({ "id": null }),
            json!({ "id": "M-1", "primary_member": null, "address": null, "family_members": null }),
            json!({ "id": "M-2", "primary_member": {} , "address": {}, "family_members": [] }),
            json!({ "id": "M-3", "primary_member": { "name": null, "blood_group": null, "phone": null } }),
            json!({ "id": "M-4", "primary_member": { "name": {}, "blood_group": "", "phone": [] } }),
            json!({ "id": "M-5", "address": { "house_name": null } }),
            json!({ "id": "M-6", "address": { "house_name": { "en": null, "ml": null } } }),
            json!({ "id": "M-7", "family_members": [ {}, { "name": null, "blood_group": null } ] }),
        ];
        let families: Vec<Family> = shapes.into_iter().map(family).collect();

        for query in ["Aneesh", "O+", "9847", "ERA", "ദീപ", " ", "M-"] {
            let results = search_families(query, &families);
            assert!(results.len() <= families.len());
        }
        // Only the id field can match these records
        assert_eq!(search_families("m-", &families).len(), 7);
        assert!(search_families("Aneesh", &families).is_empty());
    }

    #[test]
    fn test_matches_name_or_id() {
        let families = directory();
        assert!(matches_name_or_id("", &families[0]));
        assert!(matches_name_or_id("joseph", &families[0]));
        assert!(matches_name_or_id("era-4", &families[1]));
        // Blood group and phone are not part of the report filter
        assert!(!matches_name_or_id("o +ve", &families[0]));
        assert!(!matches_name_or_id("9847", &families[0]));
    }
}
